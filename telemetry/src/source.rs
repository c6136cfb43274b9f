//! Injectable random sources.
//!
//! The simulator never reaches for a global RNG. Production code wraps a
//! `rand` generator in [`RngSource`]; tests replay fixed draws with
//! [`ScriptedSource`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TelemetryError;

/// Supplies one delta per metric per tick.
///
/// Contract: `draw(h)` returns a value in the closed interval `[-h, h]`.
/// The simulator trusts this and does not re-check the draw.
pub trait RandomSource: Send {
    fn draw(&mut self, half_range: f64) -> f64;
}

/// Uniform draws from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source: the same seed yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn draw(&mut self, half_range: f64) -> f64 {
        if half_range.is_nan() || half_range <= 0.0 {
            return 0.0;
        }
        // Scale a unit draw instead of sampling `[-h, h]` directly: the width
        // `2h` overflows for very large volatilities.
        let unit: f64 = self.rng.gen_range(-1.0..=1.0);
        (unit * half_range).clamp(-half_range, half_range)
    }
}

/// Replays a fixed sequence of draws, then yields `0.0` forever.
///
/// Fixtures are checked once at construction: every draw must already lie in
/// `[-volatility / 2, volatility / 2]`, so an out-of-contract fixture is
/// rejected here rather than silently clamped by the simulator.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>, volatility: f64) -> Result<Self, TelemetryError> {
        let half = volatility / 2.0;
        let draws: VecDeque<f64> = draws.into_iter().collect();

        if let Some((idx, bad)) = draws
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || d.abs() > half)
        {
            return Err(TelemetryError::invalid(format!(
                "scripted draw #{idx} ({bad}) outside [-{half}, {half}]"
            )));
        }

        Ok(Self { draws })
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn draw(&mut self, _half_range: f64) -> f64 {
        self.draws.pop_front().unwrap_or(0.0)
    }
}
