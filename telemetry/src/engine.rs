//! Bounded random-walk update step.
//!
//! Each tick moves every metric independently:
//! `next = clamp(current + draw, min, max)` with `draw` in
//! `[-volatility / 2, volatility / 2]`. The walk is memoryless: the next value
//! depends only on the current one.

use std::sync::Arc;

use tracing::trace;

use crate::error::ConfigError;
use crate::source::RandomSource;
use crate::spec::{MetricSpec, validate_specs};
use crate::state::{SimulatorState, Snapshot};

/// Specs plus the random source that drives them.
pub struct RandomWalk {
    specs: Vec<MetricSpec>,
    source: Box<dyn RandomSource>,
}

impl RandomWalk {
    pub fn new(specs: Vec<MetricSpec>, source: Box<dyn RandomSource>) -> Result<Self, ConfigError> {
        validate_specs(&specs)?;
        Ok(Self { specs, source })
    }

    pub fn specs(&self) -> &[MetricSpec] {
        &self.specs
    }

    /// Fresh state seeded from every spec's `initial`.
    pub fn initial_state(&self, history_capacity: usize) -> SimulatorState {
        SimulatorState::new(&self.specs, history_capacity)
    }

    /// Runs one full pass over every metric, in spec order, then seals the tick.
    ///
    /// Total: no input can make this fail or leave a metric out of bounds.
    pub fn step(&mut self, state: &mut SimulatorState, now_ms: u64) -> Arc<Snapshot> {
        for (spec, value) in self.specs.iter().zip(state.values_mut().iter_mut()) {
            let delta = self.source.draw(spec.half_range());
            *value = walk(*value, delta, spec);
        }

        let snap = state.complete_tick(now_ms);
        trace!(tick = snap.tick, ts_ms = now_ms, "random walk step applied");
        snap
    }
}

/// Single bounded step for one metric.
pub fn walk(current: f64, delta: f64, spec: &MetricSpec) -> f64 {
    spec.clamp(current + delta)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::source::RngSource;
    use proptest::prelude::*;

    /// (min, max, initial, volatility) with `min <= initial <= max`.
    fn spec_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (-1_000.0..1_000.0f64, 0.0..500.0f64, 0.0..=1.0f64, 0.0..200.0f64).prop_map(
            |(min, width, frac, volatility)| {
                let max = min + width;
                (min, max, min + width * frac, volatility)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn walk_invariants_hold(
            raw in prop::collection::vec(spec_strategy(), 1..6),
            seed in any::<u64>(),
            ticks in 1usize..200,
            capacity in 0usize..32,
        ) {
            let specs: Vec<MetricSpec> = raw
                .iter()
                .enumerate()
                .map(|(i, &(min, max, initial, vol))| {
                    // Guard against float rounding pushing initial past max.
                    MetricSpec::new(format!("m{i}"), initial.min(max).max(min), min, max, vol)
                })
                .collect();

            let mut walk = RandomWalk::new(specs.clone(), Box::new(RngSource::seeded(seed))).unwrap();
            let mut state = walk.initial_state(capacity);

            for t in 0..ticks {
                let before = state.values().to_vec();
                walk.step(&mut state, t as u64);

                for ((spec, prev), now) in specs.iter().zip(&before).zip(state.values()) {
                    // --- INVARIANT 1: every value stays inside its bounds ---
                    prop_assert!(*now >= spec.min && *now <= spec.max,
                        "{} = {} escaped [{}, {}]", spec.key, now, spec.min, spec.max);

                    // --- INVARIANT 2: clamping only pulls a step in, never pushes it further ---
                    prop_assert!((now - prev).abs() <= spec.half_range() + 1e-9,
                        "{} moved {} > {}", spec.key, (now - prev).abs(), spec.half_range());
                }

                // --- INVARIANT 3: history never exceeds its capacity ---
                prop_assert!(state.history().len() <= capacity);
            }

            if capacity > 0 {
                prop_assert_eq!(state.history().len(), ticks.min(capacity));
            }
        }
    }
}
