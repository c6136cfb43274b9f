use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Static configuration for one simulated metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Unique key, stable for the lifetime of the simulator.
    pub key: String,

    /// Value before the first tick.
    pub initial: f64,

    /// Inclusive clamp bounds.
    pub min: f64,
    pub max: f64,

    /// Per-tick deltas are drawn from `[-volatility / 2, volatility / 2]`.
    pub volatility: f64,
}

impl MetricSpec {
    pub fn new(key: impl Into<String>, initial: f64, min: f64, max: f64, volatility: f64) -> Self {
        Self {
            key: key.into(),
            initial,
            min,
            max,
            volatility,
        }
    }

    /// Largest step a single draw may contribute.
    pub fn half_range(&self) -> f64 {
        self.volatility / 2.0
    }

    pub fn clamp(&self, candidate: f64) -> f64 {
        candidate.min(self.max).max(self.min)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, v) in [
            ("initial", self.initial),
            ("min", self.min),
            ("max", self.max),
            ("volatility", self.volatility),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite {
                    key: self.key.clone(),
                    field,
                });
            }
        }

        if self.min > self.max {
            return Err(ConfigError::InvertedBounds {
                key: self.key.clone(),
                min: self.min,
                max: self.max,
            });
        }

        if self.initial < self.min || self.initial > self.max {
            return Err(ConfigError::InitialOutOfBounds {
                key: self.key.clone(),
                initial: self.initial,
                min: self.min,
                max: self.max,
            });
        }

        if self.volatility < 0.0 {
            return Err(ConfigError::NegativeVolatility {
                key: self.key.clone(),
                volatility: self.volatility,
            });
        }

        Ok(())
    }
}

/// Everything needed to build a simulator apart from its random source.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Label used in logs (e.g. the crew member name).
    pub name: String,

    /// Ordered metric specs; order decides the draw order within a tick.
    pub specs: Vec<MetricSpec>,

    pub tick_interval: Duration,

    /// Number of past snapshots retained. `0` disables history.
    pub history_capacity: usize,
}

impl SimulatorConfig {
    pub fn new(name: impl Into<String>, specs: Vec<MetricSpec>, tick_interval: Duration) -> Self {
        Self {
            name: name.into(),
            specs,
            tick_interval,
            history_capacity: 0,
        }
    }

    pub fn with_history(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_specs(&self.specs)?;

        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}

/// Checks a spec list: non-empty, unique keys, every spec well formed.
pub fn validate_specs(specs: &[MetricSpec]) -> Result<(), ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::EmptySpecs);
    }

    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.key.as_str()) {
            return Err(ConfigError::DuplicateKey(spec.key.clone()));
        }
        spec.validate()?;
    }

    Ok(())
}
