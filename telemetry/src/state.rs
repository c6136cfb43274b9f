use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::history::HistoryBuffer;
use crate::spec::MetricSpec;

/// Immutable copy of simulator values taken after a completed tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed ticks when the copy was taken; `0` means initial values.
    pub tick: u64,

    /// Timestamp (ms since epoch) of the tick that produced these values.
    pub last_tick_ms: Option<u64>,

    pub values: BTreeMap<String, f64>,
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Mutable runtime state of one simulator. Written only by its tick step.
#[derive(Debug)]
pub struct SimulatorState {
    keys: Vec<String>,
    values: Vec<f64>,
    tick: u64,
    last_tick_ms: Option<u64>,
    history: HistoryBuffer<Arc<Snapshot>>,
}

impl SimulatorState {
    /// Seeds every metric from its `initial` value.
    pub fn new(specs: &[MetricSpec], history_capacity: usize) -> Self {
        Self {
            keys: specs.iter().map(|s| s.key.clone()).collect(),
            values: specs.iter().map(|s| s.initial).collect(),
            tick: 0,
            last_tick_ms: None,
            history: HistoryBuffer::new(history_capacity),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_tick_ms(&self) -> Option<u64> {
        self.last_tick_ms
    }

    /// Current values in spec order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.values[i])
    }

    pub fn history(&self) -> &HistoryBuffer<Arc<Snapshot>> {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            last_tick_ms: self.last_tick_ms,
            values: self
                .keys
                .iter()
                .cloned()
                .zip(self.values.iter().copied())
                .collect(),
        }
    }

    /// Ordered copy of the history, oldest first. Empty when disabled.
    pub fn history_snapshot(&self) -> Vec<Arc<Snapshot>> {
        self.history.to_vec()
    }

    /// One metric's trail through the history, oldest first.
    /// `None` if the key is unknown.
    pub fn history_series(&self, key: &str) -> Option<Vec<f64>> {
        self.index_of(key)?;
        Some(self.history.iter().filter_map(|s| s.get(key)).collect())
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Seals a completed pass: bumps the tick, stamps it and records history.
    pub(crate) fn complete_tick(&mut self, now_ms: u64) -> Arc<Snapshot> {
        self.tick += 1;
        self.last_tick_ms = Some(now_ms);

        let snap = Arc::new(self.snapshot());
        self.history.push(Arc::clone(&snap));
        snap
    }
}
