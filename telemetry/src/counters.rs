use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal counters for operational visibility of one simulator.
#[derive(Clone, Default, Debug)]
pub struct Counters {
    /// Completed ticks across every run of the simulator.
    pub ticks: Arc<AtomicU64>,

    /// Per-tick notifications a subscriber missed because its queue was full.
    pub dropped_notifications: Arc<AtomicU64>,

    /// Subscribers removed after their receiver was dropped.
    pub pruned_subscribers: Arc<AtomicU64>,
}

impl Counters {
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn dropped_notifications(&self) -> u64 {
        self.dropped_notifications.load(Ordering::Relaxed)
    }

    pub fn pruned_subscribers(&self) -> u64 {
        self.pruned_subscribers.load(Ordering::Relaxed)
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
