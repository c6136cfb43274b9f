//! Timer-driven simulator.
//!
//! Data flow:
//! Ticker task → RandomWalk step → SimulatorState → subscribers
//!
//! The ticker only holds a weak handle to the simulator, so dropping the
//! owner ends the task even if nobody called `stop()`.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{Instrument, debug, info, instrument, warn};

use crate::counters::Counters;
use crate::engine::RandomWalk;
use crate::error::TelemetryError;
use crate::source::RandomSource;
use crate::spec::{MetricSpec, SimulatorConfig};
use crate::state::{SimulatorState, Snapshot};
use crate::time::now_ms;

pub struct TelemetrySimulator {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    specs: Vec<MetricSpec>,
    tick_interval: Duration,

    /// Single-writer section. A tick holds this for its whole pass, so `stop()`
    /// can never observe (or interleave with) a half-applied tick.
    writer: Mutex<Writer>,

    /// Readers copy out of this; only `Inner::tick` takes the write side.
    state: RwLock<SimulatorState>,

    subscribers: Mutex<Vec<Sender<Arc<Snapshot>>>>,
    counters: Counters,
}

struct Writer {
    walk: RandomWalk,
    /// Bumped by every `start()`; a ticker from an older run is ignored.
    epoch: u64,
    running: bool,
    task: Option<JoinHandle<()>>,
}

impl TelemetrySimulator {
    /// Builds an inert simulator. Nothing ticks until [`start`](Self::start).
    pub fn new(config: SimulatorConfig, source: Box<dyn RandomSource>) -> Result<Self, TelemetryError> {
        config.validate()?;

        let SimulatorConfig {
            name,
            specs,
            tick_interval,
            history_capacity,
        } = config;

        let walk = RandomWalk::new(specs.clone(), source)?;
        let state = walk.initial_state(history_capacity);

        debug!(
            sim = %name,
            metrics = specs.len(),
            every_ms = tick_interval.as_millis() as u64,
            history_capacity,
            "simulator created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                name,
                specs,
                tick_interval,
                writer: Mutex::new(Writer {
                    walk,
                    epoch: 0,
                    running: false,
                    task: None,
                }),
                state: RwLock::new(state),
                subscribers: Mutex::new(Vec::new()),
                counters: Counters::default(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn specs(&self) -> &[MetricSpec] {
        &self.inner.specs
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick_interval
    }

    pub fn is_running(&self) -> bool {
        self.inner.writer.lock().running
    }

    pub fn counters(&self) -> &Counters {
        &self.inner.counters
    }

    /// Starts ticking on the ambient tokio runtime; the first tick lands one
    /// interval from now. A no-op while already running.
    #[instrument(skip(self), fields(sim = %self.inner.name))]
    pub fn start(&self) -> Result<(), TelemetryError> {
        let mut w = self.inner.writer.lock();
        if w.running {
            debug!("simulator already running; start ignored");
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| TelemetryError::NoRuntime)?;

        w.epoch += 1;
        w.running = true;

        let epoch = w.epoch;
        let period = self.inner.tick_interval;
        let span = tracing::info_span!("simulator_ticker", sim = %self.inner.name, epoch);

        w.task = Some(handle.spawn(
            run_ticker(Arc::downgrade(&self.inner), epoch, period).instrument(span),
        ));

        info!(
            epoch,
            every_ms = period.as_millis() as u64,
            "simulator started"
        );

        Ok(())
    }

    /// Halts ticking. Once this returns no further tick can begin; values stay
    /// readable at their last snapshot. A no-op when already stopped.
    #[instrument(skip(self), fields(sim = %self.inner.name))]
    pub fn stop(&self) {
        let mut w = self.inner.writer.lock();
        if !w.running {
            return;
        }

        w.running = false;
        if let Some(task) = w.task.take() {
            task.abort();
        }

        info!(
            epoch = w.epoch,
            tick = self.inner.state.read().tick(),
            "simulator stopped"
        );
    }

    /// Copy of the values as of the last completed tick.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.read().snapshot()
    }

    /// Ordered copy of the retained history, oldest first.
    pub fn history_snapshot(&self) -> Vec<Arc<Snapshot>> {
        self.inner.state.read().history_snapshot()
    }

    /// One metric's trail through the history. `None` for an unknown key.
    pub fn history_series(&self, key: &str) -> Option<Vec<f64>> {
        self.inner.state.read().history_series(key)
    }

    /// Registers a per-tick feed.
    ///
    /// Delivery never blocks the tick: when the queue is full that tick is
    /// skipped for this subscriber; a dropped receiver is pruned.
    pub fn subscribe(&self, capacity: usize) -> Receiver<Arc<Snapshot>> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        self.inner.subscribers.lock().push(tx);
        debug!(sim = %self.inner.name, capacity, "subscriber registered");
        rx
    }
}

impl Drop for TelemetrySimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    /// Applies one tick for `epoch`. Returns `false` once the run is over.
    fn tick(&self, epoch: u64) -> bool {
        let snap = {
            let mut w = self.writer.lock();
            if !w.running || w.epoch != epoch {
                return false;
            }

            let mut state = self.state.write();
            let snap = w.walk.step(&mut state, now_ms());
            Counters::bump(&self.counters.ticks);
            snap
        };

        self.notify(snap);
        true
    }

    fn notify(&self, snap: Arc<Snapshot>) {
        let mut subs = self.subscribers.lock();

        subs.retain(|tx| match tx.try_send(Arc::clone(&snap)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                Counters::bump(&self.counters.dropped_notifications);
                warn!(
                    sim = %self.name,
                    tick = snap.tick,
                    "subscriber queue full; tick notification dropped"
                );
                true
            }
            Err(TrySendError::Closed(_)) => {
                Counters::bump(&self.counters.pruned_subscribers);
                debug!(sim = %self.name, "subscriber closed; pruned");
                false
            }
        });
    }
}

async fn run_ticker(inner: Weak<Inner>, epoch: u64, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };

        if !inner.tick(epoch) {
            break;
        }
    }

    debug!("simulator ticker exited");
}
