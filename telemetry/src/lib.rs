//! Bounded random-walk telemetry simulation.
//!
//! A [`TelemetrySimulator`] owns a set of [`MetricSpec`]s and moves each metric
//! by a random, clamped step on a fixed cadence. Readers take copies through
//! [`TelemetrySimulator::snapshot`] or subscribe to a per-tick feed.

pub mod counters;
pub mod derive;
pub mod engine;
pub mod error;
pub mod history;
pub mod simulator;
pub mod source;
pub mod spec;
pub mod state;
pub mod time;

pub use counters::Counters;
pub use derive::{Bands, classify, smooth};
pub use engine::RandomWalk;
pub use error::{ConfigError, TelemetryError};
pub use history::HistoryBuffer;
pub use simulator::TelemetrySimulator;
pub use source::{RandomSource, RngSource, ScriptedSource};
pub use spec::{MetricSpec, SimulatorConfig};
pub use state::{SimulatorState, Snapshot};
