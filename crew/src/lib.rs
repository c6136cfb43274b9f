//! Crew-level wiring on top of the telemetry simulator: who is tracked, what
//! each metric looks like, how values map to status labels, and the alert and
//! recommendation feeds shown next to them.

pub mod feed;
pub mod monitor;
pub mod presets;
pub mod roster;
pub mod status;

pub use feed::{
    Alert, AlertAction, AlertFeed, AlertKind, BoundedFeed, HandledAlert, Priority, Recommendation,
    RecommendationFeed,
};
pub use monitor::{CrewMonitor, CrewReport, MemberReading, MonitorConfig, MoraleReading, TrendReading};
pub use roster::{CrewMember, default_roster};
pub use status::{MoodStatus, MoraleBreakdown, MoraleStatus};
