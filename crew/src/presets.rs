//! Metric presets for each tracked entity.
//!
//! Bounds, starting points and volatilities match the dashboard's figures.

use std::time::Duration;

use telemetry::{MetricSpec, SimulatorConfig};

pub mod keys {
    pub const HEART_RATE: &str = "heart_rate";
    pub const STRESS: &str = "stress";
    pub const FATIGUE: &str = "fatigue";
    pub const MOOD: &str = "mood";
    pub const UNCERTAINTY: &str = "uncertainty";
    pub const MORALE: &str = "morale";
}

pub const BIOMETRICS_EVERY: Duration = Duration::from_millis(2_000);
pub const MORALE_EVERY: Duration = Duration::from_millis(3_000);
pub const MOOD_TREND_EVERY: Duration = Duration::from_millis(3_000);

/// Trailing points kept for the mood trend (24 hours plus "now").
pub const MOOD_TREND_POINTS: usize = 25;

pub fn astronaut_specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new(keys::HEART_RATE, 72.0, 60.0, 100.0, 5.0),
        MetricSpec::new(keys::STRESS, 35.0, 0.0, 100.0, 8.0),
        MetricSpec::new(keys::FATIGUE, 28.0, 0.0, 100.0, 6.0),
        MetricSpec::new(keys::MOOD, 75.0, 0.0, 100.0, 7.0),
        MetricSpec::new(keys::UNCERTAINTY, 12.0, 5.0, 30.0, 3.0),
    ]
}

pub fn morale_specs() -> Vec<MetricSpec> {
    vec![MetricSpec::new(keys::MORALE, 78.0, 0.0, 100.0, 3.0)]
}

pub fn mood_trend_specs() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new(keys::MOOD, 65.0, 30.0, 90.0, 10.0),
        MetricSpec::new(keys::UNCERTAINTY, 17.5, 5.0, 25.0, 5.0),
    ]
}

pub fn astronaut_config(name: &str, every: Duration) -> SimulatorConfig {
    SimulatorConfig::new(name, astronaut_specs(), every)
}

pub fn morale_config(every: Duration) -> SimulatorConfig {
    SimulatorConfig::new("crew morale", morale_specs(), every)
}

pub fn mood_trend_config(every: Duration, history: usize) -> SimulatorConfig {
    SimulatorConfig::new("mood trend", mood_trend_specs(), every).with_history(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(astronaut_config("Lt. Kim", BIOMETRICS_EVERY).validate().is_ok());
        assert!(morale_config(MORALE_EVERY).validate().is_ok());

        let trend = mood_trend_config(MOOD_TREND_EVERY, MOOD_TREND_POINTS);
        assert!(trend.validate().is_ok());
        assert_eq!(trend.history_capacity, 25);
    }

    #[test]
    fn heart_rate_is_bounded_to_resting_range() {
        let hr = astronaut_specs()
            .into_iter()
            .find(|s| s.key == keys::HEART_RATE)
            .unwrap();

        assert_eq!((hr.min, hr.max), (60.0, 100.0));
        assert_eq!(hr.half_range(), 2.5);
    }
}
