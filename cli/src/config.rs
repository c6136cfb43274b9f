use std::time::Duration;

/// Runtime settings resolved from the environment.
///
/// Command-line flags override anything set here.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Emit logs as JSON (`APP_ENV=production`).
    pub json_logs: bool,

    /// Seed for a reproducible run (`CREWWATCH_SEED`). Unset means entropy.
    pub seed: Option<u64>,

    /// How often a crew report is produced (`CREWWATCH_REPORT_EVERY_MS`).
    pub report_every: Duration,

    /// Points kept in the mood trend (`CREWWATCH_HISTORY`).
    pub trend_points: usize,

    // =========================
    // Feed cadences
    // =========================
    pub alert_every: Duration,
    pub recommendation_every: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            seed: None,
            report_every: Duration::from_millis(5_000),
            trend_points: crew::presets::MOOD_TREND_POINTS,
            alert_every: Duration::from_millis(8_000),
            recommendation_every: Duration::from_millis(15_000),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// the default.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            json_logs: get("APP_ENV").as_deref() == Some("production"),
            seed: get("CREWWATCH_SEED").and_then(|v| v.parse().ok()),
            report_every: get("CREWWATCH_REPORT_EVERY_MS")
                .and_then(|v| v.parse().ok())
                .filter(|&ms: &u64| ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.report_every),
            trend_points: get("CREWWATCH_HISTORY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.trend_points),
            ..defaults
        }
    }
}
