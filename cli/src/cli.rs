use std::time::Duration;

use clap::Parser;
use crew::MonitorConfig;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[clap(name = "crewwatch", version, about = "Simulated crew biometric telemetry")]
pub struct Cli {
    /// Seed for a reproducible run (overrides CREWWATCH_SEED)
    #[clap(long)]
    pub seed: Option<u64>,

    /// Points kept in the mood trend (overrides CREWWATCH_HISTORY)
    #[clap(long)]
    pub history: Option<usize>,

    /// Report cadence in milliseconds (overrides CREWWATCH_REPORT_EVERY_MS)
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub report_every_ms: Option<u64>,

    /// Moving-average window applied to the mood trend
    #[clap(long, default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
    pub smooth_window: u64,

    /// Print each report as a JSON line on stdout
    #[clap(long)]
    pub json: bool,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[clap(long)]
    pub duration_secs: Option<u64>,
}

impl Cli {
    /// Layers flags over the environment config.
    pub(crate) fn apply(&self, mut cfg: AppConfig) -> AppConfig {
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(history) = self.history {
            cfg.trend_points = history;
        }
        if let Some(ms) = self.report_every_ms {
            cfg.report_every = Duration::from_millis(ms);
        }
        cfg
    }

    pub(crate) fn monitor_config(&self, cfg: &AppConfig) -> MonitorConfig {
        MonitorConfig {
            trend_points: cfg.trend_points,
            smooth_window: self.smooth_window as usize,
            seed: cfg.seed,
            ..MonitorConfig::default()
        }
    }

    pub(crate) fn run_for(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from([
            "crewwatch",
            "--seed",
            "9",
            "--history",
            "12",
            "--report-every-ms",
            "750",
        ]);
        let env = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };

        let cfg = cli.apply(env);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.trend_points, 12);
        assert_eq!(cfg.report_every, Duration::from_millis(750));
    }

    #[test]
    fn monitor_config_carries_seed_and_window() {
        let cli = Cli::parse_from(["crewwatch", "--smooth-window", "5"]);
        let cfg = AppConfig {
            seed: Some(3),
            ..AppConfig::default()
        };

        let mc = cli.monitor_config(&cfg);
        assert_eq!(mc.seed, Some(3));
        assert_eq!(mc.smooth_window, 5);
        assert_eq!(mc.trend_points, cfg.trend_points);
        assert_eq!(cli.run_for(), None);
    }

    #[test]
    fn rejects_zero_smoothing_window() {
        assert!(Cli::try_parse_from(["crewwatch", "--smooth-window", "0"]).is_err());
    }
}
