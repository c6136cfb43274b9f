//! Wires a crew monitor with its feeds and drives them until shutdown.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use crew::presets::keys;
use crew::{
    Alert, AlertFeed, AlertKind, CrewMonitor, CrewReport, HandledAlert, MemberReading,
    Recommendation, RecommendationFeed, default_roster,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use telemetry::time::now_ms;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use common::logger::{annotate_span, child_span};

use crate::cli::Cli;
use crate::config::AppConfig;

/// One line of `--json` output.
#[derive(Serialize)]
struct Frame<'a> {
    ts_ms: u64,
    report: &'a CrewReport,
    alerts: Vec<&'a Alert>,
    handled: Vec<&'a HandledAlert>,
    recommendations: Vec<&'a Recommendation>,
}

fn ticker(every: Duration) -> tokio::time::Interval {
    let mut t = interval_at(Instant::now() + every, every);
    t.set_missed_tick_behavior(MissedTickBehavior::Skip);
    t
}

/// Runs until Ctrl-C or `--duration-secs`, then writes one final report.
/// JSON frames go to `out`; plain reports go through tracing.
pub async fn run(args: &Cli, cfg: &AppConfig, out: &mut impl Write) -> Result<()> {
    let roster = default_roster();

    let monitor = CrewMonitor::new(roster.clone(), &args.monitor_config(cfg))
        .context("failed to assemble crew monitor")?;
    monitor.start().context("failed to start crew monitor")?;

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut alerts = AlertFeed::new();
    alerts.seed(&mut rng, &roster, now_ms());

    let mut recommendations = RecommendationFeed::new();
    recommendations.seed(&mut rng, &roster);

    let mut morale_rx = monitor.morale_simulator().subscribe(8);

    let mut report_tick = ticker(cfg.report_every);
    let mut alert_tick = ticker(cfg.alert_every);
    let mut recommendation_tick = ticker(cfg.recommendation_every);

    let deadline = async {
        match args.run_for() {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    info!(
        members = roster.len(),
        report_every_ms = cfg.report_every.as_millis() as u64,
        "crewwatch running"
    );

    loop {
        tokio::select! {
            _ = report_tick.tick() => {
                emit(&monitor, &alerts, &recommendations, args.json, out)?;
            }

            _ = alert_tick.tick() => {
                if let Some(alert) = alerts.raise(&mut rng, &roster, now_ms()) {
                    log_alert(alert);
                }
            }

            _ = recommendation_tick.tick() => {
                if let Some(rec) = recommendations.suggest(&mut rng, &roster) {
                    info!(member = %rec.member, priority = ?rec.priority, title = rec.title, "new recommendation");
                }
            }

            Some(snap) = morale_rx.recv() => {
                debug!(tick = snap.tick, morale = ?snap.get(keys::MORALE), "morale updated");
            }

            res = tokio::signal::ctrl_c() => {
                res.context("failed to listen for ctrl-c")?;
                info!("Shutdown signal received");
                break;
            }

            _ = &mut deadline => {
                info!("run duration elapsed");
                break;
            }
        }
    }

    monitor.stop();
    emit(&monitor, &alerts, &recommendations, args.json, out)?;

    Ok(())
}

fn log_alert(alert: &Alert) {
    match alert.kind {
        AlertKind::Warning => warn!(
            member = %alert.member,
            message = alert.message,
            context = alert.context(),
            root_causes = ?alert.root_causes(),
            "crew alert"
        ),
        _ => info!(
            member = %alert.member,
            kind = ?alert.kind,
            message = alert.message,
            root_causes = ?alert.root_causes(),
            "crew alert"
        ),
    }
}

fn emit(
    monitor: &CrewMonitor,
    alerts: &AlertFeed,
    recommendations: &RecommendationFeed,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let report = monitor.report().context("failed to build crew report")?;

    if json {
        let frame = Frame {
            ts_ms: now_ms(),
            report: &report,
            alerts: alerts.alerts().collect(),
            handled: alerts.handled().collect(),
            recommendations: recommendations.recommendations().collect(),
        };
        serde_json::to_writer(&mut *out, &frame)?;
        writeln!(out)?;
        return Ok(());
    }

    info!(
        morale = report.morale.value,
        status = report.morale.status.label(),
        positive = report.morale.breakdown.positive,
        neutral = report.morale.breakdown.neutral,
        uncertain = report.morale.breakdown.uncertain,
        trend_points = report.mood_trend.mood.len(),
        trend_now = ?report.mood_trend.mood.last(),
        "crew morale"
    );

    for reading in &report.members {
        log_member(reading);
    }

    Ok(())
}

fn log_member(reading: &MemberReading) {
    let span = child_span("member_report");
    annotate_span(&span, &reading.name);
    let _enter = span.enter();

    info!(
        role = %reading.role,
        tick = reading.tick,
        heart_rate = reading.heart_rate,
        stress = reading.stress,
        fatigue = reading.fatigue,
        mood = reading.mood,
        uncertainty = reading.uncertainty,
        status = reading.mood_status.label(),
        "biometrics"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn frames(out: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn timed_json_run_emits_final_frame() {
        let args = Cli::parse_from(["crewwatch", "--json", "--seed", "4", "--duration-secs", "1"]);
        let cfg = args.apply(AppConfig::default());
        let mut out = Vec::new();

        run(&args, &cfg, &mut out).await.unwrap();

        let frames = frames(out);
        assert_eq!(frames.len(), 1, "only the shutdown report fits in one second");

        let frame = &frames[0];
        assert_eq!(frame["report"]["members"].as_array().map(Vec::len), Some(6));
        assert_eq!(frame["alerts"].as_array().map(Vec::len), Some(3));
        assert_eq!(frame["recommendations"].as_array().map(Vec::len), Some(3));
        assert_eq!(frame["handled"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_reports_precede_the_final_one() {
        let args = Cli::parse_from([
            "crewwatch",
            "--json",
            "--seed",
            "4",
            "--report-every-ms",
            "400",
            "--duration-secs",
            "1",
        ]);
        let cfg = args.apply(AppConfig::default());
        let mut out = Vec::new();

        run(&args, &cfg, &mut out).await.unwrap();

        // Reports at 400 ms and 800 ms, then the shutdown report.
        assert_eq!(frames(out).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn plain_run_writes_nothing_to_out() {
        let args = Cli::parse_from(["crewwatch", "--duration-secs", "1"]);
        let cfg = args.apply(AppConfig::default());
        let mut out = Vec::new();

        run(&args, &cfg, &mut out).await.unwrap();

        assert!(out.is_empty());
    }
}
