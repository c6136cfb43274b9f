use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use telemetry::{
    Bands, RandomSource, RngSource, Snapshot, TelemetryError, TelemetrySimulator, smooth,
};
use tracing::{info, instrument};

use crate::presets::{self, keys};
use crate::roster::CrewMember;
use crate::status::{MoodStatus, MoraleBreakdown, MoraleStatus, mood_bands, morale_bands};

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Cadence of every astronaut's biometric walk.
    pub biometrics_every: Duration,

    /// Cadence of the crew-wide morale gauge.
    pub morale_every: Duration,

    /// Cadence and depth of the mood trend series.
    pub trend_every: Duration,
    pub trend_points: usize,

    /// Moving-average window applied to the reported mood trend.
    pub smooth_window: usize,

    /// Deterministic run when set; each simulator gets its own stream.
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            biometrics_every: presets::BIOMETRICS_EVERY,
            morale_every: presets::MORALE_EVERY,
            trend_every: presets::MOOD_TREND_EVERY,
            trend_points: presets::MOOD_TREND_POINTS,
            smooth_window: 3,
            seed: None,
        }
    }
}

struct TrackedMember {
    member: CrewMember,
    sim: TelemetrySimulator,
}

/// One simulator per crew member, plus the crew-wide morale gauge and the
/// rolling mood trend. Owns every simulator; dropping the monitor stops them.
pub struct CrewMonitor {
    members: Vec<TrackedMember>,
    morale: TelemetrySimulator,
    mood_trend: TelemetrySimulator,
    mood_bands: Bands<MoodStatus>,
    morale_bands: Bands<MoraleStatus>,
    smooth_window: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberReading {
    pub name: String,
    pub role: String,
    pub tick: u64,
    pub heart_rate: f64,
    pub stress: f64,
    pub fatigue: f64,
    pub mood: f64,
    pub uncertainty: f64,
    pub mood_status: MoodStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoraleReading {
    pub value: f64,
    pub status: MoraleStatus,
    pub breakdown: MoraleBreakdown,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendReading {
    /// Smoothed mood, oldest first.
    pub mood: Vec<f64>,
    /// Raw uncertainty band, oldest first.
    pub uncertainty: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrewReport {
    pub members: Vec<MemberReading>,
    pub morale: MoraleReading,
    pub mood_trend: TrendReading,
}

/// Hands out one random source per simulator, in construction order.
///
/// With a seed, every stream seed comes from one generator seeded with it, so
/// nearby monitor seeds do not share member streams.
struct Sources {
    seeds: Option<StdRng>,
}

impl Sources {
    fn new(seed: Option<u64>) -> Self {
        Self {
            seeds: seed.map(StdRng::seed_from_u64),
        }
    }

    fn next_source(&mut self) -> Box<dyn RandomSource> {
        match self.seeds.as_mut() {
            Some(seeds) => Box::new(RngSource::seeded(seeds.next_u64())),
            None => Box::new(RngSource::from_entropy()),
        }
    }
}

fn value(snap: &Snapshot, key: &str) -> f64 {
    snap.get(key).unwrap_or(f64::NAN)
}

impl CrewMonitor {
    #[instrument(skip_all, fields(crew = roster.len()))]
    pub fn new(roster: Vec<CrewMember>, config: &MonitorConfig) -> Result<Self, TelemetryError> {
        if config.smooth_window < 1 {
            return Err(TelemetryError::InvalidArgument(
                "smoothing window must be at least 1".into(),
            ));
        }

        let mut sources = Sources::new(config.seed);

        let morale = TelemetrySimulator::new(
            presets::morale_config(config.morale_every),
            sources.next_source(),
        )?;

        let mood_trend = TelemetrySimulator::new(
            presets::mood_trend_config(config.trend_every, config.trend_points),
            sources.next_source(),
        )?;

        let members = roster
            .into_iter()
            .map(|member| {
                let cfg = presets::astronaut_config(&member.name, config.biometrics_every);
                let sim = TelemetrySimulator::new(cfg, sources.next_source())?;
                Ok(TrackedMember { member, sim })
            })
            .collect::<Result<Vec<_>, TelemetryError>>()?;

        info!(
            members = members.len(),
            seeded = config.seed.is_some(),
            "crew monitor assembled"
        );

        Ok(Self {
            members,
            morale,
            mood_trend,
            mood_bands: mood_bands()?,
            morale_bands: morale_bands()?,
            smooth_window: config.smooth_window,
        })
    }

    fn simulators(&self) -> impl Iterator<Item = &TelemetrySimulator> {
        self.members
            .iter()
            .map(|m| &m.sim)
            .chain([&self.morale, &self.mood_trend])
    }

    /// Starts every simulator. On failure, anything already started is stopped.
    pub fn start(&self) -> Result<(), TelemetryError> {
        for sim in self.simulators() {
            if let Err(e) = sim.start() {
                self.stop();
                return Err(e);
            }
        }
        info!("crew monitor started");
        Ok(())
    }

    pub fn stop(&self) {
        for sim in self.simulators() {
            sim.stop();
        }
        info!("crew monitor stopped");
    }

    pub fn members(&self) -> impl Iterator<Item = &CrewMember> {
        self.members.iter().map(|m| &m.member)
    }

    pub fn member_simulator(&self, name: &str) -> Option<&TelemetrySimulator> {
        self.members
            .iter()
            .find(|m| m.member.name == name)
            .map(|m| &m.sim)
    }

    pub fn morale_simulator(&self) -> &TelemetrySimulator {
        &self.morale
    }

    pub fn mood_trend_simulator(&self) -> &TelemetrySimulator {
        &self.mood_trend
    }

    /// Reads every simulator once and folds the values into display form.
    pub fn report(&self) -> Result<CrewReport, TelemetryError> {
        let members = self
            .members
            .iter()
            .map(|m| {
                let snap = m.sim.snapshot();
                let mood = value(&snap, keys::MOOD);
                MemberReading {
                    name: m.member.name.clone(),
                    role: m.member.role.clone(),
                    tick: snap.tick,
                    heart_rate: value(&snap, keys::HEART_RATE),
                    stress: value(&snap, keys::STRESS),
                    fatigue: value(&snap, keys::FATIGUE),
                    mood,
                    uncertainty: value(&snap, keys::UNCERTAINTY),
                    mood_status: *self.mood_bands.classify(mood),
                }
            })
            .collect();

        let morale_value = value(&self.morale.snapshot(), keys::MORALE);
        let morale = MoraleReading {
            value: morale_value,
            status: *self.morale_bands.classify(morale_value),
            breakdown: MoraleBreakdown::from_morale(morale_value),
        };

        let raw_mood = self
            .mood_trend
            .history_series(keys::MOOD)
            .unwrap_or_default();
        let mood_trend = TrendReading {
            mood: smooth(&raw_mood, self.smooth_window)?,
            uncertainty: self
                .mood_trend
                .history_series(keys::UNCERTAINTY)
                .unwrap_or_default(),
        };

        Ok(CrewReport {
            members,
            morale,
            mood_trend,
        })
    }
}
