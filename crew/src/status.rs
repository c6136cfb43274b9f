use serde::Serialize;
use telemetry::{Bands, TelemetryError};

/// Breakpoints shared by the mood and morale gauges.
pub const STATUS_THRESHOLDS: [f64; 2] = [40.0, 70.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoodStatus {
    Stressed,
    Neutral,
    Positive,
}

impl MoodStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stressed => "Stressed",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoraleStatus {
    Critical,
    Moderate,
    Optimal,
}

impl MoraleStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Moderate => "Moderate",
            Self::Optimal => "Optimal",
        }
    }
}

pub fn mood_bands() -> Result<Bands<MoodStatus>, TelemetryError> {
    Bands::new(
        STATUS_THRESHOLDS.to_vec(),
        vec![MoodStatus::Stressed, MoodStatus::Neutral, MoodStatus::Positive],
    )
}

pub fn morale_bands() -> Result<Bands<MoraleStatus>, TelemetryError> {
    Bands::new(
        STATUS_THRESHOLDS.to_vec(),
        vec![
            MoraleStatus::Critical,
            MoraleStatus::Moderate,
            MoraleStatus::Optimal,
        ],
    )
}

/// Display split of the morale gauge into state counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoraleBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub uncertain: u32,
}

impl MoraleBreakdown {
    pub fn from_morale(morale: f64) -> Self {
        let m = morale.clamp(0.0, 100.0);
        Self {
            positive: (m * 0.4).round() as u32,
            neutral: (m * 0.3).round() as u32,
            uncertain: (100.0 - m).round() as u32,
        }
    }
}
