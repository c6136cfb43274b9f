use thiserror::Error;

/// Construction-time misconfiguration. Never produced once a simulator exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least one metric spec is required")]
    EmptySpecs,

    #[error("duplicate metric key: {0}")]
    DuplicateKey(String),

    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    #[error("metric {key}: min {min} is greater than max {max}")]
    InvertedBounds { key: String, min: f64, max: f64 },

    #[error("metric {key}: initial {initial} outside [{min}, {max}]")]
    InitialOutOfBounds {
        key: String,
        initial: f64,
        min: f64,
        max: f64,
    },

    #[error("metric {key}: volatility {volatility} is negative")]
    NegativeVolatility { key: String, volatility: f64 },

    #[error("metric {key}: {field} is not a finite number")]
    NonFinite { key: String, field: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("invalid simulator configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no tokio runtime available to drive the simulator")]
    NoRuntime,
}

impl TelemetryError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
