//! Errors raised by the windowed aggregator.

use thiserror::Error;

/// Failure reported by a fold function for a single event.
///
/// The aggregator skips the offending event and leaves its accumulator table
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fold failed: {message}")]
pub struct FoldError {
    message: String,
}

impl FoldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The aggregator was used out of order: configured twice, or used
    /// before being configured.
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// A configuration value was rejected at `configure` time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Fold(#[from] FoldError),

    /// The ingestion point was dropped while producers were still sending.
    #[error("ingestion point closed: receiver dropped")]
    IngestionClosed,

    /// Encoding or decoding a state snapshot failed.
    #[error("state snapshot error: {0}")]
    State(#[from] bincode::Error),
}

impl AggregatorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AggregatorError::Configuration(_))
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, AggregatorError::InvalidConfiguration(_))
    }
}

pub type Result<T, E = AggregatorError> = std::result::Result<T, E>;
