//! Error types for the chart data pipeline.

use thiserror::Error;

/// Errors from outcome parsing and normalization.
///
/// Structural problems are reported synchronously to the caller; a
/// well-formed but empty payload is *not* an error, it normalizes to an
/// empty series the screens render as an empty state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// The outcome's group records match none of the accepted source
    /// shapes (grouped object, pair list, baseline/delta).
    #[error("unrecognized outcome shape for '{metric}': {detail}")]
    UnrecognizedOutcomeShape {
        /// Metric name of the offending outcome.
        metric: String,
        /// What made the payload unreadable, with the record index.
        detail: String,
    },
}

impl ChartError {
    pub(crate) fn shape(metric: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnrecognizedOutcomeShape {
            metric: metric.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for chart pipeline operations.
pub type Result<T> = std::result::Result<T, ChartError>;
