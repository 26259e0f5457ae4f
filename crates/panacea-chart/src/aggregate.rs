//! Adverse-event ranking and the top-N / "Other" rollup.

use tracing::debug;

use panacea_model::AdverseEvent;

use crate::config::ChartConfig;

/// Label of the synthetic rollup entry.
pub const OTHER_LABEL: &str = "Other";

/// The outcome of aggregating a study's adverse events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventSummary {
    /// No events were reported. Rendered as an empty state, not as an
    /// empty chart.
    NoData,
    /// Events ranked by frequency, truncated to the configured top-N.
    Ranked {
        /// Kept events, most frequent first. Full precision; rounding is
        /// the presentation layer's job.
        kept: Vec<AdverseEvent>,
        /// Sum of the truncated remainder, present only when it is
        /// strictly positive.
        other: Option<f64>,
    },
}

impl EventSummary {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Total percentage mass across kept events and the rollup.
    pub fn total(&self) -> f64 {
        match self {
            Self::NoData => 0.0,
            Self::Ranked { kept, other } => {
                kept.iter().map(|e| e.percentage).sum::<f64>() + other.unwrap_or(0.0)
            }
        }
    }
}

/// Ranks adverse events for display.
#[derive(Debug, Clone)]
pub struct EventAggregator {
    top_n: usize,
}

impl EventAggregator {
    pub fn new(config: &ChartConfig) -> Self {
        Self { top_n: config.top_n }
    }

    /// Sort descending by percentage (stable, so ties keep their input
    /// order; the ordering is user-visible and must be reproducible),
    /// keep the first `top_n`, and fold the rest into "Other" when their
    /// sum is strictly positive.
    pub fn summarize(&self, events: &[AdverseEvent]) -> EventSummary {
        if events.is_empty() {
            return EventSummary::NoData;
        }

        let mut ranked: Vec<AdverseEvent> = events.to_vec();
        ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let other = if ranked.len() > self.top_n {
            let remainder: f64 = ranked[self.top_n..].iter().map(|e| e.percentage).sum();
            ranked.truncate(self.top_n);
            (remainder > 0.0).then_some(remainder)
        } else {
            None
        };

        debug!(kept = ranked.len(), other = ?other, "aggregated adverse events");
        EventSummary::Ranked { kept: ranked, other }
    }
}
