//! Adverse-event records as reported per study.

use serde::{Deserialize, Serialize};

/// A commonly reported side effect with its observed frequency.
///
/// Percentages are independent frequencies, not a partition: events
/// co-occur, so a study's percentages may sum past 100. Records are
/// read-only once sourced; nothing in the UI mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseEvent {
    pub event: String,
    /// Observed frequency in percent, 0-100.
    pub percentage: f64,
}

impl AdverseEvent {
    pub fn new(event: impl Into<String>, percentage: f64) -> Self {
        Self {
            event: event.into(),
            percentage,
        }
    }
}

/// A serious adverse event, reported as an affected-participant count
/// rather than a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriousEvent {
    pub event: String,
    pub count: u32,
}

/// The per-study adverse-event section: narrative summary, common events
/// by frequency, and serious events by count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdverseEventReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub common: Vec<AdverseEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub serious: Vec<SeriousEvent>,
}
