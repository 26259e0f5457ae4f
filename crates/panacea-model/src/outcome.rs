//! Study outcome metrics and the normalized series derived from them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An outcome metric exactly as the data service delivers it.
///
/// The `groups` payload is kept as raw JSON because studies report it in
/// several historical shapes (grouped object, pair list, baseline/delta).
/// Shape detection and parsing into [`StudyOutcome`] live in the chart
/// pipeline, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePayload {
    /// Metric name, e.g. "Sleep Latency". Unique within a study.
    pub name: String,
    /// Requested chart kind from the service ("bar" in every payload seen).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit of measure for the charted values, e.g. "minutes".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Raw per-group records in one of the accepted source shapes.
    #[serde(default)]
    pub groups: serde_json::Value,
}

/// A dosage/demographic cohort's measured values for one outcome.
///
/// Category names are not required to match across groups of the same
/// outcome; a category missing from a group charts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageGroup {
    /// Group label on the x-axis, e.g. "1 mg".
    pub label: String,
    /// Category name to measured value. Values are finite and non-negative.
    pub values: IndexMap<String, f64>,
}

impl DosageGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, category: impl Into<String>, value: f64) -> Self {
        self.values.insert(category.into(), value);
        self
    }
}

/// A parsed outcome metric: name, unit, summary, and ordered dosage groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyOutcome {
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub groups: Vec<DosageGroup>,
}

impl StudyOutcome {
    /// Distinct category names across all groups, in first-seen order.
    pub fn category_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for group in &self.groups {
            for category in group.values.keys() {
                if !seen.contains(&category.as_str()) {
                    seen.push(category.as_str());
                }
            }
        }
        seen
    }
}

/// Chart-ready form of one outcome: per-category value arrays positionally
/// aligned with the ordered group labels.
///
/// The alignment invariant (every value array has exactly
/// `group_labels.len()` entries) is what the presentation adapter depends
/// on, and it is maintained by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSeries {
    pub group_labels: Vec<String>,
    pub categories: IndexMap<String, Vec<f64>>,
}

impl NormalizedSeries {
    /// True when the source outcome carried no groups at all. Callers treat
    /// this as "no data", not as an error.
    pub fn is_empty(&self) -> bool {
        self.group_labels.is_empty() && self.categories.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn group_count(&self) -> usize {
        self.group_labels.len()
    }
}
