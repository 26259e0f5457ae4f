//! Normalization of parsed outcomes into chart-ready series.

use indexmap::IndexMap;
use tracing::debug;

use panacea_model::{NormalizedSeries, OutcomePayload, StudyOutcome};

use crate::error::Result;
use crate::shape::parse_outcome;

/// Build a [`NormalizedSeries`] from a parsed outcome.
///
/// Group labels keep their source order (each group occurs once per
/// outcome, so there is nothing to de-duplicate). The category set is the
/// union across groups in first-seen order; a category a group does not
/// report charts as zero for that group. Every category's value array is
/// therefore aligned index-for-index with the group labels.
///
/// An outcome with no groups yields an empty series; callers render that
/// as "no data" rather than treating it as a failure.
pub fn normalize(outcome: &StudyOutcome) -> NormalizedSeries {
    let group_labels: Vec<String> = outcome.groups.iter().map(|g| g.label.clone()).collect();

    let mut categories: IndexMap<String, Vec<f64>> = IndexMap::new();
    for category in outcome.category_names() {
        categories.insert(category.to_string(), Vec::with_capacity(group_labels.len()));
    }
    for group in &outcome.groups {
        for (category, values) in &mut categories {
            values.push(group.values.get(category).copied().unwrap_or(0.0));
        }
    }

    debug!(
        metric = %outcome.metric_name,
        groups = group_labels.len(),
        categories = categories.len(),
        "normalized outcome series"
    );
    NormalizedSeries {
        group_labels,
        categories,
    }
}

/// Parse a raw wire payload and normalize it in one step.
pub fn normalize_payload(payload: &OutcomePayload) -> Result<NormalizedSeries> {
    Ok(normalize(&parse_outcome(payload)?))
}
