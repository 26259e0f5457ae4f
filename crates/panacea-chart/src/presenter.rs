//! Mapping of normalized data onto chart-primitive inputs.
//!
//! Everything here is a pure function of its inputs: same series, same
//! palette, same output. Color assignment is cyclic palette indexing by
//! category rank, so colors stay stable for a fixed category ordering and
//! degrade to repeats when categories outnumber the palette.

use serde::Serialize;

use panacea_model::NormalizedSeries;

use crate::aggregate::{EventSummary, OTHER_LABEL};
use crate::config::Palette;

/// A legend row: label plus swatch color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// One bar series of a grouped-bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    /// Aligned index-for-index with the chart's group labels.
    pub values: Vec<f64>,
}

/// Everything a grouped-bar primitive needs to draw one outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedBarInput {
    pub group_labels: Vec<String>,
    pub series: Vec<BarSeries>,
    pub legend: Vec<LegendEntry>,
}

impl GroupedBarInput {
    /// True when there is nothing to draw; render an empty state instead.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One slice of a pie/doughnut chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    /// Full-precision percentage; the legend shows the rounded value.
    pub value: f64,
    pub color: String,
}

/// Everything a pie primitive needs to draw an adverse-event summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieInput {
    pub slices: Vec<PieSlice>,
    pub legend: Vec<LegendEntry>,
}

/// Map a normalized series onto grouped-bar inputs.
///
/// Categories become bar series in their normalized order; an empty
/// series maps to an empty input the caller renders as "no data".
pub fn grouped_bar_input(series: &NormalizedSeries, palette: &Palette) -> GroupedBarInput {
    let mut bars = Vec::with_capacity(series.categories.len());
    let mut legend = Vec::with_capacity(series.categories.len());

    for (rank, (category, values)) in series.categories.iter().enumerate() {
        let color = palette.color(rank).to_string();
        bars.push(BarSeries {
            name: category.clone(),
            color: color.clone(),
            values: values.clone(),
        });
        legend.push(LegendEntry {
            label: category.clone(),
            color,
        });
    }

    GroupedBarInput {
        group_labels: series.group_labels.clone(),
        series: bars,
        legend,
    }
}

/// Map an adverse-event summary onto pie inputs.
///
/// Returns `None` for [`EventSummary::NoData`] so callers show the
/// empty-state message instead of a zero-slice chart. Legend labels carry
/// the percentage rounded to two decimals.
pub fn pie_input(summary: &EventSummary, palette: &Palette) -> Option<PieInput> {
    let EventSummary::Ranked { kept, other } = summary else {
        return None;
    };

    let slice_count = kept.len() + usize::from(other.is_some());
    let mut slices = Vec::with_capacity(slice_count);
    let mut legend = Vec::with_capacity(slice_count);

    for (rank, event) in kept.iter().enumerate() {
        push_slice(&mut slices, &mut legend, rank, &event.event, event.percentage, palette);
    }
    if let Some(remainder) = other {
        push_slice(&mut slices, &mut legend, kept.len(), OTHER_LABEL, *remainder, palette);
    }

    Some(PieInput { slices, legend })
}

fn push_slice(
    slices: &mut Vec<PieSlice>,
    legend: &mut Vec<LegendEntry>,
    rank: usize,
    label: &str,
    value: f64,
    palette: &Palette,
) {
    let color = palette.color(rank).to_string();
    slices.push(PieSlice {
        label: label.to_string(),
        value,
        color: color.clone(),
    });
    legend.push(LegendEntry {
        label: format!("{label}: {}%", round_percent(value)),
        color,
    });
}

/// Round a percentage to two decimal places for display.
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
