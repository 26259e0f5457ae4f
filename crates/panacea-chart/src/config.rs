//! Chart configuration: slice palette and aggregation bounds.

use serde::{Deserialize, Serialize};

/// How many adverse events to keep before rolling the tail into "Other".
pub const DEFAULT_TOP_EVENTS: usize = 15;

/// Fallback color when a palette has no entries at all.
const FALLBACK_COLOR: &str = "#636e72";

/// An ordered color palette for categorical chart series.
///
/// Colors are assigned by category rank, cycling when the category count
/// exceeds the palette length, so a fixed category ordering always maps to
/// the same colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// Color for the given category rank, cycling through the palette.
    pub fn color(&self, rank: usize) -> &str {
        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }
        &self.colors[rank % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    /// The app's standard ten-color palette, dark purple through slate.
    fn default() -> Self {
        Self::new(
            [
                "#8e44ad", // Dark Purple
                "#6c5ce7", // Light Indigo
                "#4834d4", // Deep Blue
                "#74b9ff", // Light Blue
                "#00cec9", // Teal
                "#a29bfe", // Lavender
                "#dfe6e9", // Soft Grey-Blue
                "#2d3436", // Charcoal
                "#b2bec3", // Light Slate
                "#636e72", // Dark Slate
            ]
            .map(String::from)
            .to_vec(),
        )
    }
}

/// Explicit configuration for the aggregator and presentation adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Kept adverse events before the "Other" rollup.
    pub top_n: usize,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_EVENTS,
            palette: Palette::default(),
        }
    }
}
