#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View types for the community safety dashboard.
//!
//! Each visual on the dashboard (heatmap, gauges, pies, trend line, grouped
//! bars) has one output type here. They are serialized to JSON unchanged
//! and handed to the chart renderer, so colors and labels are part of the
//! data.

use community_safety_crime_models::{
    BoundingBox, ColumnKey, CrimeCategory, DataYear, SERIES_COLORS, SafetyTier,
};
use serde::{Deserialize, Serialize};

/// Most areas a user may select at once.
pub const MAX_SELECTED_AREAS: usize = 2;

/// Warning shown when more than [`MAX_SELECTED_AREAS`] areas are selected.
pub const TOO_MANY_AREAS_WARNING: &str = "Only a maximum of 2 suburbs can be selected.";

/// Continuous color scale used by the heatmap.
pub const HEATMAP_COLOR_SCALE: &str = "Redor";

/// Initial map center (Sydney).
pub const MAP_CENTER: MapCenter = MapCenter {
    lat: -33.85,
    lon: 151.13,
};

/// Raw filter state as sent by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionRequest {
    /// Selected area names, in selection order.
    pub areas: Vec<String>,
    /// Selected year, if any.
    pub year: Option<String>,
    /// Single-select crime type driving the heatmap, pies and trend.
    pub crime_type: Option<String>,
    /// Multi-select crime types driving the comparison chart.
    pub compare: Vec<String>,
}

/// A validated selection with explicit area slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// First selected area.
    pub primary: Option<String>,
    /// Second selected area.
    pub secondary: Option<String>,
    /// Selected year. `None` if empty or not an observed year.
    pub year: Option<DataYear>,
    /// Raw crime type, resolved per visual.
    pub crime_type: Option<String>,
    /// Comparison categories, deduplicated, in selection order.
    pub compare: Vec<CrimeCategory>,
}

impl Selection {
    /// Iterates over the filled area slots in order.
    pub fn slots(&self) -> impl Iterator<Item = (AreaSlot, &str)> {
        [
            (AreaSlot::First, self.primary.as_deref()),
            (AreaSlot::Second, self.secondary.as_deref()),
        ]
        .into_iter()
        .filter_map(|(slot, name)| name.map(|n| (slot, n)))
    }
}

/// Position of an area in the selection. Decides series colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaSlot {
    First,
    Second,
}

impl AreaSlot {
    /// Line/bar color for this slot.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::First => SERIES_COLORS[0],
            Self::Second => SERIES_COLORS[1],
        }
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// One polygon on the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Area display name (hover label).
    pub name: String,
    /// Boundary join key.
    pub join_key: String,
    /// Value of the resolved column.
    pub value: f64,
    /// `false` for placeholder areas with no crime row.
    pub has_data: bool,
    /// Boundary geometry, if the area has one.
    pub geometry: Option<geojson::Geometry>,
}

/// Choropleth data for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    /// Column the cells are colored by, after fallback.
    pub column: ColumnKey,
    /// Category the label refers to.
    pub category: CrimeCategory,
    /// Year of the column.
    pub year: DataYear,
    /// Color bar title, `"Number of {category}"`.
    pub label: String,
    /// Color scale bounds; values outside are clamped by the renderer.
    pub color_range: [f64; 2],
    /// Named continuous color scale.
    pub color_scale: String,
    /// Initial map center.
    pub center: MapCenter,
    /// Extent of every boundary.
    pub bounds: Option<BoundingBox>,
    /// One cell per area.
    pub cells: Vec<HeatmapCell>,
}

/// Safety score gauge for one area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub area: String,
    pub score: f64,
    pub tier: SafetyTier,
    /// Bar color for [`Self::tier`].
    pub color: String,
    /// Gauge axis range.
    pub range: [f64; 2],
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub category: CrimeCategory,
    pub value: f64,
}

/// Crime counts of one area for one year, by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeBreakdown {
    /// Chart title (the area name).
    pub area: String,
    pub year: DataYear,
    /// Always four slices, Theft, Drug, Assault, Damage, zeros included.
    pub slices: Vec<PieSlice>,
}

/// A point on the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub year: u16,
    pub value: f64,
}

/// Rate history plus prediction for one area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub area: String,
    pub slot: AreaSlot,
    pub color: String,
    /// Solid line, one point per trend year.
    pub historical: Vec<TrendPoint>,
    /// The predicted point.
    pub predicted: TrendPoint,
    /// Dashed segment from the last historical point to the prediction.
    pub predicted_segment: [TrendPoint; 2],
}

impl TrendSeries {
    /// Historical points followed by the predicted point.
    #[must_use]
    pub fn points(&self) -> Vec<TrendPoint> {
        let mut points = self.historical.clone();
        points.push(self.predicted);
        points
    }
}

/// The trend chart with one series per selected area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    /// `"{category} Rate Trend"`
    pub title: String,
    /// `"{category} Rate"`
    pub y_axis: String,
    pub category: CrimeCategory,
    pub series: Vec<TrendSeries>,
}

/// One bar in a comparison group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonBar {
    pub area: String,
    pub slot: AreaSlot,
    pub color: String,
    pub value: f64,
}

/// Side-by-side bars for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonGroup {
    pub category: CrimeCategory,
    pub bars: Vec<ComparisonBar>,
}

/// Grouped bar chart comparing selected areas across categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonChart {
    pub year: DataYear,
    pub groups: Vec<ComparisonGroup>,
}

/// An area and its final safety score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaScore {
    pub name: String,
    pub score: f64,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// User-visible warning; empty when the selection is valid.
    pub warning: String,
    pub heatmap: Option<HeatmapData>,
    pub gauges: Vec<Gauge>,
    /// Pie for the first selected area.
    pub primary_breakdown: Option<CrimeBreakdown>,
    /// Pie for the second selected area.
    pub secondary_breakdown: Option<CrimeBreakdown>,
    pub trend: Option<TrendChart>,
    pub comparison: Option<ComparisonChart>,
}

impl DashboardView {
    /// A view with every visual blank and only a warning.
    #[must_use]
    pub fn blank(warning: impl Into<String>) -> Self {
        Self {
            warning: warning.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if no visual has content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.heatmap.is_none()
            && self.gauges.is_empty()
            && self.primary_breakdown.is_none()
            && self.secondary_breakdown.is_none()
            && self.trend.is_none()
            && self.comparison.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_request_deserializes_partial_json() {
        let request: SelectionRequest =
            serde_json::from_str(r#"{"areas":["Albury"],"crimeType":"Drug"}"#).unwrap();
        assert_eq!(request.areas, ["Albury"]);
        assert_eq!(request.crime_type.as_deref(), Some("Drug"));
        assert!(request.year.is_none());
        assert!(request.compare.is_empty());
    }

    #[test]
    fn slots_skip_empty_positions() {
        let selection = Selection {
            primary: Some("Albury".to_string()),
            ..Selection::default()
        };
        let slots: Vec<_> = selection.slots().collect();
        assert_eq!(slots, [(AreaSlot::First, "Albury")]);
    }

    #[test]
    fn blank_view_serializes_warning() {
        let view = DashboardView::blank(TOO_MANY_AREAS_WARNING);
        assert!(view.is_blank());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["warning"], TOO_MANY_AREAS_WARNING);
        assert!(json["heatmap"].is_null());
        assert_eq!(json["gauges"], serde_json::json!([]));
    }

    #[test]
    fn slot_colors_differ() {
        assert_ne!(AreaSlot::First.color(), AreaSlot::Second.color());
    }
}
