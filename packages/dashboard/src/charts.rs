//! One function per dashboard visual.
//!
//! All functions are pure: the output depends only on the dataset and the
//! arguments. Missing areas or years yield `None` (or an empty list) for the
//! affected visual rather than an error, except for [`gauge_values`], which
//! is called with already-validated names.

use community_safety_crime_models::{
    ColumnKey, CrimeCategory, DEFAULT_YEAR, DataYear, HEATMAP_COLOR_RANGE, PREDICTED_YEAR,
    SCORE_RANGE, SafetyTier,
};
use community_safety_dashboard_models::{
    AreaSlot, ComparisonBar, ComparisonChart, ComparisonGroup, CrimeBreakdown, Gauge,
    HEATMAP_COLOR_SCALE, HeatmapCell, HeatmapData, MAP_CENTER, PieSlice, TrendChart, TrendPoint,
    TrendSeries,
};
use community_safety_dataset::{AreaRecord, Dataset};

use crate::DashboardError;
use crate::selection::resolve_category;

/// Picks the column the heatmap is colored by.
///
/// `{category}_Count_{year}` if the dataset carries it, otherwise
/// `Theft_Count_{year}`. An empty or unknown category resolves to Theft
/// first; an empty year uses [`DEFAULT_YEAR`].
#[must_use]
pub fn resolve_heatmap_column(
    dataset: &Dataset,
    crime_type: Option<&str>,
    year: Option<DataYear>,
) -> (CrimeCategory, ColumnKey) {
    let category = resolve_category(crime_type);
    let year = year.unwrap_or(DEFAULT_YEAR);
    let column = ColumnKey::count(category, year);

    if dataset.has_column(column) {
        (category, column)
    } else {
        log::debug!("Column {column} not in dataset, falling back to Theft");
        (
            CrimeCategory::fallback(),
            ColumnKey::count(CrimeCategory::fallback(), year),
        )
    }
}

/// Choropleth values for every area, paired with its boundary.
///
/// If even the fallback column is missing every value is 0.
#[must_use]
pub fn heatmap_data(
    dataset: &Dataset,
    crime_type: Option<&str>,
    year: Option<DataYear>,
) -> HeatmapData {
    let (category, column) = resolve_heatmap_column(dataset, crime_type, year);
    let values = dataset.column(column).unwrap_or_default();

    let cells = dataset
        .areas()
        .iter()
        .map(|area| HeatmapCell {
            name: area.name.clone(),
            join_key: area.join_key.clone(),
            value: values.get(area.name.as_str()).copied().unwrap_or(0.0),
            has_data: area.has_data,
            geometry: dataset.boundary(&area.join_key).map(|b| b.geometry.clone()),
        })
        .collect();

    HeatmapData {
        column,
        category,
        year: year.unwrap_or(DEFAULT_YEAR),
        label: format!("Number of {category}"),
        color_range: HEATMAP_COLOR_RANGE,
        color_scale: HEATMAP_COLOR_SCALE.to_string(),
        center: MAP_CENTER,
        bounds: dataset.bounds(),
        cells,
    }
}

/// Safety score gauges for the selected areas, in order.
///
/// # Errors
///
/// Returns [`DashboardError::AreaNotFound`] for the first name with no
/// record.
pub fn gauge_values<S: AsRef<str>>(
    dataset: &Dataset,
    areas: &[S],
) -> Result<Vec<Gauge>, DashboardError> {
    areas
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let area = dataset
                .area(name)
                .ok_or_else(|| DashboardError::AreaNotFound {
                    name: name.to_string(),
                })?;
            let score = area.final_safety_score();
            let tier = SafetyTier::from_score(score);
            Ok(Gauge {
                area: area.name.clone(),
                score,
                tier,
                color: tier.color().to_string(),
                range: SCORE_RANGE,
            })
        })
        .collect()
}

/// Category counts of one area for the pie chart.
///
/// Returns `None` if no area or year is given or the area is unknown. All
/// four categories are present even when their count is 0.
#[must_use]
pub fn top_crime_breakdown(
    dataset: &Dataset,
    area: Option<&str>,
    year: Option<DataYear>,
) -> Option<CrimeBreakdown> {
    let year = year?;
    let area = dataset.area(area?)?;

    Some(CrimeBreakdown {
        area: area.name.clone(),
        year,
        slices: CrimeCategory::all()
            .iter()
            .map(|&category| PieSlice {
                category,
                value: area.count(category, year),
            })
            .collect(),
    })
}

/// Rate history and prediction of one area.
///
/// Four historical points (2020-2023 rates) and the 2025 predicted value.
/// Returns `None` if the area is missing.
#[must_use]
pub fn trend_series(
    dataset: &Dataset,
    area: Option<&str>,
    slot: AreaSlot,
    category: CrimeCategory,
) -> Option<TrendSeries> {
    let area = dataset.area(area?)?;

    let historical: Vec<TrendPoint> = DataYear::trend_years()
        .iter()
        .map(|&year| TrendPoint {
            year: year.value(),
            value: area.rate(category, year),
        })
        .collect();
    let predicted = TrendPoint {
        year: PREDICTED_YEAR,
        value: area.predicted(category),
    };
    let last = historical.last().copied().unwrap_or(predicted);

    Some(TrendSeries {
        area: area.name.clone(),
        slot,
        color: slot.color().to_string(),
        historical,
        predicted,
        predicted_segment: [last, predicted],
    })
}

/// The trend chart for both slots. `None` if neither area resolves.
#[must_use]
pub fn trend_chart(
    dataset: &Dataset,
    primary: Option<&str>,
    secondary: Option<&str>,
    crime_type: Option<&str>,
) -> Option<TrendChart> {
    let category = resolve_category(crime_type);
    let series: Vec<TrendSeries> = [(AreaSlot::First, primary), (AreaSlot::Second, secondary)]
        .into_iter()
        .filter_map(|(slot, area)| trend_series(dataset, area, slot, category))
        .collect();

    if series.is_empty() {
        return None;
    }

    Some(TrendChart {
        title: format!("{category} Rate Trend"),
        y_axis: format!("{category} Rate"),
        category,
        series,
    })
}

/// Grouped bars: one group per category, one bar per selected area.
///
/// Returns `None` if no categories or no year is selected, if no first
/// area is selected, if neither selected area is known, or if no category
/// column exists in the dataset. Categories without a count column are
/// skipped. An unknown area only removes its own bars.
#[must_use]
pub fn comparison_series(
    dataset: &Dataset,
    primary: Option<&str>,
    secondary: Option<&str>,
    categories: &[CrimeCategory],
    year: Option<DataYear>,
) -> Option<ComparisonChart> {
    let year = year?;
    if categories.is_empty() {
        return None;
    }
    let primary = primary?;

    let areas: Vec<(AreaSlot, &AreaRecord)> =
        [(AreaSlot::First, Some(primary)), (AreaSlot::Second, secondary)]
            .into_iter()
            .filter_map(|(slot, name)| Some((slot, dataset.area(name?)?)))
            .collect();
    if areas.is_empty() {
        return None;
    }

    let groups: Vec<ComparisonGroup> = categories
        .iter()
        .filter_map(|&category| {
            let column = ColumnKey::count(category, year);
            if !dataset.has_column(column) {
                log::debug!("Skipping comparison for {category}: no {column} column");
                return None;
            }

            let bars = areas
                .iter()
                .map(|&(slot, area)| ComparisonBar {
                    area: area.name.clone(),
                    slot,
                    color: slot.color().to_string(),
                    value: area.value(column),
                })
                .collect();

            Some(ComparisonGroup { category, bars })
        })
        .collect();

    if groups.is_empty() {
        return None;
    }

    Some(ComparisonChart { year, groups })
}
