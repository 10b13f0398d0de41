#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter-to-view pipeline for the community safety dashboard.
//!
//! Turns the user's filter selection (areas, year, crime type, comparison
//! categories) into the chart-ready structures in
//! [`community_safety_dashboard_models`]. Every function takes the shared
//! [`Dataset`] by reference and is free of side effects, so requests can
//! run concurrently against one loaded dataset.

pub mod charts;
pub mod ranking;
pub mod selection;

use community_safety_dashboard_models::{DashboardView, SelectionRequest, TOO_MANY_AREAS_WARNING};
use community_safety_dataset::Dataset;
use thiserror::Error;

pub use charts::{
    comparison_series, gauge_values, heatmap_data, resolve_heatmap_column, top_crime_breakdown,
    trend_chart, trend_series,
};
pub use ranking::{TOP_SAFEST_COUNT, top_safest_areas};
pub use selection::{resolve_category, resolve_selection, validate_selection};

/// Errors raised by the pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// More than two areas were selected.
    #[error("{count} areas selected, at most 2 are allowed")]
    TooManyAreas {
        /// Number of areas in the selection.
        count: usize,
    },

    /// A selected area has no record.
    #[error("Unknown area '{name}'")]
    AreaNotFound {
        /// The name that failed to resolve.
        name: String,
    },
}

impl DashboardError {
    /// Text shown to the user, if this error is user-facing.
    #[must_use]
    pub const fn user_warning(&self) -> Option<&'static str> {
        match self {
            Self::TooManyAreas { .. } => Some(TOO_MANY_AREAS_WARNING),
            Self::AreaNotFound { .. } => None,
        }
    }
}

/// Builds every visual for one selection.
///
/// A selection with more than two areas yields a blank view carrying the
/// warning text. Otherwise each visual is computed independently and a
/// missing area or year only blanks the visuals that need it.
#[must_use]
pub fn build_view(dataset: &Dataset, request: &SelectionRequest) -> DashboardView {
    let selection = match resolve_selection(request) {
        Ok(selection) => selection,
        Err(e) => {
            log::debug!("Rejecting selection: {e}");
            return DashboardView::blank(e.user_warning().unwrap_or_default());
        }
    };

    let primary = selection.primary.as_deref();
    let secondary = selection.secondary.as_deref();
    let crime_type = selection.crime_type.as_deref();

    let names: Vec<&str> = selection.slots().map(|(_, name)| name).collect();
    let gauges = gauge_values(dataset, &names).unwrap_or_else(|e| {
        log::warn!("Skipping gauges: {e}");
        Vec::new()
    });

    DashboardView {
        warning: String::new(),
        heatmap: Some(heatmap_data(dataset, crime_type, selection.year)),
        gauges,
        primary_breakdown: top_crime_breakdown(dataset, primary, selection.year),
        secondary_breakdown: top_crime_breakdown(dataset, secondary, selection.year),
        trend: trend_chart(dataset, primary, secondary, crime_type),
        comparison: comparison_series(
            dataset,
            primary,
            secondary,
            &selection.compare,
            selection.year,
        ),
    }
}
