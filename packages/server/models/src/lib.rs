#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the community safety dashboard
//! server.
//!
//! Chart payloads are the view types from
//! [`community_safety_dashboard_models`] serialized as-is. The types here
//! cover query strings and the few responses that are not charts.

use std::collections::BTreeMap;

use community_safety_crime_models::{
    BoundingBox, ColumnKey, CrimeCategory, DEFAULT_YEAR, DataYear, SafetyTier,
};
use community_safety_dashboard_models::SelectionRequest;
use serde::{Deserialize, Serialize};

/// Areas preselected when the dashboard first loads.
pub const DEFAULT_AREAS: &[&str] = &["Albury", "Ballina"];

/// Comparison categories preselected when the dashboard first loads.
pub const DEFAULT_COMPARE: &[CrimeCategory] = &[CrimeCategory::Theft, CrimeCategory::Drug];

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of areas loaded.
    pub area_count: usize,
}

/// Error body for non-2xx responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: String,
}

/// Query parameters for the dashboard endpoint.
///
/// List parameters are comma-separated, e.g.
/// `?areas=Albury,Ballina&year=2023&crimeType=Theft&compare=Theft,Drug`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Comma-separated area names.
    pub areas: Option<String>,
    /// Year, `2020`-`2024`.
    pub year: Option<String>,
    /// Crime type for the heatmap, pies and trend.
    pub crime_type: Option<String>,
    /// Comma-separated crime types for the comparison chart.
    pub compare: Option<String>,
}

impl From<&DashboardQueryParams> for SelectionRequest {
    fn from(p: &DashboardQueryParams) -> Self {
        Self {
            areas: split_list(p.areas.as_deref()),
            year: p.year.clone(),
            crime_type: p.crime_type.clone(),
            compare: split_list(p.compare.as_deref()),
        }
    }
}

/// Query parameters for the heatmap endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapQueryParams {
    /// Crime type; empty or unknown falls back to Theft.
    pub crime_type: Option<String>,
    /// Year; empty uses the default year.
    pub year: Option<String>,
}

/// Query parameters for the safest-areas endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopSafestQueryParams {
    /// Number of areas to return.
    pub limit: Option<usize>,
}

/// Values of the filter controls on first load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefaults {
    pub areas: Vec<String>,
    pub year: DataYear,
    pub crime_type: CrimeCategory,
    pub compare: Vec<CrimeCategory>,
}

/// Choices for every filter control.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Sorted area names with crime data.
    pub areas: Vec<String>,
    pub years: Vec<DataYear>,
    pub categories: Vec<CrimeCategory>,
    pub defaults: ApiDefaults,
}

impl ApiOptions {
    /// Builds the option lists. Default areas not in `areas` are dropped.
    #[must_use]
    pub fn new(areas: Vec<String>) -> Self {
        let defaults = ApiDefaults {
            areas: DEFAULT_AREAS
                .iter()
                .filter(|name| areas.iter().any(|a| a == *name))
                .map(ToString::to_string)
                .collect(),
            year: DEFAULT_YEAR,
            crime_type: CrimeCategory::fallback(),
            compare: DEFAULT_COMPARE.to_vec(),
        };

        Self {
            areas,
            years: DataYear::all().to_vec(),
            categories: CrimeCategory::all().to_vec(),
            defaults,
        }
    }
}

/// Every stored value of one area.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAreaDetail {
    pub name: String,
    pub join_key: String,
    /// `false` for placeholder areas with no crime row.
    pub has_data: bool,
    pub final_safety_score: f64,
    pub tier: SafetyTier,
    /// Values keyed by upstream column name.
    pub values: BTreeMap<ColumnKey, f64>,
    pub bounds: Option<BoundingBox>,
}

impl ApiAreaDetail {
    /// Builds the detail view of one area. The score and tier come from
    /// the `Final_Safety_Score` entry of `values`, 0 if absent.
    #[must_use]
    pub fn new(
        name: String,
        join_key: String,
        has_data: bool,
        values: BTreeMap<ColumnKey, f64>,
        bounds: Option<BoundingBox>,
    ) -> Self {
        let score = values
            .get(&ColumnKey::final_score())
            .copied()
            .unwrap_or(0.0);
        Self {
            name,
            join_key,
            has_data,
            final_safety_score: score,
            tier: SafetyTier::from_score(score),
            values,
            bounds,
        }
    }
}

/// Splits a comma-separated list, trimming and dropping empty entries.
#[must_use]
pub fn split_list(s: Option<&str>) -> Vec<String> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}
