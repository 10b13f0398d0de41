#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime category, year and column key types.
//!
//! The upstream prediction pipeline publishes one wide table per area with
//! columns named `{Category}_{Metric}_{Year}`, `Predicted_{Category}_2025`
//! and a handful of safety score columns. This crate turns that naming
//! scheme into a closed, typed key space so the rest of the workspace never
//! formats column names by hand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// The year the upstream model predicts counts for. Never an observed year.
pub const PREDICTED_YEAR: u16 = 2025;

/// Year shown when the dashboard first loads.
pub const DEFAULT_YEAR: DataYear = DataYear::Y2023;

/// Lower and upper bound of the heatmap color scale. Values above the
/// upper bound render with the top color; the data itself is untouched.
pub const HEATMAP_COLOR_RANGE: [f64; 2] = [0.0, 1000.0];

/// Gauge axis range for the safety score.
pub const SCORE_RANGE: [f64; 2] = [0.0, 100.0];

/// Line and bar colors for the first and second selected area.
pub const SERIES_COLORS: [&str; 2] = ["#ef43cf", "#38b6ff"];

/// An axis-aligned bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Western longitude.
    pub west: f64,
    /// Southern latitude.
    pub south: f64,
    /// Eastern longitude.
    pub east: f64,
    /// Northern latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

/// Crime categories tracked by the dataset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CrimeCategory {
    /// Theft offences (the default category)
    Theft,
    /// Drug offences
    Drug,
    /// Assault offences
    Assault,
    /// Malicious damage to property
    Damage,
}

impl CrimeCategory {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Theft, Self::Drug, Self::Assault, Self::Damage]
    }

    /// Category used whenever a selection is empty or unrecognised.
    #[must_use]
    pub const fn fallback() -> Self {
        Self::Theft
    }
}

/// Years with observed counts and rates.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DataYear {
    #[serde(rename = "2020")]
    #[strum(serialize = "2020")]
    Y2020,
    #[serde(rename = "2021")]
    #[strum(serialize = "2021")]
    Y2021,
    #[serde(rename = "2022")]
    #[strum(serialize = "2022")]
    Y2022,
    #[serde(rename = "2023")]
    #[strum(serialize = "2023")]
    Y2023,
    #[serde(rename = "2024")]
    #[strum(serialize = "2024")]
    Y2024,
}

impl DataYear {
    /// Returns all observed years in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Y2020, Self::Y2021, Self::Y2022, Self::Y2023, Self::Y2024]
    }

    /// Years plotted as the historical part of the trend line.
    #[must_use]
    pub const fn trend_years() -> &'static [Self] {
        &[Self::Y2020, Self::Y2021, Self::Y2022, Self::Y2023]
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::Y2020 => 2020,
            Self::Y2021 => 2021,
            Self::Y2022 => 2022,
            Self::Y2023 => 2023,
            Self::Y2024 => 2024,
        }
    }

    /// Converts a calendar year into a [`DataYear`], if it is observed.
    #[must_use]
    pub const fn from_value(year: u16) -> Option<Self> {
        match year {
            2020 => Some(Self::Y2020),
            2021 => Some(Self::Y2021),
            2022 => Some(Self::Y2022),
            2023 => Some(Self::Y2023),
            2024 => Some(Self::Y2024),
            _ => None,
        }
    }
}

/// Observed measure kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Metric {
    /// Number of recorded incidents
    Count,
    /// Incidents per 100,000 residents
    Rate,
}

impl Metric {
    /// Returns all variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Count, Self::Rate]
    }
}

/// Composite score columns published per area.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ScoreKind {
    #[serde(rename = "Safety_Score")]
    #[strum(serialize = "Safety_Score")]
    Safety,
    #[serde(rename = "Model_Safety_Score")]
    #[strum(serialize = "Model_Safety_Score")]
    Model,
    #[serde(rename = "Adjusted_Safety_Score")]
    #[strum(serialize = "Adjusted_Safety_Score")]
    Adjusted,
    #[serde(rename = "New_Safety_Score")]
    #[strum(serialize = "New_Safety_Score")]
    New,
    /// The score shown on the gauges and used for rankings.
    #[serde(rename = "Final_Safety_Score")]
    #[strum(serialize = "Final_Safety_Score")]
    Final,
}

impl ScoreKind {
    /// Returns all variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Safety,
            Self::Model,
            Self::Adjusted,
            Self::New,
            Self::Final,
        ]
    }
}

/// One numeric column of the area table.
///
/// [`fmt::Display`] renders the exact upstream column name and
/// [`FromStr`] parses it back, so the upstream naming scheme lives in
/// exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    /// `{Category}_{Metric}_{Year}`
    Observed {
        category: CrimeCategory,
        metric: Metric,
        year: DataYear,
    },
    /// `Predicted_{Category}_2025`
    Predicted(CrimeCategory),
    /// One of the score columns.
    Score(ScoreKind),
}

impl ColumnKey {
    /// `{category}_Count_{year}`
    #[must_use]
    pub const fn count(category: CrimeCategory, year: DataYear) -> Self {
        Self::Observed {
            category,
            metric: Metric::Count,
            year,
        }
    }

    /// `{category}_Rate_{year}`
    #[must_use]
    pub const fn rate(category: CrimeCategory, year: DataYear) -> Self {
        Self::Observed {
            category,
            metric: Metric::Rate,
            year,
        }
    }

    /// `Final_Safety_Score`
    #[must_use]
    pub const fn final_score() -> Self {
        Self::Score(ScoreKind::Final)
    }

    /// Every column in the key space.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut keys = Vec::new();
        for &category in CrimeCategory::all() {
            for &year in DataYear::all() {
                for &metric in Metric::all() {
                    keys.push(Self::Observed {
                        category,
                        metric,
                        year,
                    });
                }
            }
            keys.push(Self::Predicted(category));
        }
        keys.extend(ScoreKind::all().iter().copied().map(Self::Score));
        keys
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed {
                category,
                metric,
                year,
            } => write!(f, "{category}_{metric}_{year}"),
            Self::Predicted(category) => write!(f, "Predicted_{category}_{PREDICTED_YEAR}"),
            Self::Score(kind) => f.write_str(kind.as_ref()),
        }
    }
}

/// Error returned when a string is not a recognised column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumnError {
    /// The column name that failed to parse.
    pub name: String,
}

impl fmt::Display for UnknownColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column '{}'", self.name)
    }
}

impl std::error::Error for UnknownColumnError {}

impl FromStr for ColumnKey {
    type Err = UnknownColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownColumnError {
            name: s.to_string(),
        };

        if let Ok(kind) = s.parse::<ScoreKind>() {
            return Ok(Self::Score(kind));
        }

        let parts: Vec<&str> = s.split('_').collect();
        match parts.as_slice() {
            ["Predicted", category, year] => {
                if year.parse::<u16>().ok() != Some(PREDICTED_YEAR) {
                    return Err(unknown());
                }
                let category = category.parse().map_err(|_| unknown())?;
                Ok(Self::Predicted(category))
            }
            [category, metric, year] => Ok(Self::Observed {
                category: category.parse().map_err(|_| unknown())?,
                metric: metric.parse().map_err(|_| unknown())?,
                year: year.parse().map_err(|_| unknown())?,
            }),
            _ => Err(unknown()),
        }
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColumnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Severity tier of a safety score, used to color the gauges.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SafetyTier {
    /// Score of 70 or more
    Good,
    /// Score from 50 up to (not including) 70
    Warn,
    /// Score below 50
    Bad,
}

impl SafetyTier {
    /// Buckets a safety score. Scores are not clamped to 0-100.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Warn
        } else {
            Self::Bad
        }
    }

    /// Display color for this tier.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#00CC96",
            Self::Warn => "#FECB52",
            Self::Bad => "#EF553B",
        }
    }
}
