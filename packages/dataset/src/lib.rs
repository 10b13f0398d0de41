#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset store for the community safety dashboard.
//!
//! Reads the wide per-area CSV published by the prediction pipeline and the
//! suburb boundary `GeoJSON`, merges them into one immutable [`Dataset`],
//! and exposes read-only lookups. Boundaries with no matching crime row get
//! a zero-filled placeholder record so every polygon on the map has a value.
//!
//! Loading happens once at startup. Any failure here is fatal: there is no
//! partial-dataset mode.

pub mod boundaries;
pub mod config;
pub mod records;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

pub use boundaries::GeoBoundary;
pub use community_safety_crime_models::BoundingBox;
pub use config::DatasetConfig;
pub use records::AreaRecord;
pub use store::Dataset;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A source file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The boundary file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The configuration file is not valid TOML.
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A column the dashboard depends on is absent from the CSV header.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A numeric cell could not be parsed.
    #[error("Invalid value '{value}' in column {column} for area '{area}'")]
    InvalidValue {
        /// Area (row) the value belongs to.
        area: String,
        /// Column the value belongs to.
        column: String,
        /// The raw cell contents.
        value: String,
    },

    /// Structural problem with the input data.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<geojson::Error> for DatasetError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}
