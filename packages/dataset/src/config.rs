//! Dataset location and schema configuration.
//!
//! Defaults match the files produced by the upstream prediction pipeline.
//! Every field can be overridden from a TOML file, e.g.
//!
//! ```toml
//! dataset_path = "data/community_safety_predictions_2025_lga.csv"
//! boundaries_path = "data/NSW-suburb.geojson"
//! excluded_areas = ["Lord Howe Island"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::DatasetError;

/// Where to find the source files and how to join them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the per-area CSV.
    pub dataset_path: PathBuf,
    /// Path to the boundary `GeoJSON` `FeatureCollection`.
    pub boundaries_path: PathBuf,
    /// CSV column holding the human-readable area name.
    pub name_column: String,
    /// CSV column holding the boundary join key.
    pub join_column: String,
    /// Feature property holding the boundary join key.
    pub boundary_key_property: String,
    /// Areas dropped from both files. Matched case-insensitively against
    /// the area name and the join key.
    pub excluded_areas: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/community_safety_predictions_2025_lga.csv"),
            boundaries_path: PathBuf::from("data/NSW-suburb.geojson"),
            name_column: "LGA".to_string(),
            join_column: "nsw_loca_2".to_string(),
            boundary_key_property: "nsw_loca_2".to_string(),
            excluded_areas: vec!["Lord Howe Island".to_string()],
        }
    }
}

impl DatasetConfig {
    /// Parses a config from TOML text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Toml`] if the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, DatasetError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, or
    /// [`DatasetError::Toml`] if it cannot be parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns `true` if `name` is on the exclusion list.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_areas
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DatasetConfig::from_toml_str("").unwrap();
        assert_eq!(config, DatasetConfig::default());
    }

    #[test]
    fn overrides_selected_fields() {
        let config = DatasetConfig::from_toml_str(
            r#"
            dataset_path = "/srv/areas.csv"
            excluded_areas = []
            "#,
        )
        .unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/srv/areas.csv"));
        assert!(config.excluded_areas.is_empty());
        assert_eq!(config.name_column, "LGA");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(DatasetConfig::from_toml_str("excluded_areas = 3").is_err());
    }

    #[test]
    fn exclusion_ignores_case() {
        let config = DatasetConfig::default();
        assert!(config.is_excluded("Lord Howe Island"));
        assert!(config.is_excluded("LORD HOWE ISLAND"));
        assert!(!config.is_excluded("Albury"));
    }
}
