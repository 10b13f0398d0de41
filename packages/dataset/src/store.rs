//! The merged, immutable dataset.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use community_safety_crime_models::{BoundingBox, ColumnKey};

use crate::boundaries::{self, GeoBoundary};
use crate::records::{self, AreaRecord};
use crate::{DatasetConfig, DatasetError};

/// Area records joined with their boundaries.
///
/// Built once at startup and shared read-only afterwards. Crime rows come
/// first in file order, followed by zero-filled placeholders for boundaries
/// that had no crime row, in boundary file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    areas: Vec<AreaRecord>,
    by_name: BTreeMap<String, usize>,
    boundaries: BTreeMap<String, GeoBoundary>,
    schema: BTreeSet<ColumnKey>,
    bounds: Option<BoundingBox>,
}

impl Dataset {
    /// Loads both source files named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if either file is missing or malformed.
    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetError> {
        log::info!("Loading area data from {}", config.dataset_path.display());
        let csv = open(&config.dataset_path)?;

        log::info!("Loading boundaries from {}", config.boundaries_path.display());
        let geojson = std::fs::read_to_string(&config.boundaries_path).map_err(|source| {
            DatasetError::Io {
                path: config.boundaries_path.clone(),
                source,
            }
        })?;

        Self::from_readers(csv, &geojson, config)
    }

    /// Builds a dataset from an in-memory CSV reader and `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if either input is malformed.
    pub fn from_readers<R: Read>(
        csv: R,
        geojson: &str,
        config: &DatasetConfig,
    ) -> Result<Self, DatasetError> {
        let table = records::read_crime_table(csv, config)?;
        let boundaries = boundaries::parse_boundaries(geojson, config)?;
        Ok(Self::merge(table.rows, table.schema, boundaries))
    }

    /// Joins crime rows with boundaries.
    ///
    /// Rows are deduplicated by join key, first occurrence wins. Every
    /// boundary whose key has no row gets a placeholder record.
    #[must_use]
    pub fn merge(
        rows: Vec<AreaRecord>,
        schema: BTreeSet<ColumnKey>,
        boundaries: Vec<GeoBoundary>,
    ) -> Self {
        let mut areas: Vec<AreaRecord> = Vec::with_capacity(rows.len() + boundaries.len());
        let mut by_name = BTreeMap::new();
        let mut join_keys = BTreeSet::new();
        let mut duplicates = 0usize;

        for row in rows {
            if !join_keys.insert(row.join_key.clone()) || by_name.contains_key(&row.name) {
                log::warn!("Dropping duplicate area row '{}' ({})", row.name, row.join_key);
                duplicates += 1;
                continue;
            }
            by_name.insert(row.name.clone(), areas.len());
            areas.push(row);
        }

        let mut placeholders = 0usize;
        let mut bounds: Option<BoundingBox> = None;
        let mut by_key = BTreeMap::new();

        for boundary in boundaries {
            if let Some(b) = boundary.bounds {
                bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
            }

            if join_keys.insert(boundary.key.clone()) && !by_name.contains_key(&boundary.key) {
                by_name.insert(boundary.key.clone(), areas.len());
                areas.push(AreaRecord::placeholder(&boundary.key));
                placeholders += 1;
            }

            if by_key.contains_key(&boundary.key) {
                log::warn!("Duplicate boundary for '{}', keeping the first", boundary.key);
                continue;
            }
            by_key.insert(boundary.key.clone(), boundary);
        }

        log::info!(
            "Dataset ready: {} areas ({placeholders} placeholders, {duplicates} duplicates dropped), {} boundaries",
            areas.len(),
            by_key.len()
        );

        Self {
            areas,
            by_name,
            boundaries: by_key,
            schema,
            bounds,
        }
    }

    /// All area records, crime rows first.
    #[must_use]
    pub fn areas(&self) -> &[AreaRecord] {
        &self.areas
    }

    /// Areas that came from the crime file (no placeholders).
    pub fn crime_rows(&self) -> impl Iterator<Item = &AreaRecord> {
        self.areas.iter().filter(|a| a.has_data)
    }

    /// Sorted display names of the crime rows, for the area picker.
    #[must_use]
    pub fn area_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.crime_rows().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Looks up an area by display name.
    ///
    /// Falls back to a case-insensitive match on the display name or the
    /// join key, so `"ALBURY"` finds `"Albury"`.
    #[must_use]
    pub fn area(&self, name: &str) -> Option<&AreaRecord> {
        if let Some(&idx) = self.by_name.get(name) {
            return Some(&self.areas[idx]);
        }
        let name = name.trim();
        self.areas
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name) || a.join_key.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if the source file carried this column.
    #[must_use]
    pub fn has_column(&self, key: ColumnKey) -> bool {
        self.schema.contains(&key)
    }

    /// The recognised columns of the source file.
    #[must_use]
    pub const fn schema(&self) -> &BTreeSet<ColumnKey> {
        &self.schema
    }

    /// One column across all areas, keyed by display name.
    ///
    /// Returns `None` if the source file did not carry the column.
    #[must_use]
    pub fn column(&self, key: ColumnKey) -> Option<BTreeMap<&str, f64>> {
        if !self.has_column(key) {
            return None;
        }
        Some(
            self.areas
                .iter()
                .map(|a| (a.name.as_str(), a.value(key)))
                .collect(),
        )
    }

    /// Boundary for a join key.
    #[must_use]
    pub fn boundary(&self, join_key: &str) -> Option<&GeoBoundary> {
        self.boundaries.get(join_key)
    }

    /// Number of boundaries.
    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Bounding box of every boundary.
    #[must_use]
    pub const fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }
}

fn open(path: &Path) -> Result<std::fs::File, DatasetError> {
    std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use community_safety_crime_models::{CrimeCategory, DataYear, ScoreKind};

    use super::*;

    const CSV: &str = include_str!("../fixtures/crime_areas.csv");
    const GEOJSON: &str = include_str!("../fixtures/boundaries.geojson");

    fn fixture() -> Dataset {
        Dataset::from_readers(CSV.as_bytes(), GEOJSON, &DatasetConfig::default()).unwrap()
    }

    #[test]
    fn adds_placeholders_for_boundaries_without_rows() {
        let dataset = fixture();
        let names: Vec<&str> = dataset.areas().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Albury", "Ballina", "Sydney", "BLACKTOWN"]);

        let blacktown = dataset.area("BLACKTOWN").unwrap();
        assert!(!blacktown.has_data);
        for key in ColumnKey::all() {
            assert!(blacktown.value(key).abs() < f64::EPSILON, "{key} not zero");
        }
        assert!(blacktown.final_safety_score().abs() < f64::EPSILON);
    }

    #[test]
    fn excluded_area_is_gone_everywhere() {
        let dataset = fixture();
        assert!(dataset.area("Lord Howe Island").is_none());
        assert!(dataset.area("LORD HOWE ISLAND").is_none());
        assert!(dataset.boundary("LORD HOWE ISLAND").is_none());
    }

    #[test]
    fn every_boundary_has_an_area() {
        let dataset = fixture();
        for key in ["ALBURY", "BALLINA", "SYDNEY", "BLACKTOWN"] {
            assert!(dataset.boundary(key).is_some(), "{key}");
            assert!(dataset.area(key).is_some(), "{key}");
        }
        assert_eq!(dataset.boundary_count(), 4);
    }

    #[test]
    fn area_names_only_list_crime_rows() {
        assert_eq!(fixture().area_names(), ["Albury", "Ballina", "Sydney"]);
    }

    #[test]
    fn lookup_is_case_insensitive_fallback() {
        let dataset = fixture();
        assert_eq!(dataset.area("Albury").unwrap().join_key, "ALBURY");
        assert_eq!(dataset.area("ALBURY").unwrap().name, "Albury");
        assert_eq!(dataset.area(" ballina ").unwrap().name, "Ballina");
        assert!(dataset.area("Nowhere").is_none());
    }

    #[test]
    fn column_lookup() {
        let dataset = fixture();
        let theft = dataset
            .column(ColumnKey::count(CrimeCategory::Theft, DataYear::Y2023))
            .unwrap();
        assert!((theft["Albury"] - 10.0).abs() < f64::EPSILON);
        assert!((theft["Ballina"] - 20.0).abs() < f64::EPSILON);
        assert!(theft["BLACKTOWN"].abs() < f64::EPSILON);
    }

    #[test]
    fn column_missing_from_schema_is_none() {
        let csv = "LGA,nsw_loca_2,Theft_Count_2023,Final_Safety_Score\nAlbury,ALBURY,10,72\n";
        let dataset =
            Dataset::from_readers(csv.as_bytes(), GEOJSON, &DatasetConfig::default()).unwrap();
        assert!(
            dataset
                .column(ColumnKey::count(CrimeCategory::Drug, DataYear::Y2023))
                .is_none()
        );
        assert!(dataset.has_column(ColumnKey::Score(ScoreKind::Final)));
    }

    #[test]
    fn duplicate_rows_keep_first() {
        let csv = "LGA,nsw_loca_2,Final_Safety_Score\nAlbury,ALBURY,72\nAlbury City,ALBURY,10\n";
        let dataset =
            Dataset::from_readers(csv.as_bytes(), GEOJSON, &DatasetConfig::default()).unwrap();
        let albury = dataset.area("ALBURY").unwrap();
        assert_eq!(albury.name, "Albury");
        assert!((albury.final_safety_score() - 72.0).abs() < f64::EPSILON);
        assert!(dataset.area("Albury City").is_none());
    }

    #[test]
    fn bounds_cover_all_boundaries() {
        let bounds = fixture().bounds().unwrap();
        assert!((bounds.west - 150.0).abs() < 1e-9);
        assert!((bounds.east - 150.7).abs() < 1e-9);
    }

    #[test]
    fn loads_fixtures_through_toml_config() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let config = DatasetConfig {
            dataset_path: fixtures.join("crime_areas.csv"),
            boundaries_path: fixtures.join("boundaries.geojson"),
            ..DatasetConfig::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("dataset.toml");
        std::fs::write(&config_path, toml::to_string(&config).unwrap()).unwrap();

        let read_back = DatasetConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(read_back, config);

        let dataset = Dataset::load(&read_back).unwrap();
        assert_eq!(dataset.area_names(), ["Albury", "Ballina", "Sydney"]);
        assert_eq!(dataset.boundary_count(), 4);
        assert!(dataset.area("BLACKTOWN").is_some());
    }

    #[test]
    fn missing_files_are_fatal() {
        let config = DatasetConfig {
            dataset_path: PathBuf::from("/nonexistent/areas.csv"),
            ..DatasetConfig::default()
        };
        let err = Dataset::load(&config).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
