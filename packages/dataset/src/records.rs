//! Per-area records and the CSV reader that produces them.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use community_safety_crime_models::{ColumnKey, CrimeCategory, DataYear, ScoreKind};
use serde::Serialize;

use crate::{DatasetConfig, DatasetError};

/// One suburb / LGA row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    /// Display name, unique across the dataset.
    pub name: String,
    /// Key shared with the boundary file.
    pub join_key: String,
    /// `false` for zero-filled placeholders synthesized from a boundary
    /// that has no crime row.
    pub has_data: bool,
    values: BTreeMap<ColumnKey, f64>,
}

impl AreaRecord {
    /// Creates a record from parsed column values.
    #[must_use]
    pub const fn new(name: String, join_key: String, values: BTreeMap<ColumnKey, f64>) -> Self {
        Self {
            name,
            join_key,
            has_data: true,
            values,
        }
    }

    /// Creates a zero-valued record for a boundary with no crime row.
    /// The join key doubles as the display name.
    #[must_use]
    pub fn placeholder(join_key: &str) -> Self {
        Self {
            name: join_key.to_string(),
            join_key: join_key.to_string(),
            has_data: false,
            values: ColumnKey::all().into_iter().map(|key| (key, 0.0)).collect(),
        }
    }

    /// Value of a column, or 0 if the source file did not have it.
    #[must_use]
    pub fn value(&self, key: ColumnKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    /// `{category}_Count_{year}`
    #[must_use]
    pub fn count(&self, category: CrimeCategory, year: DataYear) -> f64 {
        self.value(ColumnKey::count(category, year))
    }

    /// `{category}_Rate_{year}`
    #[must_use]
    pub fn rate(&self, category: CrimeCategory, year: DataYear) -> f64 {
        self.value(ColumnKey::rate(category, year))
    }

    /// `Predicted_{category}_2025`
    #[must_use]
    pub fn predicted(&self, category: CrimeCategory) -> f64 {
        self.value(ColumnKey::Predicted(category))
    }

    /// `Final_Safety_Score`
    #[must_use]
    pub fn final_safety_score(&self) -> f64 {
        self.value(ColumnKey::Score(ScoreKind::Final))
    }

    /// Iterates over every stored column value.
    pub fn values(&self) -> impl Iterator<Item = (ColumnKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// Rows read from the crime CSV together with the columns it carried.
#[derive(Debug, Clone, Default)]
pub struct CrimeTable {
    /// Rows in file order.
    pub rows: Vec<AreaRecord>,
    /// Recognised columns present in the header.
    pub schema: BTreeSet<ColumnKey>,
}

/// Reads the per-area CSV.
///
/// Header names that are not part of the column key space (for example
/// `Color_Code`) are ignored. Empty cells, `NaN` and infinities read as 0.
/// Excluded areas are dropped here.
///
/// # Errors
///
/// * [`DatasetError::MissingColumn`] if the name column, join column or
///   `Final_Safety_Score` is absent.
/// * [`DatasetError::InvalidValue`] if a numeric cell does not parse.
/// * [`DatasetError::Csv`] on malformed CSV.
pub fn read_crime_table<R: Read>(
    reader: R,
    config: &DatasetConfig,
) -> Result<CrimeTable, DatasetError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();

    let find = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DatasetError::MissingColumn {
                column: column.to_string(),
            })
    };
    let name_idx = find(&config.name_column)?;
    let join_idx = find(&config.join_column)?;

    let columns: Vec<(usize, ColumnKey)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| h.parse::<ColumnKey>().ok().map(|key| (i, key)))
        .collect();
    let schema: BTreeSet<ColumnKey> = columns.iter().map(|(_, key)| *key).collect();

    if !schema.contains(&ColumnKey::final_score()) {
        return Err(DatasetError::MissingColumn {
            column: ColumnKey::final_score().to_string(),
        });
    }

    let ignored = headers.len().saturating_sub(columns.len() + 2);
    if ignored > 0 {
        log::debug!("Ignoring {ignored} unrecognised CSV column(s)");
    }

    let mut rows = Vec::new();
    let mut excluded = 0usize;

    for record in csv.records() {
        let record = record?;
        let name = record.get(name_idx).unwrap_or_default().to_string();
        let join_key = record.get(join_idx).unwrap_or_default().to_string();

        if name.is_empty() {
            log::warn!("Skipping CSV row with empty {}", config.name_column);
            continue;
        }
        if config.is_excluded(&name) || config.is_excluded(&join_key) {
            excluded += 1;
            continue;
        }

        let mut values = BTreeMap::new();
        for &(idx, key) in &columns {
            let raw = record.get(idx).unwrap_or_default();
            let value = parse_cell(raw).ok_or_else(|| DatasetError::InvalidValue {
                area: name.clone(),
                column: key.to_string(),
                value: raw.to_string(),
            })?;
            values.insert(key, value);
        }

        rows.push(AreaRecord::new(name, join_key, values));
    }

    log::info!(
        "Read {} area rows ({} columns, {excluded} excluded)",
        rows.len(),
        schema.len()
    );

    Ok(CrimeTable { rows, schema })
}

/// Parses one numeric cell. Empty, `NaN` and infinite cells become 0.
fn parse_cell(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(0.0);
    }
    let value: f64 = raw.parse().ok()?;
    if value.is_finite() { Some(value) } else { Some(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/crime_areas.csv");

    fn read(csv: &str) -> Result<CrimeTable, DatasetError> {
        read_crime_table(csv.as_bytes(), &DatasetConfig::default())
    }

    #[test]
    fn reads_fixture_rows_and_drops_excluded_area() {
        let table = read(FIXTURE).unwrap();
        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Albury", "Ballina", "Sydney"]);
        assert_eq!(table.schema.len(), ColumnKey::all().len());
    }

    #[test]
    fn reads_typed_values() {
        let table = read(FIXTURE).unwrap();
        let albury = &table.rows[0];
        assert_eq!(albury.join_key, "ALBURY");
        assert!(albury.has_data);
        assert!((albury.count(CrimeCategory::Theft, DataYear::Y2023) - 10.0).abs() < f64::EPSILON);
        assert!((albury.rate(CrimeCategory::Theft, DataYear::Y2020) - 10.5).abs() < f64::EPSILON);
        assert!((albury.predicted(CrimeCategory::Theft) - 12.0).abs() < f64::EPSILON);
        assert!((albury.final_safety_score() - 72.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_and_nan_cells_read_as_zero() {
        let table = read("LGA,nsw_loca_2,Theft_Count_2023,Final_Safety_Score\nAlbury,ALBURY,,NaN\n")
            .unwrap();
        let albury = &table.rows[0];
        assert!(albury.count(CrimeCategory::Theft, DataYear::Y2023).abs() < f64::EPSILON);
        assert!(albury.final_safety_score().abs() < f64::EPSILON);
    }

    #[test]
    fn infinite_cells_read_as_zero() {
        let table = read(
            "LGA,nsw_loca_2,Theft_Count_2023,Final_Safety_Score\nAlbury,ALBURY,-inf,inf\n",
        )
        .unwrap();
        let albury = &table.rows[0];
        assert!(albury.count(CrimeCategory::Theft, DataYear::Y2023).abs() < f64::EPSILON);
        assert!(albury.final_safety_score().abs() < f64::EPSILON);
    }

    #[test]
    fn missing_final_score_is_fatal() {
        let err = read("LGA,nsw_loca_2,Theft_Count_2023\nAlbury,ALBURY,10\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { ref column } if column == "Final_Safety_Score"
        ));
    }

    #[test]
    fn missing_name_column_is_fatal() {
        let err = read("Suburb,nsw_loca_2,Final_Safety_Score\nAlbury,ALBURY,10\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column } if column == "LGA"));
    }

    #[test]
    fn unparsable_number_is_fatal() {
        let err = read("LGA,nsw_loca_2,Final_Safety_Score\nAlbury,ALBURY,high\n").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidValue { ref value, .. } if value == "high"));
    }

    #[test]
    fn placeholder_is_zero_everywhere() {
        let record = AreaRecord::placeholder("BLACKTOWN");
        assert_eq!(record.name, "BLACKTOWN");
        assert!(!record.has_data);
        assert_eq!(record.values().count(), ColumnKey::all().len());
        assert!(record.values().all(|(_, v)| v == 0.0));
    }
}
