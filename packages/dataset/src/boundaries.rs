//! Suburb boundary polygons.
//!
//! The boundary file is a `GeoJSON` `FeatureCollection` whose features carry
//! the join key in one of their properties. Geometries are kept as `GeoJSON`
//! for the map renderer and converted to [`MultiPolygon`] once to compute
//! bounding boxes.

use std::str::FromStr;

use community_safety_crime_models::BoundingBox;
use geo::{BoundingRect, MultiPolygon};
use geojson::{Feature, GeoJson};

use crate::{DatasetConfig, DatasetError};

/// One area polygon keyed by the join key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBoundary {
    /// Join key shared with [`crate::AreaRecord::join_key`].
    pub key: String,
    /// Polygon or multipolygon, as found in the source file.
    pub geometry: geojson::Geometry,
    /// Bounding box of the geometry.
    pub bounds: Option<BoundingBox>,
}

/// Parses the boundary `FeatureCollection`.
///
/// Features without the key property, without a geometry, or with a
/// non-polygonal geometry are skipped with a warning. Excluded areas are
/// dropped.
///
/// # Errors
///
/// Returns [`DatasetError::GeoJson`] if the text is not `GeoJSON`, or
/// [`DatasetError::Conversion`] if it is not a `FeatureCollection`.
pub fn parse_boundaries(
    geojson_str: &str,
    config: &DatasetConfig,
) -> Result<Vec<GeoBoundary>, DatasetError> {
    let GeoJson::FeatureCollection(collection) = GeoJson::from_str(geojson_str)? else {
        return Err(DatasetError::Conversion {
            message: "Boundary file is not a GeoJSON FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let mut boundaries = Vec::with_capacity(total);

    for (i, feature) in collection.features.into_iter().enumerate() {
        let Some(key) = feature_key(&feature, &config.boundary_key_property) else {
            log::warn!(
                "Skipping boundary feature {i}: no '{}' property",
                config.boundary_key_property
            );
            continue;
        };

        if config.is_excluded(&key) {
            continue;
        }

        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping boundary {key}: no geometry");
            continue;
        };

        let Some(multi_polygon) = to_multipolygon(&geometry) else {
            log::warn!("Skipping boundary {key}: geometry is not a polygon");
            continue;
        };

        boundaries.push(GeoBoundary {
            bounds: bounding_box(&multi_polygon),
            key,
            geometry,
        });
    }

    log::info!("Parsed {} of {total} boundary features", boundaries.len());

    Ok(boundaries)
}

fn feature_key(feature: &Feature, property: &str) -> Option<String> {
    let key = feature.property(property)?.as_str()?.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

fn bounding_box(mp: &MultiPolygon<f64>) -> Option<BoundingBox> {
    mp.bounding_rect().map(|rect| BoundingBox {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    })
}

/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/boundaries.geojson");

    #[test]
    fn parses_polygons_and_skips_bad_features() {
        let boundaries = parse_boundaries(FIXTURE, &DatasetConfig::default()).unwrap();
        let keys: Vec<&str> = boundaries.iter().map(|b| b.key.as_str()).collect();
        // unlabelled feature, point geometry and the excluded island are dropped
        assert_eq!(keys, ["ALBURY", "BALLINA", "SYDNEY", "BLACKTOWN"]);
    }

    #[test]
    fn computes_bounds() {
        let boundaries = parse_boundaries(FIXTURE, &DatasetConfig::default()).unwrap();
        let albury = boundaries[0].bounds.unwrap();
        assert!((albury.west - 150.0).abs() < 1e-9);
        assert!((albury.south - -34.0).abs() < 1e-9);
        assert!((albury.east - 150.1).abs() < 1e-9);
        assert!((albury.north - -33.9).abs() < 1e-9);
    }

    #[test]
    fn keeps_excluded_area_when_not_configured() {
        let config = DatasetConfig {
            excluded_areas: Vec::new(),
            ..DatasetConfig::default()
        };
        let boundaries = parse_boundaries(FIXTURE, &config).unwrap();
        assert!(boundaries.iter().any(|b| b.key == "LORD HOWE ISLAND"));
    }

    #[test]
    fn rejects_non_collection() {
        let err = parse_boundaries(
            r#"{"type":"Point","coordinates":[151.0,-33.0]}"#,
            &DatasetConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Conversion { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_boundaries("{not json", &DatasetConfig::default()).is_err());
    }

    #[test]
    fn union_grows_box() {
        let a = BoundingBox {
            west: 0.0,
            south: 0.0,
            east: 1.0,
            north: 1.0,
        };
        let b = BoundingBox {
            west: -1.0,
            south: 0.5,
            east: 0.5,
            north: 2.0,
        };
        assert_eq!(
            a.union(b),
            BoundingBox {
                west: -1.0,
                south: 0.0,
                east: 1.0,
                north: 2.0,
            }
        );
    }
}
