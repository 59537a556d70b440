//! reading point and polygon layers from GeoJSON and writing feature classes back.

use std::{fs::File, io::BufWriter, path::Path};

use geo::Geometry;
use geojson::{Feature, FeatureCollection, GeoJson};
use parcel_access_core::model::{spatial_join::PolygonFeature, PointFeature};
use serde_json::{Map, Value};

use super::WorkspaceError;

/// reads a GeoJSON file that must hold a FeatureCollection
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, WorkspaceError> {
    if !path.is_file() {
        return Err(WorkspaceError::DatasetNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| WorkspaceError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let geojson = contents
        .parse::<GeoJson>()
        .map_err(|e| WorkspaceError::ReadError {
            path: path.to_path_buf(),
            message: format!("failed to parse GeoJSON: {e}"),
        })?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(WorkspaceError::ReadError {
            path: path.to_path_buf(),
            message: String::from("geojson in file must be a FeatureCollection"),
        }),
    }
}

/// converts a collection of Point features. object ids follow file order, starting at 1.
/// a MultiPoint holding exactly one point is accepted as that point.
pub fn point_features(
    path: &Path,
    collection: FeatureCollection,
) -> Result<Vec<PointFeature>, WorkspaceError> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let (geometry, properties) = decode_feature(path, index, feature)?;
            let point = match geometry {
                Geometry::Point(p) => Ok(p),
                Geometry::MultiPoint(mp) if mp.0.len() == 1 => Ok(mp.0[0]),
                _ => Err(WorkspaceError::InvalidFeature {
                    path: path.to_path_buf(),
                    index,
                    message: String::from("expected a Point geometry"),
                }),
            }?;
            Ok(PointFeature {
                object_id: index + 1,
                geometry: point,
                properties,
            })
        })
        .collect()
}

/// converts a collection of Polygon or MultiPolygon features. object ids follow
/// file order, starting at 1.
pub fn polygon_features(
    path: &Path,
    collection: FeatureCollection,
) -> Result<Vec<PolygonFeature>, WorkspaceError> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let (geometry, properties) = decode_feature(path, index, feature)?;
            match geometry {
                Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok(PolygonFeature {
                    object_id: index + 1,
                    geometry,
                    properties,
                }),
                _ => Err(WorkspaceError::InvalidFeature {
                    path: path.to_path_buf(),
                    index,
                    message: String::from("expected a Polygon or MultiPolygon geometry"),
                }),
            }
        })
        .collect()
}

/// builds an output feature. a feature class row without a shape gets a null geometry.
pub fn feature(geometry: Option<&Geometry<f64>>, properties: Map<String, Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: geometry.map(|g| geojson::Geometry::new(geojson::Value::from(g))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn write_feature_collection(
    path: &Path,
    features: Vec<Feature>,
) -> Result<(), WorkspaceError> {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    let file = File::create(path).map_err(|e| WorkspaceError::WriteError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::to_writer(BufWriter::new(file), &collection).map_err(|e| {
        WorkspaceError::WriteError {
            path: path.to_path_buf(),
            message: format!("failed to serialize GeoJSON: {e}"),
        }
    })
}

fn decode_feature(
    path: &Path,
    index: usize,
    feature: Feature,
) -> Result<(Geometry<f64>, Map<String, Value>), WorkspaceError> {
    let geom_json = feature
        .geometry
        .ok_or_else(|| WorkspaceError::InvalidFeature {
            path: path.to_path_buf(),
            index,
            message: String::from("feature has no geometry"),
        })?;
    let geometry: Geometry<f64> =
        geom_json
            .try_into()
            .map_err(|e| WorkspaceError::InvalidFeature {
                path: path.to_path_buf(),
                index,
                message: format!("failure decoding GeoJson geometry to geo-types: {e}"),
            })?;
    Ok((geometry, feature.properties.unwrap_or_default()))
}
