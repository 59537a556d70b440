use geo::Geometry;
use geojson::Feature;
use parcel_access_core::model::{
    spatial_join::AccessibilityRecord, AnnotatedOrigin, ImpedanceAttribute, NaLocation, OdLine,
};
use serde_json::{json, Map, Value};

use crate::workspace::geojson_ops;

/// name of the destination count field joined onto origins
pub const FREQUENCY_FIELD: &str = "FREQUENCY";

pub fn line_features(lines: &[OdLine], impedance: &ImpedanceAttribute) -> Vec<Feature> {
    lines
        .iter()
        .map(|line| {
            let geometry = line.geometry.clone().map(Geometry::LineString);
            geojson_ops::feature(geometry.as_ref(), line.properties(impedance))
        })
        .collect()
}

/// the Origins sublayer with the frequency field joined on. `annotated` holds
/// one entry per origin in sublayer order.
pub fn origin_features(origins: &[NaLocation], annotated: &[AnnotatedOrigin]) -> Vec<Feature> {
    origins
        .iter()
        .zip(annotated.iter())
        .map(|(location, origin)| {
            let mut props: Map<String, Value> = Map::new();
            props.insert(String::from("OBJECTID"), json!(location.object_id));
            props.insert(String::from("Name"), json!(location.name));
            props.insert(String::from("SourceName"), json!(location.source_name));
            props.insert(String::from("SourceOID"), json!(location.source_oid));
            props.insert(String::from("Status"), json!(location.status().as_str()));
            let (snap, along) = match &location.network_location {
                Some(loc) => (Some(loc.snap_distance_meters), Some(loc.fraction)),
                None => (None, None),
            };
            props.insert(String::from("SnapDistance"), json!(snap));
            props.insert(String::from("PosAlong"), json!(along));
            props.insert(FREQUENCY_FIELD.to_string(), json!(origin.frequency));
            let geometry = Geometry::Point(origin.geometry);
            geojson_ops::feature(Some(&geometry), props)
        })
        .collect()
}

pub fn accessibility_features(records: &[AccessibilityRecord], value_field: &str) -> Vec<Feature> {
    records
        .iter()
        .map(|r| geojson_ops::feature(Some(&r.geometry), r.attributes(value_field)))
        .collect()
}
