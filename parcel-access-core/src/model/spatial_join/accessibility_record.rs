use geo::Geometry;
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use super::{
    join_ops::{JOIN_COUNT_FIELD, TARGET_FID_FIELD},
    JoinValue,
};

/// a parcel annotated with the merged destination count of the origins it
/// contains. one record exists per parcel, joined or not.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessibilityRecord {
    /// object id of the parcel
    pub target_fid: usize,
    /// number of origins intersecting the parcel
    pub join_count: usize,
    /// merged count, None when no origin intersects the parcel
    pub value: Option<JoinValue>,
    pub geometry: Geometry<f64>,
    /// attributes of the parcel, carried through
    pub properties: Map<String, Value>,
    /// fields joined after the spatial join, such as a baseline scenario value
    pub extra_fields: IndexMap<String, Option<JoinValue>>,
}

impl AccessibilityRecord {
    /// the output attribute row: join metadata, parcel attributes, the
    /// merged value under `value_field`, then any extra fields.
    pub fn attributes(&self, value_field: &str) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(JOIN_COUNT_FIELD.to_string(), json!(self.join_count));
        props.insert(TARGET_FID_FIELD.to_string(), json!(self.target_fid));
        for (k, v) in self.properties.iter() {
            props.insert(k.clone(), v.clone());
        }
        props.insert(value_field.to_string(), json!(self.value));
        for (k, v) in self.extra_fields.iter() {
            props.insert(k.clone(), json!(v));
        }
        props
    }
}
