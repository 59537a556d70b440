use geo::Geometry;
use serde_json::{Map, Value};

/// a polygonal target feature, such as a property parcel. object ids are
/// assigned 1..n in source order.
#[derive(Clone, Debug)]
pub struct PolygonFeature {
    pub object_id: usize,
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
}
