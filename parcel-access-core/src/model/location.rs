use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// a point read from a point layer. object ids are assigned 1..n in
/// the order features appear in the source dataset.
#[derive(Clone, Debug)]
pub struct PointFeature {
    pub object_id: usize,
    pub geometry: Point<f64>,
    pub properties: Map<String, Value>,
}

impl PointFeature {
    /// the display name of this feature, taken from a `Name` or `name` property
    /// when present, otherwise `Location <object id>`.
    pub fn name(&self) -> String {
        ["Name", "name", "NAME"]
            .iter()
            .find_map(|key| match self.properties.get(*key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("Location {}", self.object_id))
    }
}

/// a named point dataset, ready to be loaded onto an analysis layer.
#[derive(Clone, Debug)]
pub struct PointLayer {
    pub name: String,
    pub features: Vec<PointFeature>,
}

impl PointLayer {
    pub fn new(name: &str, features: Vec<PointFeature>) -> Self {
        Self {
            name: name.to_string(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationStatus {
    Ok,
    NotLocated,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Ok => "OK",
            LocationStatus::NotLocated => "Not Located",
        }
    }
}

/// where a location sits on the network: the edge it was snapped to, the
/// fraction of the edge length from the edge source vertex, and the distance
/// the point was moved while snapping.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NetworkLocation {
    pub edge_index: usize,
    pub fraction: f64,
    pub snap_distance_meters: f64,
}

/// a location loaded onto the Origins or Destinations sublayer.
#[derive(Clone, Debug)]
pub struct NaLocation {
    /// sublayer object id, sequential across every load into the same sublayer
    pub object_id: usize,
    pub name: String,
    /// point layer this location was loaded from
    pub source_name: String,
    /// object id of the feature within its source layer
    pub source_oid: usize,
    pub geometry: Point<f64>,
    /// None when no network edge lies within the search tolerance
    pub network_location: Option<NetworkLocation>,
}

impl NaLocation {
    pub fn new(
        feature: &PointFeature,
        source_name: &str,
        network_location: Option<NetworkLocation>,
    ) -> Self {
        Self {
            object_id: feature.object_id,
            name: feature.name(),
            source_name: source_name.to_string(),
            source_oid: feature.object_id,
            geometry: feature.geometry,
            network_location,
        }
    }

    pub fn status(&self) -> LocationStatus {
        match self.network_location {
            Some(_) => LocationStatus::Ok,
            None => LocationStatus::NotLocated,
        }
    }

    pub fn is_located(&self) -> bool {
        self.network_location.is_some()
    }
}
