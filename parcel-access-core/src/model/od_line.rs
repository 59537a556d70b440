use std::cmp::Ordering;

use geo::LineString;
use serde_json::{json, Map, Value};

use crate::model::{ImpedanceAttribute, NaLocation, OutputLines};

/// one solved origin-destination pair of the Lines sublayer.
#[derive(Clone, Debug, PartialEq)]
pub struct OdLine {
    pub object_id: usize,
    pub name: String,
    pub origin_id: usize,
    pub destination_id: usize,
    /// 1 for the nearest destination of this origin, 2 for the next, etc.
    pub destination_rank: usize,
    /// accumulated impedance from origin to destination
    pub total_cost: f64,
    /// a straight line between the pair, only present when line shapes were requested
    pub geometry: Option<LineString<f64>>,
}

impl OdLine {
    /// attribute table row of this line, with the cost field named after the impedance.
    pub fn properties(&self, impedance: &ImpedanceAttribute) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(String::from("ObjectID"), json!(self.object_id));
        props.insert(String::from("Name"), json!(self.name));
        props.insert(String::from("OriginID"), json!(self.origin_id));
        props.insert(String::from("DestinationID"), json!(self.destination_id));
        props.insert(String::from("DestinationRank"), json!(self.destination_rank));
        props.insert(impedance.total_field_name(), json!(self.total_cost));
        props
    }
}

/// a solved pair, indexing into the Origins and Destinations sublayers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OdPair {
    pub origin: usize,
    pub destination: usize,
    pub cost: f64,
}

/// builds the Lines sublayer from solved pairs. lines are grouped by origin,
/// ordered by ascending cost (ties broken by destination object id) and ranked
/// within their origin. object ids follow that order starting at 1.
pub fn assemble_lines(
    origins: &[NaLocation],
    destinations: &[NaLocation],
    mut pairs: Vec<OdPair>,
    output_lines: OutputLines,
) -> Vec<OdLine> {
    pairs.sort_by(|a, b| {
        origins[a.origin]
            .object_id
            .cmp(&origins[b.origin].object_id)
            .then(a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal))
            .then(
                destinations[a.destination]
                    .object_id
                    .cmp(&destinations[b.destination].object_id),
            )
    });
    let mut lines: Vec<OdLine> = Vec::with_capacity(pairs.len());
    let mut rank = 0;
    for pair in pairs.into_iter() {
        let origin = &origins[pair.origin];
        let destination = &destinations[pair.destination];
        rank = match lines.last() {
            Some(prev) if prev.origin_id == origin.object_id => rank + 1,
            _ => 1,
        };
        let geometry = match output_lines {
            OutputLines::NoLines => None,
            OutputLines::StraightLines => Some(LineString::from(vec![
                origin.geometry.0,
                destination.geometry.0,
            ])),
        };
        lines.push(OdLine {
            object_id: lines.len() + 1,
            name: format!("{} - {}", origin.name, destination.name),
            origin_id: origin.object_id,
            destination_id: destination.object_id,
            destination_rank: rank,
            total_cost: pair.cost,
            geometry,
        });
    }
    lines
}
