use std::collections::HashMap;

use ordered_float::OrderedFloat;
use parcel_access_core::model::{NaLocation, NetworkLocation, OdPair};
use pathfinding::prelude::dijkstra_reach;

use super::CompassNetwork;

type Cost = OrderedFloat<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SearchNode {
    Origin,
    Vertex(usize),
    Destination(usize),
}

/// how each located destination is reached from the vertices at the ends of
/// its snapped edge, in meters.
pub struct DestinationAccess {
    by_vertex: HashMap<usize, Vec<(usize, f64)>>,
    by_edge: HashMap<usize, Vec<(usize, f64)>>,
}

impl DestinationAccess {
    /// destinations are reached forward along their edge from its source
    /// vertex, and from its destination vertex only when a reverse edge exists.
    pub fn new(network: &CompassNetwork, destinations: &[NaLocation]) -> Self {
        let mut by_vertex: HashMap<usize, Vec<(usize, f64)>> = HashMap::new();
        let mut by_edge: HashMap<usize, Vec<(usize, f64)>> = HashMap::new();
        for (d_idx, d) in destinations.iter().enumerate() {
            let Some(loc) = d.network_location else {
                continue;
            };
            let Some(edge) = network.edge(loc.edge_index) else {
                continue;
            };
            by_edge
                .entry(loc.edge_index)
                .or_default()
                .push((d_idx, loc.fraction));
            by_vertex
                .entry(edge.src_vertex_id)
                .or_default()
                .push((d_idx, loc.fraction * edge.distance));
            let reverse = network
                .reverse_edge(loc.edge_index)
                .and_then(|r| network.edge(r));
            if let Some(reverse) = reverse {
                by_vertex
                    .entry(edge.dst_vertex_id)
                    .or_default()
                    .push((d_idx, (1.0 - loc.fraction) * reverse.distance));
            }
        }
        Self { by_vertex, by_edge }
    }

    fn from_vertex(&self, vertex_id: usize) -> &[(usize, f64)] {
        self.by_vertex
            .get(&vertex_id)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    fn on_edge(&self, edge_index: usize) -> &[(usize, f64)] {
        self.by_edge
            .get(&edge_index)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }
}

/// runs a bounded Dijkstra search from one origin, returning every destination
/// reachable within the cutoff along with its least cost in meters.
///
/// # Arguments
///
/// * `network`       - the road network
/// * `access`        - destination access lookup built for this solve
/// * `origin`        - snapped origin location
/// * `cutoff_meters` - search bound
pub fn reachable_destinations(
    network: &CompassNetwork,
    access: &DestinationAccess,
    origin: &NetworkLocation,
    cutoff_meters: f64,
) -> Vec<(usize, f64)> {
    let cutoff = OrderedFloat(cutoff_meters);
    let successors = |node: &SearchNode| -> Vec<(SearchNode, Cost)> {
        match node {
            SearchNode::Origin => origin_successors(network, access, origin),
            SearchNode::Vertex(v) => {
                let edges = network.out_edges(*v).iter().filter_map(|e| {
                    let edge = network.edge(*e)?;
                    Some((SearchNode::Vertex(edge.dst_vertex_id), OrderedFloat(edge.distance)))
                });
                let destinations = access
                    .from_vertex(*v)
                    .iter()
                    .map(|(d, cost)| (SearchNode::Destination(*d), OrderedFloat(*cost)));
                edges.chain(destinations).collect()
            }
            SearchNode::Destination(_) => vec![],
        }
    };
    dijkstra_reach(&SearchNode::Origin, successors)
        .take_while(|item| item.total_cost <= cutoff)
        .filter_map(|item| match item.node {
            SearchNode::Destination(d) => Some((d, item.total_cost.into_inner())),
            _ => None,
        })
        .collect()
}

/// pairs every located origin with its reachable destinations.
pub fn solve_origin(
    network: &CompassNetwork,
    access: &DestinationAccess,
    origin_index: usize,
    origin: &NaLocation,
    cutoff_meters: f64,
) -> Vec<OdPair> {
    match &origin.network_location {
        None => vec![],
        Some(loc) => reachable_destinations(network, access, loc, cutoff_meters)
            .into_iter()
            .map(|(destination, cost)| OdPair {
                origin: origin_index,
                destination,
                cost,
            })
            .collect(),
    }
}

/// the origin enters the network at its snapped position: forward to the edge's
/// destination vertex, backward to its source vertex when a reverse edge exists,
/// and directly to destinations snapped onto the same stretch of road.
fn origin_successors(
    network: &CompassNetwork,
    access: &DestinationAccess,
    origin: &NetworkLocation,
) -> Vec<(SearchNode, Cost)> {
    let Some(edge) = network.edge(origin.edge_index) else {
        return vec![];
    };
    let f = origin.fraction;
    let mut result = vec![(
        SearchNode::Vertex(edge.dst_vertex_id),
        OrderedFloat((1.0 - f) * edge.distance),
    )];
    for (d, g) in access.on_edge(origin.edge_index) {
        if *g >= f {
            result.push((SearchNode::Destination(*d), OrderedFloat((g - f) * edge.distance)));
        }
    }
    let reverse = network
        .reverse_edge(origin.edge_index)
        .and_then(|r| network.edge(r).map(|e| (r, e)));
    if let Some((r_idx, r_edge)) = reverse {
        // a position f along the edge sits at 1 - f along its reverse
        let f_rev = 1.0 - f;
        result.push((
            SearchNode::Vertex(edge.src_vertex_id),
            OrderedFloat((1.0 - f_rev) * r_edge.distance),
        ));
        for (d, g) in access.on_edge(r_idx) {
            if *g >= f_rev {
                result.push((
                    SearchNode::Destination(*d),
                    OrderedFloat((g - f_rev) * r_edge.distance),
                ));
            }
        }
        for (d, g) in access.on_edge(origin.edge_index) {
            if *g < f {
                result.push((
                    SearchNode::Destination(*d),
                    OrderedFloat((f - g) * r_edge.distance),
                ));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compass::EdgeRow;
    use geo::Point;
    use parcel_access_core::model::PointFeature;
    use routee_compass_core::model::network::Vertex;
    use serde_json::Map;

    fn edge(edge_id: usize, src: usize, dst: usize, distance: f64) -> EdgeRow {
        EdgeRow {
            edge_id,
            src_vertex_id: src,
            dst_vertex_id: dst,
            distance,
        }
    }

    /// a chain 0 -> 1 -> 2 -> 3 of 1km edges, with 1 <-> 2 two-way
    fn chain() -> CompassNetwork {
        let vertices = (0..4)
            .map(|i| Vertex::new(i, -77.0 + 0.01 * i as f32, 39.0))
            .collect::<Vec<_>>();
        let edges = vec![
            edge(0, 0, 1, 1000.0),
            edge(1, 1, 2, 1000.0),
            edge(2, 2, 1, 1000.0),
            edge(3, 2, 3, 1000.0),
        ];
        CompassNetwork::new(&vertices, edges).unwrap()
    }

    fn located(oid: usize, edge_index: usize, fraction: f64) -> NaLocation {
        let feature = PointFeature {
            object_id: oid,
            geometry: Point::new(0.0, 0.0),
            properties: Map::new(),
        };
        NaLocation::new(
            &feature,
            "test",
            Some(NetworkLocation {
                edge_index,
                fraction,
                snap_distance_meters: 0.0,
            }),
        )
    }

    fn costs(mut found: Vec<(usize, f64)>) -> Vec<(usize, i64)> {
        found.sort_by_key(|(d, _)| *d);
        found.into_iter().map(|(d, c)| (d, c.round() as i64)).collect()
    }

    #[test]
    fn test_forward_search_respects_cutoff() {
        let network = chain();
        let destinations = vec![located(1, 1, 0.5), located(2, 3, 0.5)];
        let access = DestinationAccess::new(&network, &destinations);
        let origin = located(1, 0, 0.5).network_location.unwrap();

        let found = reachable_destinations(&network, &access, &origin, 5000.0);
        assert_eq!(costs(found), vec![(0, 1000), (1, 2000)]);

        let found = reachable_destinations(&network, &access, &origin, 1500.0);
        assert_eq!(costs(found), vec![(0, 1000)]);
    }

    #[test]
    fn test_one_way_edges_are_not_traversed_backwards() {
        let network = chain();
        // destination on the one-way edge 0 -> 1, origin past it on 2 -> 3
        let destinations = vec![located(1, 0, 0.5)];
        let access = DestinationAccess::new(&network, &destinations);
        let origin = located(1, 3, 0.5).network_location.unwrap();
        let found = reachable_destinations(&network, &access, &origin, 100_000.0);
        assert!(found.is_empty());
    }

    #[test]
    fn test_two_way_edge_reached_from_either_end() {
        let network = chain();
        // destination at 0.25 along 1 -> 2, origin at 0.75 along the same edge
        let destinations = vec![located(1, 1, 0.25)];
        let access = DestinationAccess::new(&network, &destinations);
        let origin = located(1, 1, 0.75).network_location.unwrap();
        let found = reachable_destinations(&network, &access, &origin, 5000.0);
        assert_eq!(costs(found), vec![(0, 500)]);
    }

    #[test]
    fn test_same_edge_ahead_of_origin() {
        let network = chain();
        let destinations = vec![located(1, 0, 0.9)];
        let access = DestinationAccess::new(&network, &destinations);
        let origin = located(1, 0, 0.1).network_location.unwrap();
        let found = reachable_destinations(&network, &access, &origin, 5000.0);
        assert_eq!(costs(found), vec![(0, 800)]);
    }

    #[test]
    fn test_unlocated_origin_has_no_pairs() {
        let network = chain();
        let destinations = vec![located(1, 0, 0.9)];
        let access = DestinationAccess::new(&network, &destinations);
        let feature = PointFeature {
            object_id: 1,
            geometry: Point::new(0.0, 0.0),
            properties: Map::new(),
        };
        let origin = NaLocation::new(&feature, "test", None);
        assert!(solve_origin(&network, &access, 0, &origin, 5000.0).is_empty());
    }
}
