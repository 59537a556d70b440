use geo::Point;
use parcel_access_core::{
    model::NetworkLocation,
    util::geo_utils::{haversine_meters, project_onto_segment},
};
use uom::si::f64::Length;

use super::CompassNetwork;

/// number of planar-nearest edges ranked by geodesic distance when snapping
const SNAP_CANDIDATES: usize = 8;

/// snaps a point onto the geodesically nearest edge among the planar-nearest
/// candidates.
///
/// # Arguments
///
/// * `network`   - network to snap onto
/// * `point`     - WGS84 location
/// * `tolerance` - maximum snapping distance
///
/// # Returns
///
/// the network location, or None when no edge lies within the tolerance
pub fn snap_to_network(
    network: &CompassNetwork,
    point: &Point<f64>,
    tolerance: Length,
) -> Option<NetworkLocation> {
    let tolerance_meters = tolerance.get::<uom::si::length::meter>();
    network
        .nearest_edges(point, SNAP_CANDIDATES)
        .into_iter()
        .filter_map(|edge_index| {
            let (src, dst) = network.edge_segment(edge_index)?;
            let (fraction, projected) = project_onto_segment(src, dst, point.0);
            Some(NetworkLocation {
                edge_index,
                fraction,
                snap_distance_meters: haversine_meters(point.0, projected),
            })
        })
        .min_by(|a, b| a.snap_distance_meters.total_cmp(&b.snap_distance_meters))
        .filter(|location| location.snap_distance_meters <= tolerance_meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compass::EdgeRow;
    use routee_compass_core::model::network::Vertex;

    fn network() -> CompassNetwork {
        let vertices = vec![Vertex::new(0, -77.0, 39.0), Vertex::new(1, -76.99, 39.0)];
        let edges = vec![EdgeRow {
            edge_id: 0,
            src_vertex_id: 0,
            dst_vertex_id: 1,
            distance: 864.0,
        }];
        CompassNetwork::new(&vertices, edges).unwrap()
    }

    fn meters(value: f64) -> Length {
        Length::new::<uom::si::length::meter>(value)
    }

    #[test]
    fn test_snap_within_tolerance() {
        // ~111m north of the edge midpoint
        let point = Point::new(-76.995, 39.001);
        let location = snap_to_network(&network(), &point, meters(200.0)).unwrap();
        assert_eq!(location.edge_index, 0);
        assert!((location.fraction - 0.5).abs() < 1e-3);
        assert!((location.snap_distance_meters - 111.2).abs() < 1.0);
    }

    #[test]
    fn test_snap_beyond_tolerance() {
        let point = Point::new(-76.995, 39.001);
        assert_eq!(snap_to_network(&network(), &point, meters(100.0)), None);
    }
}
