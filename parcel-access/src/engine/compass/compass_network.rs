use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use geo::{Coord, Point};
use kdam::Bar;
use routee_compass_core::{model::network::Vertex, util::fs::read_utils};
use rstar::{
    primitives::{GeomWithData, Line},
    RTree,
};
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

pub const VERTICES_FILENAME: &str = "vertices-compass.csv.gz";
pub const EDGES_FILENAME: &str = "edges-compass.csv.gz";

/// one row of a compass edges file. distance is in meters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EdgeRow {
    pub edge_id: usize,
    pub src_vertex_id: usize,
    pub dst_vertex_id: usize,
    pub distance: f64,
}

type EdgeSegment = GeomWithData<Line<[f64; 2]>, usize>;

/// a directed road network with WGS84 vertex coordinates, indexed for
/// nearest-edge lookups.
pub struct CompassNetwork {
    coordinates: Vec<Coord<f64>>,
    edges: Vec<EdgeRow>,
    /// outgoing edge indices by vertex id
    adjacency: Vec<Vec<usize>>,
    /// edge index by (src, dst) vertex pair
    edge_lookup: HashMap<(usize, usize), usize>,
    rtree: RTree<EdgeSegment>,
}

impl CompassNetwork {
    /// builds a network from vertices and edges. vertex ids must be dense and
    /// match their position, and every edge must reference known vertices.
    pub fn new(vertices: &[Vertex], edges: Vec<EdgeRow>) -> Result<Self, String> {
        let coordinates = vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                if v.vertex_id.0 != idx {
                    Err(format!(
                        "vertex ids must be dense and ordered, found id {} at row {idx}",
                        v.vertex_id.0
                    ))
                } else {
                    Ok(Coord {
                        x: f64::from(v.x()),
                        y: f64::from(v.y()),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut adjacency: Vec<Vec<usize>> = vec![vec![]; coordinates.len()];
        let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::with_capacity(edges.len());
        let mut segments = Vec::with_capacity(edges.len());
        for (idx, edge) in edges.iter().enumerate() {
            let (src, dst) = (edge.src_vertex_id, edge.dst_vertex_id);
            let (Some(a), Some(b)) = (coordinates.get(src), coordinates.get(dst)) else {
                return Err(format!(
                    "edge {} references missing vertex ({src} -> {dst})",
                    edge.edge_id
                ));
            };
            if !(edge.distance.is_finite() && edge.distance >= 0.0) {
                return Err(format!(
                    "edge {} has invalid distance {}",
                    edge.edge_id, edge.distance
                ));
            }
            adjacency[src].push(idx);
            // parallel edges: keep the shorter one for reverse lookups
            let shorter = match edge_lookup.get(&(src, dst)) {
                Some(&prev) => edges[prev].distance > edge.distance,
                None => true,
            };
            if shorter {
                edge_lookup.insert((src, dst), idx);
            }
            segments.push(GeomWithData::new(Line::new([a.x, a.y], [b.x, b.y]), idx));
        }

        Ok(Self {
            coordinates,
            edges,
            adjacency,
            edge_lookup,
            rtree: RTree::bulk_load(segments),
        })
    }

    /// loads a network dataset directory holding compass vertex and edge files.
    /// uncompressed `.csv` files are accepted in place of `.csv.gz`.
    pub fn from_directory(directory: &Path) -> Result<Self, EngineError> {
        if !directory.is_dir() {
            return Err(EngineError::NetworkLoad {
                path: directory.to_path_buf(),
                message: String::from("network dataset directory does not exist"),
            });
        }
        let vertices_file = resolve_file(directory, VERTICES_FILENAME)?;
        let edges_file = resolve_file(directory, EDGES_FILENAME)?;

        let vertices: Box<[Vertex]> = read_utils::from_csv(
            &vertices_file,
            true,
            Some(Bar::builder().desc("read vertices file")),
            None,
        )
        .map_err(|e| EngineError::NetworkLoad {
            path: vertices_file.clone(),
            message: e.to_string(),
        })?;
        let edges: Box<[EdgeRow]> = read_utils::from_csv(
            &edges_file,
            true,
            Some(Bar::builder().desc("read edges file")),
            None,
        )
        .map_err(|e| EngineError::NetworkLoad {
            path: edges_file.clone(),
            message: e.to_string(),
        })?;

        Self::new(&vertices, edges.into_vec()).map_err(|message| EngineError::InvalidNetwork {
            path: directory.to_path_buf(),
            message,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.coordinates.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, edge_index: usize) -> Option<&EdgeRow> {
        self.edges.get(edge_index)
    }

    pub fn out_edges(&self, vertex_id: usize) -> &[usize] {
        self.adjacency
            .get(vertex_id)
            .map(|e| e.as_slice())
            .unwrap_or_default()
    }

    /// the edge traversing the same pair of vertices in the opposite direction, if any
    pub fn reverse_edge(&self, edge_index: usize) -> Option<usize> {
        let edge = self.edges.get(edge_index)?;
        self.edge_lookup
            .get(&(edge.dst_vertex_id, edge.src_vertex_id))
            .copied()
    }

    /// endpoints of an edge as (source, destination) coordinates
    pub fn edge_segment(&self, edge_index: usize) -> Option<(Coord<f64>, Coord<f64>)> {
        let edge = self.edges.get(edge_index)?;
        Some((
            self.coordinates[edge.src_vertex_id],
            self.coordinates[edge.dst_vertex_id],
        ))
    }

    /// the `k` edges nearest to the point by planar distance in degrees, nearest
    /// first. planar order only approximates geodesic order, so callers should
    /// rank the candidates geodesically.
    pub fn nearest_edges(&self, point: &Point<f64>, k: usize) -> Vec<usize> {
        let query = [point.x(), point.y()];
        self.rtree
            .nearest_neighbor_iter(&query)
            .take(k)
            .map(|segment| segment.data)
            .collect()
    }
}

fn resolve_file(directory: &Path, filename: &str) -> Result<PathBuf, EngineError> {
    let gz = directory.join(filename);
    if gz.is_file() {
        return Ok(gz);
    }
    let plain = directory.join(filename.trim_end_matches(".gz"));
    if plain.is_file() {
        return Ok(plain);
    }
    Err(EngineError::NetworkLoad {
        path: directory.to_path_buf(),
        message: format!("missing {filename}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(edge_id: usize, src: usize, dst: usize, distance: f64) -> EdgeRow {
        EdgeRow {
            edge_id,
            src_vertex_id: src,
            dst_vertex_id: dst,
            distance,
        }
    }

    #[test]
    fn test_reverse_edge_lookup() {
        let vertices = vec![
            Vertex::new(0, -77.0, 39.0),
            Vertex::new(1, -76.99, 39.0),
            Vertex::new(2, -76.98, 39.0),
        ];
        let edges = vec![
            edge(0, 0, 1, 864.0),
            edge(1, 1, 0, 864.0),
            edge(2, 1, 2, 864.0),
        ];
        let network = CompassNetwork::new(&vertices, edges).unwrap();
        assert_eq!(network.n_vertices(), 3);
        assert_eq!(network.n_edges(), 3);
        assert_eq!(network.reverse_edge(0), Some(1));
        assert_eq!(network.reverse_edge(1), Some(0));
        assert_eq!(network.reverse_edge(2), None);
        assert_eq!(network.out_edges(1), &[1, 2]);
        assert!(network.out_edges(7).is_empty());
    }

    #[test]
    fn test_nearest_edges() {
        let vertices = vec![
            Vertex::new(0, -77.0, 39.0),
            Vertex::new(1, -76.99, 39.0),
            Vertex::new(2, -77.0, 39.01),
            Vertex::new(3, -76.99, 39.01),
        ];
        let edges = vec![edge(0, 0, 1, 864.0), edge(1, 2, 3, 864.0)];
        let network = CompassNetwork::new(&vertices, edges).unwrap();
        let nearest = network.nearest_edges(&Point::new(-76.995, 39.008), 2);
        assert_eq!(nearest, vec![1, 0]);
    }

    #[test]
    fn test_invalid_network() {
        let vertices = vec![Vertex::new(0, -77.0, 39.0), Vertex::new(1, -76.99, 39.0)];
        let result = CompassNetwork::new(&vertices, vec![edge(0, 0, 5, 10.0)]);
        assert!(result.is_err());
        let result = CompassNetwork::new(&vertices, vec![edge(0, 0, 1, -1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_directory() {
        let result = CompassNetwork::from_directory(Path::new("/does/not/exist/Base_ND"));
        assert!(matches!(result, Err(EngineError::NetworkLoad { .. })));
    }
}
