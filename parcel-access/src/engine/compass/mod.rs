mod compass_engine;
mod compass_network;
mod od_solver;
mod snapping;

pub use compass_engine::CompassEngine;
pub use compass_network::{CompassNetwork, EdgeRow, EDGES_FILENAME, VERTICES_FILENAME};
pub use snapping::snap_to_network;
