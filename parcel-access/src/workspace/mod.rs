mod access_workspace;
mod workspace_error;

pub mod geojson_ops;

pub use access_workspace::Workspace;
pub use workspace_error::WorkspaceError;
