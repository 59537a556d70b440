use std::path::PathBuf;

use parcel_access_core::model::ModelError;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("extension '{0}' is not available")]
    ExtensionUnavailable(String),
    #[error("extension '{0}' is not checked out")]
    ExtensionNotCheckedOut(String),
    #[error("failure loading network dataset '{path}': {message}")]
    NetworkLoad { path: PathBuf, message: String },
    #[error("invalid network dataset '{path}': {message}")]
    InvalidNetwork { path: PathBuf, message: String },
    #[error("analysis layer '{0}' is not bound to a loaded network dataset")]
    LayerNotBound(String),
    #[error("failure locating features of '{source_name}': {message}")]
    Locate {
        source_name: String,
        message: String,
    },
    #[error("failure solving '{layer}': {message}")]
    Solve { layer: String, message: String },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("{0}")]
    InternalError(String),
}
