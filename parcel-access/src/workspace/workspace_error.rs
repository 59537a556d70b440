use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum WorkspaceError {
    #[error("Error reading from '{path}': {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
    #[error("dataset '{0}' does not exist")]
    DatasetNotFound(PathBuf),
    #[error("output '{0}' already exists and overwrite_output is false")]
    OutputExists(PathBuf),
    #[error("feature {index} of '{path}' is invalid: {message}")]
    InvalidFeature {
        path: PathBuf,
        index: usize,
        message: String,
    },
}
