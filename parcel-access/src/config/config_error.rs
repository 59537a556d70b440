use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("file '{path}' produced error: {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("{names} scenario names were provided for {networks} network datasets")]
    ScenarioLengthMismatch { names: usize, networks: usize },
    #[error("scenario '{0}' is configured more than once")]
    DuplicateScenario(String),
    #[error("no scenarios configured")]
    NoScenarios,
    #[error("provide either [[scenarios]] or scenario_names/network_datasets, not both")]
    AmbiguousScenarios,
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),
}
