mod access_config;
mod config_error;
mod scenario;

pub use access_config::{
    AccessConfig, AnalysisConfig, InputsConfig, JoinConfig, OutputNamingConfig,
};
pub use config_error::ConfigError;
pub use scenario::{ScenarioConfig, ScenarioList};
