use parcel_access_core::model::ModelError;

use crate::{config::ConfigError, engine::EngineError, workspace::WorkspaceError};

use super::PipelineStep;

#[derive(thiserror::Error, Debug)]
pub enum AccessError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("failure opening engine session: {0}")]
    Session(#[source] EngineError),
    #[error("scenario '{scenario}' failed to {step}: {source}")]
    EngineCall {
        scenario: String,
        step: PipelineStep,
        source: EngineError,
    },
    #[error("scenario '{scenario}' failed to {step}: {message}")]
    EmptyResult {
        scenario: String,
        step: PipelineStep,
        message: String,
    },
    #[error("scenario '{scenario}' failed to {step}: {source}")]
    Output {
        scenario: String,
        step: PipelineStep,
        source: WorkspaceError,
    },
    #[error("scenario '{scenario}' failed to {step}: {source}")]
    Model {
        scenario: String,
        step: PipelineStep,
        source: ModelError,
    },
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },
}

impl AccessError {
    /// name of the scenario this error belongs to, if any
    pub fn scenario(&self) -> Option<&str> {
        match self {
            AccessError::EngineCall { scenario, .. }
            | AccessError::EmptyResult { scenario, .. }
            | AccessError::Output { scenario, .. }
            | AccessError::Model { scenario, .. } => Some(scenario),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            AccessError::EngineCall { step, .. }
            | AccessError::EmptyResult { step, .. }
            | AccessError::Output { step, .. }
            | AccessError::Model { step, .. } => Some(*step),
            _ => None,
        }
    }
}
