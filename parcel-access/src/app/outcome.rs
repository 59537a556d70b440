use std::path::PathBuf;

use chrono::{DateTime, Local};
use itertools::Itertools;
use parcel_access_core::model::ImpedanceAttribute;
use serde::Serialize;

use super::AccessError;
use crate::engine::{LocationSummary, SolveSummary};

/// paths of everything a completed scenario wrote to the workspace.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScenarioOutputs {
    pub lines: PathBuf,
    pub frequency_table: PathBuf,
    pub origins: PathBuf,
    pub accessibility: PathBuf,
    pub summary: Option<PathBuf>,
}

/// per-scenario statistics, written next to the scenario outputs.
#[derive(Serialize, Clone, Debug)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub network_dataset: PathBuf,
    pub layer_name: String,
    pub impedance: ImpedanceAttribute,
    pub cutoff: f64,
    pub line_filter_cutoff: f64,
    pub origins: LocationSummary,
    pub destinations: Vec<LocationSummary>,
    pub solve: SolveSummary,
    pub lines_within_cutoff: usize,
    /// origins reaching at least one destination
    pub origins_with_access: usize,
    pub parcels: usize,
    /// parcels containing at least one origin
    pub parcels_joined: usize,
    pub baseline_field: Option<String>,
    pub elapsed_seconds: f64,
    pub completed_at: DateTime<Local>,
}

#[derive(Debug)]
pub enum ScenarioOutcome {
    Completed {
        scenario: String,
        outputs: ScenarioOutputs,
        summary: Box<ScenarioSummary>,
    },
    Failed {
        scenario: String,
        error: AccessError,
    },
}

impl ScenarioOutcome {
    pub fn scenario(&self) -> &str {
        match self {
            ScenarioOutcome::Completed { scenario, .. } => scenario,
            ScenarioOutcome::Failed { scenario, .. } => scenario,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ScenarioOutcome::Completed { .. })
    }
}

/// outcome of every scenario attempted in a run, in run order. scenarios
/// skipped after a fail-fast abort are listed separately.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<ScenarioOutcome>,
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn completed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_completed())
            .map(|o| o.scenario())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_completed())
            .map(|o| o.scenario())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed().is_empty() && self.skipped.is_empty()
    }

    pub fn get(&self, scenario: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.scenario() == scenario)
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "completed {} of {} scenarios",
            self.completed().len(),
            self.outcomes.len() + self.skipped.len()
        )?;
        for outcome in self.outcomes.iter() {
            match outcome {
                ScenarioOutcome::Completed {
                    scenario, summary, ..
                } => writeln!(
                    f,
                    "  {scenario}: completed, {} lines, {} of {} parcels joined",
                    summary.lines_within_cutoff, summary.parcels_joined, summary.parcels
                )?,
                ScenarioOutcome::Failed { scenario, error } => {
                    writeln!(f, "  {scenario}: FAILED ({error})")?
                }
            }
        }
        if !self.skipped.is_empty() {
            writeln!(f, "  skipped: {}", self.skipped.iter().join(", "))?;
        }
        Ok(())
    }
}
