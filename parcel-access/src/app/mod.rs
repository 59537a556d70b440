mod access_app;
mod access_error;
mod outcome;
mod output_features;
mod pipeline_step;
mod run;

pub use access_app::{AccessApp, AccessOperation};
pub use access_error::AccessError;
pub use outcome::{RunReport, ScenarioOutcome, ScenarioOutputs, ScenarioSummary};
pub use pipeline_step::PipelineStep;
pub use run::{missing_baseline, run_scenarios, ScenarioInputs};
