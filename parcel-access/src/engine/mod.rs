mod analysis_engine;
mod engine_error;
mod session;

pub mod compass;
#[cfg(test)]
pub mod recording_engine;

pub use analysis_engine::{AnalysisEngine, LocationSummary, SolveSummary};
pub use engine_error::EngineError;
pub use session::EngineSession;
