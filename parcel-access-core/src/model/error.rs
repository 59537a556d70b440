use crate::model::NaClass;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("sublayer {0} does not hold network locations")]
    NotALocationClass(NaClass),
    #[error("analysis layer '{0}' has not been solved")]
    NotSolved(String),
    #[error("cutoff must be a finite, non-negative number, found {0}")]
    InvalidCutoff(f64),
    #[error("Invalid or empty geometry: {0}")]
    InvalidGeometry(String),
}
