// unravel/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in user-provided handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal engine error: {0}")]
  Internal(String),
}

// Arbitrary errors raised through `anyhow` inside handlers become
// HandlerError; an already-wrapped EngineError is re-wrapped rather than
// unwrapped, since EngineError is not Clone.
impl From<AnyhowError> for EngineError {
  fn from(err: AnyhowError) -> Self {
    EngineError::HandlerError { source: err }
  }
}

pub type EngineResult<T, E = EngineError> = std::result::Result<T, E>;
