// unravel/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct definition and construction.

use crate::core::handler::{Compensation, Handler};
use crate::core::step::{SkipCondition, StepDef};
use std::collections::HashMap;

/// An ordered multi-step process over a shared root context `TData`, whose
/// handlers return `Result<_, Err>`.
///
/// `TData` must be `'static + Send + Sync`.
/// `Err` must be `std::error::Error + Send + Sync + 'static` and
/// `From<crate::error::EngineError>`, so framework-level failures (e.g. a
/// non-optional step with no handlers) can surface through the pipeline's
/// own error type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::EngineError> + Send + Sync + 'static,
{
  /// Ordered list of step definitions.
  pub(crate) steps: Vec<StepDef<TData>>,

  // Handlers for the phases of each step, keyed by step name.
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,

  /// Compensating actions per step, run in reverse registration order
  /// during an unwind.
  pub(crate) undo: HashMap<String, Vec<Compensation<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::EngineError> + Send + Sync + 'static,
{
  /// Creates a new `Pipeline` from `(name, optional, skip_if)` step
  /// definitions, in execution order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
      undo: HashMap::new(),
    }
  }

  /// Panics if no step with the given name exists. Registering a handler
  /// against an unknown step is a programming error (typo), not a runtime
  /// condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline setup error: step '{}' not found in pipeline definition.",
        step_name
      );
    }
  }
}
