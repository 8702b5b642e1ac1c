// unravel/src/pipeline/execution.rs

//! `Pipeline::run()`: step-by-step execution, and the compensation unwind
//! performed when a handler fails.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::EngineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<EngineError> + Send + Sync + 'static,
{
  /// Executes the pipeline against the shared context `ctx_data`.
  ///
  /// On a handler error at step `i`, every compensation registered for the
  /// steps that started (including step `i` itself) runs in reverse order
  /// before the error is returned. A `PipelineControl::Stop` halts without
  /// compensating: stopping is an outcome, not a failure.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline_context_data_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    // Indices of steps that actually started, for the unwind.
    let mut started: Vec<usize> = Vec::with_capacity(self.steps.len());

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      // Entered guards are not held across awaits; handler futures are
      // instrumented with the span instead so `run()` stays `Send`.
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name = step_name_str,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(parent: &step_span, Level::INFO, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let has_before = self.before.get(step_name_str).map_or(false, |v| !v.is_empty());
      let has_on = self.on.get(step_name_str).map_or(false, |v| !v.is_empty());
      let has_after = self.after.get(step_name_str).map_or(false, |v| !v.is_empty());

      if !has_before && !has_on && !has_after {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(EngineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      started.push(step_idx);

      for (phase, handlers) in [
        ("before", self.before.get(step_name_str)),
        ("on", self.on.get(step_name_str)),
        ("after", self.after.get(step_name_str)),
      ] {
        let Some(handlers) = handlers else { continue };
        for (handler_idx, handler_fn) in handlers.iter().enumerate() {
          let handler_span = span!(
            parent: &step_span,
            Level::DEBUG,
            "step_handler",
            phase,
            handler_index = handler_idx
          );
          match handler_fn(ctx_data.clone()).instrument(handler_span).await {
            Ok(PipelineControl::Continue) => {}
            Ok(PipelineControl::Stop) => {
              event!(parent: &step_span, Level::INFO, phase, "Pipeline stopped by a handler.");
              return Ok(PipelineResult::Stopped);
            }
            Err(e) => {
              event!(parent: &step_span, Level::ERROR, phase, error = %e, "Handler failed; unwinding.");
              self.unwind(&ctx_data, &started).await;
              return Err(e);
            }
          }
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished successfully.");
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }

  /// Runs the compensations of the started steps in reverse order, failing
  /// step first. A compensation error is logged and swallowed: it must not
  /// mask the original failure or block earlier compensations.
  async fn unwind(&self, ctx_data: &ContextData<TData>, started: &[usize]) {
    for &step_idx in started.iter().rev() {
      let step_name = self.steps[step_idx].name.as_str();
      let Some(undos) = self.undo.get(step_name) else { continue };
      for (undo_idx, undo_fn) in undos.iter().enumerate().rev() {
        let undo_span = span!(Level::INFO, "step_compensation", step_name, undo_index = undo_idx);
        match undo_fn(ctx_data.clone()).instrument(undo_span.clone()).await {
          Ok(()) => event!(parent: &undo_span, Level::INFO, "Compensation applied."),
          Err(e) => {
            event!(parent: &undo_span, Level::ERROR, error = %e, "Compensation failed; continuing unwind.");
          }
        }
      }
    }
  }
}
