// unravel/src/pipeline/hooks.rs

//! Registration of `before`, `on`, and `after` handlers and of per-step
//! compensating actions.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::core::handler::{Compensation, Handler};
use crate::pipeline::definition::Pipeline;
use std::future::Future;

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::EngineError> + Send + Sync + 'static,
{
  /// Registers a `before` hook for a step.
  ///
  /// The `handler_fn` takes `ContextData<TData>` and returns a future
  /// resolving to `Result<PipelineControl, UserProvidedErr>`, where
  /// `UserProvidedErr` must be convertible into the pipeline's `Err`.
  pub fn before_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self
      .before
      .entry(step_name.to_string())
      .or_default()
      .push(final_handler);
  }

  /// Registers an `on` hook for a step. Error handling as in `before_root`.
  pub fn on_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.on.entry(step_name.to_string()).or_default().push(final_handler);
  }

  /// Registers an `after` hook for a step. Error handling as in `before_root`.
  pub fn after_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.after.entry(step_name.to_string()).or_default().push(final_handler);
  }

  /// Registers a compensating action for a step.
  ///
  /// When a step fails, the executor runs the compensations of the failing
  /// step first (covering effects it applied before failing partway), then
  /// those of every earlier step that actually started, in reverse step
  /// order. Within one step, compensations run in reverse registration
  /// order. Compensation failures are logged and swallowed.
  ///
  /// Compensations never run on success or on a graceful `Stop`.
  pub fn undo_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    undo_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<(), UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_undo: Compensation<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = undo_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.undo.entry(step_name.to_string()).or_default().push(final_undo);
  }
}
