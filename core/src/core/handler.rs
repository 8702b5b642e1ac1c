// unravel/src/core/handler.rs

//! Function types for pipeline step handlers and compensating actions.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler: an async function over the shared `ContextData<TData>`,
/// resolving to `Result<PipelineControl, Err>`.
///
/// Handlers are responsible for:
/// 1. Acquiring `.read()`/`.write()` locks on the context to access state.
/// 2. Ensuring lock guards are dropped BEFORE any `.await` point.
/// 3. Returning `PipelineControl::Continue` to proceed or
///    `PipelineControl::Stop` to halt the pipeline gracefully.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// A compensating action for a step: an async function that undoes the
/// step's already-applied effects when a later step (or the step itself,
/// partway through) fails.
///
/// A compensation's own failure is logged by the executor and swallowed —
/// it never masks the error that triggered the unwind, and it never
/// prevents earlier steps from being compensated.
pub type Compensation<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<(), Err>> + Send>> + Send + Sync,
>;
