// src/lib.rs

//! Unravel: an async workflow engine with compensating steps.
//!
//! Unravel lets you define a multi-step process (a pipeline) whose steps
//! perform independent side effects — separate round trips to a store,
//! external calls — with no surrounding transaction. Features:
//!  - Named steps with before/on/after hooks.
//!  - Asynchronous handlers for I/O-bound operations.
//!  - Early stopping of pipeline execution.
//!  - Per-step skip conditions.
//!  - Per-step compensating actions (`undo_root`) that run in reverse
//!    order when a later step fails, undoing already-applied effects.
//!
//! A step that applies its effect incrementally (e.g. one write per item)
//! records what it applied in the shared context; its own compensation
//! reverses exactly that record, so a failure partway through the step
//! still unwinds cleanly.

pub mod core;
pub mod pipeline;
pub mod error;

// --- Re-exports for the public API ---

pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::core::handler::{Compensation, Handler};
pub use crate::core::context_data::ContextData;

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{EngineError, EngineResult};
