// unravel/src/core/mod.rs

pub mod context_data;
pub mod control;
pub mod handler;
pub mod step;

// Re-export key types for easier access from other engine modules
pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use handler::{Compensation, Handler};
pub use step::StepDef;
