// unravel/src/pipeline/mod.rs

//! The `Pipeline<TData, Err>` struct, its construction, hook registration,
//! and execution (including the compensation unwind).

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
