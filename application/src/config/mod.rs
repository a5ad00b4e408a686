//! Application-level configuration.
//!
//! - [`ExecutionParams`]: loop control (iteration budget, native tool calling)

pub mod execution_params;

pub use execution_params::ExecutionParams;
