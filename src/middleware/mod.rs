//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request
//!     → pipeline.rs (entries in ascending priority)
//!     → each step: Next(request) | Respond(response)
//!     → route handler (only if no step responded)
//! ```

pub mod pipeline;

pub use pipeline::{MiddlewarePipeline, MiddlewareRegistration, PipelineError};
