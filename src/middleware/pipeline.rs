//! Priority-ordered middleware execution.
//!
//! # Responsibilities
//! - Validate middleware registrations (priority + handler required)
//! - Keep entries ordered by ascending priority, ties in registration order
//! - Run the chain per request, allowing any step to short-circuit
//!
//! # Design Decisions
//! - The callback-style `next()` contract is rendered as a verdict enum:
//!   a step returns the request to continue, or a response to stop
//! - Ordering is decided at registration time, not per request

use axum::body::Body;
use axum::http::Request;
use thiserror::Error;

use crate::modules::{MiddlewareFn, MiddlewareVerdict};

/// Error type for middleware registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("middleware does not declare a static priority")]
    MissingPriority,

    #[error("middleware does not expose an onRequest handler")]
    MissingHandler,
}

/// What a module offers for registration; either piece may be absent on a
/// malformed module.
pub struct MiddlewareRegistration {
    pub priority: Option<u32>,
    pub middleware: Option<MiddlewareFn>,
}

/// An ordered chain of middleware steps.
#[derive(Default)]
pub struct MiddlewarePipeline {
    entries: Vec<(u32, MiddlewareFn)>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert one middleware at its priority position.
    pub fn register_middleware(
        &mut self,
        registration: MiddlewareRegistration,
    ) -> Result<(), PipelineError> {
        let priority = registration.priority.ok_or(PipelineError::MissingPriority)?;
        let middleware = registration.middleware.ok_or(PipelineError::MissingHandler)?;

        // partition_point keeps equal priorities in registration order
        let at = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(at, (priority, middleware));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Run every step in order. A `Respond` verdict stops the chain.
    pub async fn on_request(&self, mut request: Request<Body>) -> MiddlewareVerdict {
        for (_, middleware) in &self.entries {
            match middleware(request).await {
                MiddlewareVerdict::Next(next) => request = next,
                MiddlewareVerdict::Respond(response) => {
                    return MiddlewareVerdict::Respond(response)
                }
            }
        }
        MiddlewareVerdict::Next(request)
    }
}
