//! Startup error taxonomy.
//!
//! Every failure here is fatal and surfaces synchronously during the
//! startup call, before the failing protocol binds a port. Errors carry
//! structured context plus the underlying cause instead of string-encoding
//! it.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::discovery::AutoloadError;
use crate::initializers::RunnerError;
use crate::middleware::PipelineError;
use crate::routing::RouterError;
use crate::servers::DriverError;

/// Boxed error cause used where the source type is the embedder's.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The protocol a startup error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
    Tcp,
    Udp,
    WebSocket,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::WebSocket => "http websocket",
        };
        write!(f, "{}", name)
    }
}

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Orchestration was invoked without an application root path.
    #[error("application root path was not provided")]
    MissingAppPath,

    /// Config file missing, corrupted, or semantically invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A module present on disk could not be resolved.
    #[error("module discovery failed: {0}")]
    Discovery(#[from] AutoloadError),

    /// An initializer module lacks the shape the runner requires.
    #[error("initializer {namespace:?} could not be registered: {source}")]
    InitializerRegistration {
        namespace: String,
        #[source]
        source: RunnerError,
    },

    /// An initializer ran and reported failure.
    #[error("initializer {namespace:?} failed: {source}")]
    InitializerFailed {
        namespace: String,
        #[source]
        source: BoxError,
    },

    /// A middleware module lacks a static priority or handler.
    #[error("middleware {namespace:?} could not be registered: {source}")]
    MiddlewareRegistration {
        namespace: String,
        #[source]
        source: PipelineError,
    },

    /// A route module lacks a url or any method handler.
    #[error("route {namespace:?} could not be registered: {source}")]
    RouteRegistration {
        namespace: String,
        #[source]
        source: RouterError,
    },

    /// A route-backed protocol is enabled with no routes to serve.
    #[error("{protocol} server is enabled but {detail}; add route modules under {convention}")]
    MissingRoutes {
        protocol: Protocol,
        convention: &'static str,
        detail: &'static str,
    },

    /// A socket protocol is enabled with no handler module.
    #[error(
        "{protocol} server is enabled but no socket handler was discovered; \
         export a request handler under {convention}"
    )]
    MissingSocketHandler {
        protocol: Protocol,
        convention: &'static str,
    },

    /// The server driver rejected a request it validates itself.
    #[error("server driver failed while {context}: {source}")]
    Driver {
        context: &'static str,
        #[source]
        source: DriverError,
    },
}
