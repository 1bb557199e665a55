//! Server orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig + DiscoveredModules
//!     → orchestrator.rs (validate, assemble handlers, fixed start order)
//!     → driver.rs (fire-and-forget listener creation)
//!     → readiness.rs (count acknowledgments, fire ready exactly once)
//! ```
//!
//! # Design Decisions
//! - The orchestrator owns no socket; everything that binds lives behind
//!   the [`ServerDriver`] trait
//! - Readiness is a countdown latch armed after the last start call, so
//!   listeners may acknowledge in any order

pub mod driver;
pub mod orchestrator;
pub mod readiness;

pub use driver::{
    DriverError, HttpServerOptions, HttpsServerOptions, ServerDriver, TcpServerOptions,
    TcpSocketOptions, UdpServerOptions,
};
pub use orchestrator::ServerOrchestrator;
pub use readiness::{ListenerAck, ReadyLatch};
