//! Igniter: application bootstrap and startup orchestration.
//!
//! Turns a JSON config file plus a directory convention of application
//! modules into a set of running protocol listeners.
//!
//! # Architecture Overview
//!
//! ```text
//!   <appRoot>/config/config.json        <appRoot>/{routes,middlewares,sockets,initializers}
//!              │                                          │
//!              ▼                                          ▼
//!        ┌──────────┐                              ┌────────────┐
//!        │  config  │                              │ discovery  │
//!        └────┬─────┘                              └─────┬──────┘
//!             │         AppConfig + DiscoveredModules    │
//!             └───────────────────┬──────────────────────┘
//!                                 ▼
//!                         ┌──────────────┐
//!                         │ initializers │   priority-ordered, run to
//!                         └──────┬───────┘   completion before any listener
//!                                ▼
//!                         ┌──────────────┐       ┌─────────────────┐
//!                         │   servers    │──────▶│  net (driver)   │
//!                         │ orchestrator │       │ http/https/tcp/ │
//!                         └──────┬───────┘       │ udp/websocket   │
//!                                │               └────────┬────────┘
//!                          ready latch ◀── listening acks ┘
//!                                │
//!                                ▼
//!                      ready callback (exactly once)
//! ```
//!
//! The orchestration core owns no socket: everything that binds lives
//! behind [`servers::ServerDriver`], with [`net::TokioDriver`] as the
//! shipped reference implementation.

// Core subsystems
pub mod app;
pub mod config;
pub mod discovery;
pub mod modules;

// Startup pipeline
pub mod initializers;
pub mod servers;

// Request path engines
pub mod middleware;
pub mod routing;

// Cross-cutting concerns
pub mod error;
pub mod net;
pub mod observability;

pub use app::{App, AppBuilder, ReadyCallback};
pub use config::AppConfig;
pub use discovery::ModuleRegistry;
pub use error::BootstrapError;
pub use net::TokioDriver;
pub use servers::ServerDriver;
