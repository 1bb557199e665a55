//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route modules (discovery)
//!     → router.rs (validate & register at startup)
//!     → Freeze as immutable route table
//!
//! Incoming request
//!     → method gate (supported list)
//!     → url lookup
//!     → middleware hook
//!     → route handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Registration failures are fatal: a malformed route aborts startup

pub mod router;

pub use router::{MatchedRoute, Router, RouterError};
