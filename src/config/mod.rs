//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! <appRoot>/config/config.json
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, appPath injected)
//!     → passed by ownership into the orchestration pipeline
//! ```
//!
//! # Design Decisions
//! - Config is loaded once and immutable for the process lifetime; the only
//!   in-memory mutation is resolving the "auto" cores sentinel
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, ClusterConfig, Cores, HttpConfig, HttpMethod, HttpsConfig, LoggingConfig,
    ServersConfig, TcpConfig, UdpConfig, UdpKind,
};
pub use validation::{validate_config, ValidationError};
