//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that enabled servers carry the fields they need
//! - Validate value ranges (ports, core counts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{AppConfig, Cores};

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{protocol} server is enabled but no port is configured")]
    MissingPort { protocol: &'static str },

    #[error("{protocol} server is enabled but its supported method list is empty")]
    EmptyMethodList { protocol: &'static str },

    #[error("https server is enabled but cert/key paths are not configured")]
    MissingTlsMaterial,

    #[error("cluster is enabled with a fixed core count of zero")]
    ZeroCores,
}

/// Validate semantic constraints the schema cannot express.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let servers = &config.servers;

    if servers.http.enabled {
        if servers.http.port == 0 {
            errors.push(ValidationError::MissingPort { protocol: "http" });
        }
        if servers.http.methods.is_empty() {
            errors.push(ValidationError::EmptyMethodList { protocol: "http" });
        }
    }

    if servers.https.enabled {
        if servers.https.port == 0 {
            errors.push(ValidationError::MissingPort { protocol: "https" });
        }
        if servers.https.methods.is_empty() {
            errors.push(ValidationError::EmptyMethodList { protocol: "https" });
        }
        if servers.https.cert.as_os_str().is_empty() || servers.https.key.as_os_str().is_empty() {
            errors.push(ValidationError::MissingTlsMaterial);
        }
    }

    if servers.tcp.enabled && servers.tcp.port == 0 {
        errors.push(ValidationError::MissingPort { protocol: "tcp" });
    }

    if servers.udp.enabled && servers.udp.port == 0 {
        errors.push(ValidationError::MissingPort { protocol: "udp" });
    }

    if config.cluster.enabled && config.cluster.cores == Cores::Fixed(0) {
        errors.push(ValidationError::ZeroCores);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
