//! Initializer sequencing subsystem.
//!
//! # Data Flow
//! ```text
//! Discovered initializer modules
//!     → empty? return immediately (no async hop)
//!     → runner.rs: register all (synchronous, validated)
//!     → instantiate: run to completion in priority order
//!     → one-shot completion signal
//!     → server orchestration may begin
//! ```
//!
//! # Design Decisions
//! - Registration completes before execution starts
//! - Completion is signalled exactly once via a oneshot the sequencer awaits
//! - Any registration or execution failure aborts startup; no server opens

pub mod runner;

use std::sync::Arc;

use tokio::sync::oneshot;

pub use runner::{ComponentFailure, ComponentRegistration, PriorityRunner, RunnerError};

use crate::discovery::ModuleTree;
use crate::error::BootstrapError;
use crate::modules::Initializer;

/// Runs every discovered initializer to completion before servers start.
pub struct InitializerSequencer;

impl InitializerSequencer {
    /// Resolve all initializers. Returns only after every one has finished,
    /// or immediately when there are none.
    pub async fn run(initializers: &ModuleTree<Arc<dyn Initializer>>) -> Result<(), BootstrapError> {
        if initializers.is_empty() {
            tracing::debug!("No initializers discovered, skipping");
            return Ok(());
        }

        let mut runner = PriorityRunner::new();
        for namespace in &initializers.namespaces {
            let Some(module) = initializers.get(namespace) else {
                continue;
            };
            runner
                .register_component(
                    namespace,
                    ComponentRegistration {
                        priority: module.priority(),
                        component: module.clone(),
                    },
                )
                .map_err(|source| BootstrapError::InitializerRegistration {
                    namespace: namespace.clone(),
                    source,
                })?;
        }

        let (tx, rx) = oneshot::channel();
        runner.set_callback(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        runner.instantiate_components();

        match rx.await {
            Ok(Ok(())) => {
                tracing::info!("Initializers resolved");
                Ok(())
            }
            Ok(Err(failure)) => Err(BootstrapError::InitializerFailed {
                namespace: failure.namespace,
                source: failure.source,
            }),
            // the runner task can only vanish without reporting if it panicked
            Err(_) => Err(BootstrapError::InitializerFailed {
                namespace: String::from("(runner)"),
                source: "initializer runner terminated without reporting".into(),
            }),
        }
    }
}
