//! Application entry point.
//!
//! # Data Flow
//! ```text
//! App::builder(root)
//!     → load config            (fatal: ConfigError)
//!     → discover modules       (fatal: AutoloadError)
//!     → run initializers       (fatal: registration/execution errors)
//!     → orchestrate servers    (fatal: validation errors)
//!     → App                    (ready signal pending)
//! ```
//!
//! # Design Decisions
//! - Each step is a fallible stage; the next runs only on success
//! - Every validation failure surfaces from `ignite` before the failing
//!   protocol binds a port
//! - The ready callback fires exactly once; without one, a fixed notice is
//!   logged instead

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::{load_config, AppConfig};
use crate::discovery::{discover, ModuleRegistry};
use crate::error::BootstrapError;
use crate::initializers::InitializerSequencer;
use crate::net::TokioDriver;
use crate::servers::{ServerDriver, ServerOrchestrator};

/// Invoked exactly once when every enabled listener is confirmed up.
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

/// A bootstrapped application with its listeners starting up.
#[derive(Debug)]
pub struct App {
    config: Arc<AppConfig>,
    ready: watch::Receiver<bool>,
}

impl App {
    /// Start building an application rooted at `root`.
    pub fn builder(root: impl Into<PathBuf>) -> AppBuilder {
        AppBuilder {
            root: root.into(),
            registry: ModuleRegistry::new(),
            driver: None,
            on_ready: None,
        }
    }

    /// The resolved configuration this application was booted with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Wait until every enabled listener has reported listening.
    ///
    /// Returns immediately when readiness already fired. If the readiness
    /// signal was lost (a listener failed to bind and will never
    /// acknowledge), this unblocks too; the ready callback is the
    /// authoritative exactly-once signal.
    pub async fn ready(&self) {
        let mut ready = self.ready.clone();
        if *ready.borrow() {
            return;
        }
        while ready.changed().await.is_ok() {
            if *ready.borrow() {
                return;
            }
        }
    }
}

/// Builder for [`App`].
pub struct AppBuilder {
    root: PathBuf,
    registry: ModuleRegistry,
    driver: Option<Arc<dyn ServerDriver>>,
    on_ready: Option<ReadyCallback>,
}

impl AppBuilder {
    /// Supply the application's compiled-in modules.
    pub fn modules(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the default tokio driver.
    pub fn driver(mut self, driver: Arc<dyn ServerDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Install the ready callback.
    pub fn on_ready(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    /// Run the whole startup sequence: config, discovery, initializers,
    /// servers. Returns once every start call has been issued; readiness
    /// is reported asynchronously.
    pub async fn ignite(self) -> Result<App, BootstrapError> {
        if self.root.as_os_str().is_empty() {
            return Err(BootstrapError::MissingAppPath);
        }

        let mut config = load_config(&self.root)?;
        let modules = discover(&config.app_path, &self.registry)?;

        InitializerSequencer::run(&modules.initializers).await?;

        let driver = self
            .driver
            .unwrap_or_else(|| Arc::new(TokioDriver::new()) as Arc<dyn ServerDriver>);
        let orchestrator = ServerOrchestrator::new(driver);
        let ready_signal = orchestrator.start(&mut config, &modules)?;

        let (ready_tx, ready_rx) = watch::channel(false);
        let on_ready = self.on_ready;
        tokio::spawn(async move {
            match ready_signal.await {
                Ok(()) => {
                    match on_ready {
                        Some(callback) => callback(),
                        None => tracing::info!("Server(s) are running"),
                    }
                    let _ = ready_tx.send(true);
                }
                Err(_) => {
                    tracing::warn!("Readiness signal dropped before all listeners reported");
                }
            }
        });

        Ok(App {
            config: Arc::new(config),
            ready: ready_rx,
        })
    }
}
