//! Module discovery subsystem.
//!
//! # Data Flow
//! ```text
//! <appRoot>/
//!     routes/http-routes/**    → RouteScan (absent root / absent dir / loaded)
//!     routes/https-routes/**   → RouteScan
//!     middlewares/<scope>/**   → ModuleTree (empty when the dir is absent)
//!     sockets/<protocol>/**    → ModuleTree (empty when the dir is absent)
//!     initializers/**          → ModuleTree (empty when the dir is absent)
//! ```
//!
//! # Design Decisions
//! - Pure filesystem read at cold start; no module-shape validation here
//! - Route categories distinguish "routes/ missing" from "subfolder
//!   missing" so the orchestrator can report precisely
//! - Non-route categories default to empty rather than failing: an
//!   application without middlewares or initializers is a valid application

pub mod autoload;
pub mod registry;

use std::path::Path;
use std::sync::Arc;

pub use autoload::{AutoloadError, Autoloader, ModuleTree};
pub use registry::ModuleRegistry;

use crate::modules::{Initializer, MiddlewareModule, RouteModule, SocketModule};

/// Directory convention under the application root.
pub const ROUTES_DIR: &str = "routes";
pub const HTTP_ROUTES_DIR: &str = "http-routes";
pub const HTTPS_ROUTES_DIR: &str = "https-routes";
pub const MIDDLEWARES_DIR: &str = "middlewares";
pub const SOCKETS_DIR: &str = "sockets";
pub const INITIALIZERS_DIR: &str = "initializers";

/// Result of scanning one route category.
pub enum RouteScan {
    /// The `routes/` parent directory itself does not exist.
    RoutesRootAbsent,

    /// `routes/` exists but the protocol subfolder does not.
    CategoryAbsent,

    /// The subfolder exists; the tree may still be empty.
    Loaded(ModuleTree<Arc<dyn RouteModule>>),
}

impl RouteScan {
    /// The loaded tree, when the scan found one with at least one module.
    pub fn non_empty(&self) -> Option<&ModuleTree<Arc<dyn RouteModule>>> {
        match self {
            RouteScan::Loaded(tree) if !tree.is_empty() => Some(tree),
            _ => None,
        }
    }
}

/// Route trees per protocol.
pub struct DiscoveredRoutes {
    pub http: RouteScan,
    pub https: RouteScan,
}

/// Everything discovery produces for one orchestration run.
pub struct DiscoveredModules {
    pub routes: DiscoveredRoutes,
    pub middlewares: ModuleTree<Arc<dyn MiddlewareModule>>,
    pub sockets: ModuleTree<Arc<dyn SocketModule>>,
    pub initializers: ModuleTree<Arc<dyn Initializer>>,
}

/// Run all four category scans against the directory convention.
pub fn discover(
    app_path: &Path,
    registry: &ModuleRegistry,
) -> Result<DiscoveredModules, AutoloadError> {
    let routes = DiscoveredRoutes {
        http: scan_routes(app_path, HTTP_ROUTES_DIR, |ns| {
            registry.lookup_http_route(ns)
        })?,
        https: scan_routes(app_path, HTTPS_ROUTES_DIR, |ns| {
            registry.lookup_https_route(ns)
        })?,
    };

    let modules = DiscoveredModules {
        routes,
        middlewares: scan_category(app_path, MIDDLEWARES_DIR, |ns| {
            registry.lookup_middleware(ns)
        })?,
        sockets: scan_category(app_path, SOCKETS_DIR, |ns| registry.lookup_socket(ns))?,
        initializers: scan_category(app_path, INITIALIZERS_DIR, |ns| {
            registry.lookup_initializer(ns)
        })?,
    };

    tracing::info!(
        http_routes = route_count(&modules.routes.http),
        https_routes = route_count(&modules.routes.https),
        middlewares = modules.middlewares.len(),
        sockets = modules.sockets.len(),
        initializers = modules.initializers.len(),
        "Module discovery complete"
    );
    Ok(modules)
}

fn route_count(scan: &RouteScan) -> usize {
    match scan {
        RouteScan::Loaded(tree) => tree.len(),
        _ => 0,
    }
}

fn scan_routes(
    app_path: &Path,
    category: &str,
    resolve: impl Fn(&str) -> Option<Arc<dyn RouteModule>>,
) -> Result<RouteScan, AutoloadError> {
    let routes_root = app_path.join(ROUTES_DIR);
    if !routes_root.is_dir() {
        return Ok(RouteScan::RoutesRootAbsent);
    }
    let category_dir = routes_root.join(category);
    if !category_dir.is_dir() {
        return Ok(RouteScan::CategoryAbsent);
    }
    Autoloader::new(category_dir).load(resolve).map(RouteScan::Loaded)
}

fn scan_category<T>(
    app_path: &Path,
    category: &str,
    resolve: impl Fn(&str) -> Option<T>,
) -> Result<ModuleTree<T>, AutoloadError> {
    let dir = app_path.join(category);
    if !dir.is_dir() {
        return Ok(ModuleTree::empty());
    }
    Autoloader::new(dir).load(resolve)
}
