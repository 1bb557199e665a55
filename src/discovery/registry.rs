//! Compile-time module registry.
//!
//! Rust cannot load code from disk the way a scripting runtime does, so the
//! embedding application registers its module implementations up front,
//! keyed by the same namespaces the directory convention produces. The
//! filesystem stays the source of truth for which namespaces exist;
//! discovery pairs each one with its registered implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::modules::{Initializer, MiddlewareModule, RouteModule, SocketModule};

/// Namespace-keyed store of the application's compiled-in modules.
#[derive(Default)]
pub struct ModuleRegistry {
    http_routes: HashMap<String, Arc<dyn RouteModule>>,
    https_routes: HashMap<String, Arc<dyn RouteModule>>,
    middlewares: HashMap<String, Arc<dyn MiddlewareModule>>,
    sockets: HashMap<String, Arc<dyn SocketModule>>,
    initializers: HashMap<String, Arc<dyn Initializer>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an HTTP route module under its `routes/http-routes`
    /// relative namespace.
    pub fn http_route(mut self, namespace: &str, module: impl RouteModule + 'static) -> Self {
        self.http_routes.insert(namespace.to_string(), Arc::new(module));
        self
    }

    /// Register an HTTPS route module under its `routes/https-routes`
    /// relative namespace.
    pub fn https_route(mut self, namespace: &str, module: impl RouteModule + 'static) -> Self {
        self.https_routes.insert(namespace.to_string(), Arc::new(module));
        self
    }

    /// Register a middleware module, e.g. under `http-middlewares/logger`.
    pub fn middleware(mut self, namespace: &str, module: impl MiddlewareModule + 'static) -> Self {
        self.middlewares.insert(namespace.to_string(), Arc::new(module));
        self
    }

    /// Register a socket handler module, e.g. under `tcp/index`.
    pub fn socket(mut self, namespace: &str, module: impl SocketModule + 'static) -> Self {
        self.sockets.insert(namespace.to_string(), Arc::new(module));
        self
    }

    /// Register an initializer module.
    pub fn initializer(mut self, namespace: &str, module: impl Initializer + 'static) -> Self {
        self.initializers.insert(namespace.to_string(), Arc::new(module));
        self
    }

    pub(crate) fn lookup_http_route(&self, namespace: &str) -> Option<Arc<dyn RouteModule>> {
        self.http_routes.get(namespace).cloned()
    }

    pub(crate) fn lookup_https_route(&self, namespace: &str) -> Option<Arc<dyn RouteModule>> {
        self.https_routes.get(namespace).cloned()
    }

    pub(crate) fn lookup_middleware(&self, namespace: &str) -> Option<Arc<dyn MiddlewareModule>> {
        self.middlewares.get(namespace).cloned()
    }

    pub(crate) fn lookup_socket(&self, namespace: &str) -> Option<Arc<dyn SocketModule>> {
        self.sockets.get(namespace).cloned()
    }

    pub(crate) fn lookup_initializer(&self, namespace: &str) -> Option<Arc<dyn Initializer>> {
        self.initializers.get(namespace).cloned()
    }
}
