//! Server startup orchestration.
//!
//! # States
//! ```text
//! Idle
//!   → ResolvingClusterConfig   ("auto" cores → host CPU count)
//!   → StartingServers(remaining)
//!        http → websocket attach → https → tcp → udp   (fixed order)
//!        each enabled protocol: validate, register ack, fire-and-forget
//!   → Ready                    (armed counter reaches zero, exactly once)
//!
//! Aborted ← any validation failure; later protocols never start and the
//!           error surfaces synchronously to the caller
//! ```
//!
//! # Design Decisions
//! - Validation happens entirely before the protocol's driver call, so
//!   there is no partial-startup state to unwind
//! - The latch is armed only after the last start call was issued;
//!   acknowledgment order never matters
//! - Cluster fan-out is requested last and never blocks readiness: ready
//!   means the primary's own listeners are up, a documented weak guarantee

use std::sync::Arc;

use axum::http::Method;
use tokio::sync::oneshot;

use crate::config::{AppConfig, ClusterConfig, HttpConfig, HttpsConfig, TcpConfig, UdpConfig};
use crate::discovery::{DiscoveredModules, ModuleTree, RouteScan};
use crate::error::{BootstrapError, Protocol};
use crate::middleware::{MiddlewarePipeline, MiddlewareRegistration};
use crate::modules::{HttpHandlerFn, MiddlewareModule, RouteModule};
use crate::routing::Router;
use crate::servers::driver::{
    HttpServerOptions, HttpsServerOptions, ServerDriver, TcpServerOptions, TcpSocketOptions,
    UdpServerOptions,
};
use crate::servers::readiness::ReadyLatch;

const HTTP_MIDDLEWARE_SCOPE: &str = "http-middlewares/";
const HTTPS_MIDDLEWARE_SCOPE: &str = "https-middlewares/";

const TCP_SOCKET_NAMESPACE: &str = "tcp/index";
const UDP_SOCKET_NAMESPACE: &str = "udp/index";
const WS_SOCKET_NAMESPACE: &str = "http-websocket/index";

/// Brings up every enabled protocol listener and accounts for readiness.
pub struct ServerOrchestrator {
    driver: Arc<dyn ServerDriver>,
}

impl ServerOrchestrator {
    pub fn new(driver: Arc<dyn ServerDriver>) -> Self {
        Self { driver }
    }

    /// Run one orchestration pass. Returns the one-shot readiness signal;
    /// it fires after every enabled listener acknowledged listening.
    ///
    /// All validation is synchronous. On error, protocols evaluated before
    /// the failing one have already been requested; nothing after it is.
    pub fn start(
        &self,
        config: &mut AppConfig,
        modules: &DiscoveredModules,
    ) -> Result<oneshot::Receiver<()>, BootstrapError> {
        config.cluster.resolve_auto_cores();

        let (latch, ready) = ReadyLatch::new();
        let cluster = config.cluster.clone();
        let servers = &config.servers;

        if servers.http.enabled {
            self.start_http(&servers.http, &cluster, modules, &latch)?;
        }
        if servers.http.web_sockets {
            self.attach_web_socket(modules)?;
        }
        if servers.https.enabled {
            self.start_https(&servers.https, &cluster, modules, &latch)?;
        }
        if servers.tcp.enabled {
            self.start_tcp(&servers.tcp, &cluster, modules, &latch)?;
        }
        if servers.udp.enabled {
            self.start_udp(&servers.udp, &cluster, modules, &latch)?;
        }

        if cluster.enabled {
            let workers = cluster.cores.resolved();
            tracing::info!(workers, "Requesting cluster fan-out");
            self.driver.cluster(workers);
        }

        latch.arm();
        Ok(ready)
    }

    fn start_http(
        &self,
        config: &HttpConfig,
        cluster: &ClusterConfig,
        modules: &DiscoveredModules,
        latch: &ReadyLatch,
    ) -> Result<(), BootstrapError> {
        tracing::debug!(port = config.port, "Creating http server");
        let routes = require_routes(&modules.routes.http, Protocol::Http, "routes/http-routes")?;
        let handler = build_request_handler(
            config.methods(),
            routes,
            &modules.middlewares,
            HTTP_MIDDLEWARE_SCOPE,
        )?;
        self.driver.create_http_server(HttpServerOptions {
            port: config.port,
            handler,
            on_listening: latch.register(),
            cluster: cluster.enabled,
        });
        Ok(())
    }

    fn attach_web_socket(&self, modules: &DiscoveredModules) -> Result<(), BootstrapError> {
        tracing::debug!("Enabling http websocket");
        let handler = modules
            .sockets
            .get(WS_SOCKET_NAMESPACE)
            .and_then(|module| module.ws_handler())
            .ok_or(BootstrapError::MissingSocketHandler {
                protocol: Protocol::WebSocket,
                convention: "sockets/http-websocket/index",
            })?;
        self.driver
            .attach_http_web_socket(handler)
            .map_err(|source| BootstrapError::Driver {
                context: "attaching the websocket upgrade handler",
                source,
            })
    }

    fn start_https(
        &self,
        config: &HttpsConfig,
        cluster: &ClusterConfig,
        modules: &DiscoveredModules,
        latch: &ReadyLatch,
    ) -> Result<(), BootstrapError> {
        tracing::debug!(port = config.port, "Creating https server");
        let routes = require_routes(&modules.routes.https, Protocol::Https, "routes/https-routes")?;
        let handler = build_request_handler(
            config.methods(),
            routes,
            &modules.middlewares,
            HTTPS_MIDDLEWARE_SCOPE,
        )?;
        self.driver.create_https_server(HttpsServerOptions {
            port: config.port,
            handler,
            on_listening: latch.register(),
            cluster: cluster.enabled,
            cert: config.cert.clone(),
            key: config.key.clone(),
        });
        Ok(())
    }

    fn start_tcp(
        &self,
        config: &TcpConfig,
        cluster: &ClusterConfig,
        modules: &DiscoveredModules,
        latch: &ReadyLatch,
    ) -> Result<(), BootstrapError> {
        tracing::debug!(port = config.port, "Creating tcp server");
        let handler = modules
            .sockets
            .get(TCP_SOCKET_NAMESPACE)
            .and_then(|module| module.tcp_handler())
            .ok_or(BootstrapError::MissingSocketHandler {
                protocol: Protocol::Tcp,
                convention: "sockets/tcp/index",
            })?;
        self.driver.create_tcp_server(
            TcpServerOptions {
                port: config.port,
                handler,
                on_listening: latch.register(),
                cluster: cluster.enabled,
            },
            TcpSocketOptions {
                allow_half_open: config.allow_half_open,
                pause_on_connect: config.pause_on_connect,
            },
        );
        Ok(())
    }

    fn start_udp(
        &self,
        config: &UdpConfig,
        cluster: &ClusterConfig,
        modules: &DiscoveredModules,
        latch: &ReadyLatch,
    ) -> Result<(), BootstrapError> {
        tracing::debug!(port = config.port, "Creating udp server");
        let handler = modules
            .sockets
            .get(UDP_SOCKET_NAMESPACE)
            .and_then(|module| module.udp_handler())
            .ok_or(BootstrapError::MissingSocketHandler {
                protocol: Protocol::Udp,
                convention: "sockets/udp/index",
            })?;
        self.driver.create_udp_server(UdpServerOptions {
            port: config.port,
            kind: config.kind,
            handler,
            on_listening: latch.register(),
            cluster: cluster.enabled,
        });
        Ok(())
    }
}

fn require_routes<'a>(
    scan: &'a RouteScan,
    protocol: Protocol,
    convention: &'static str,
) -> Result<&'a ModuleTree<Arc<dyn RouteModule>>, BootstrapError> {
    let detail = match scan {
        RouteScan::RoutesRootAbsent => "the routes directory does not exist",
        RouteScan::CategoryAbsent => "its route directory does not exist",
        RouteScan::Loaded(tree) if tree.is_empty() => "its route directory is empty",
        RouteScan::Loaded(tree) => return Ok(tree),
    };
    Err(BootstrapError::MissingRoutes {
        protocol,
        convention,
        detail,
    })
}

/// Assemble router + middleware pipeline into one request handler.
fn build_request_handler(
    methods: Vec<Method>,
    routes: &ModuleTree<Arc<dyn RouteModule>>,
    middlewares: &ModuleTree<Arc<dyn MiddlewareModule>>,
    scope: &str,
) -> Result<HttpHandlerFn, BootstrapError> {
    let mut pipeline = MiddlewarePipeline::new();
    for namespace in &middlewares.namespaces {
        if !namespace.starts_with(scope) {
            continue;
        }
        let Some(module) = middlewares.get(namespace) else {
            continue;
        };
        pipeline
            .register_middleware(MiddlewareRegistration {
                priority: module.priority(),
                middleware: module.handler(),
            })
            .map_err(|source| BootstrapError::MiddlewareRegistration {
                namespace: namespace.clone(),
                source,
            })?;
    }

    let mut router = Router::new();
    router.set_supported_http_methods(methods);
    if !pipeline.is_empty() {
        let pipeline = Arc::new(pipeline);
        router.set_middleware(Arc::new(move |request| {
            let pipeline = pipeline.clone();
            Box::pin(async move { pipeline.on_request(request).await })
        }));
    }

    for namespace in &routes.namespaces {
        let Some(module) = routes.get(namespace) else {
            continue;
        };
        router
            .register_route(module)
            .map_err(|source| BootstrapError::RouteRegistration {
                namespace: namespace.clone(),
                source,
            })?;
    }

    Ok(router.into_request_handler())
}
