//! Network layer: the reference tokio-backed server driver.
//!
//! # Data Flow
//! ```text
//! Orchestrator option objects
//!     → TokioDriver (fire-and-forget spawn per listener)
//!         http.rs  → axum serve, server-level websocket upgrade
//!         https.rs → axum-server with rustls
//!         tcp.rs   → accept loop, task per connection
//!         udp.rs   → recv loop, task per datagram
//!     → ListenerAck fired after each successful bind
//! ```
//!
//! # Design Decisions
//! - Bind failures are logged, never acknowledged: readiness stalls rather
//!   than lying about a listener that is not up
//! - Cluster fan-out is delegated to the deployment's process supervisor;
//!   the trait seam is where a forking driver plugs in

pub mod http;
pub mod https;
pub mod tcp;
pub mod udp;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::modules::WsConnectionFn;
use crate::servers::{
    DriverError, HttpServerOptions, HttpsServerOptions, ServerDriver, TcpServerOptions,
    TcpSocketOptions, UdpServerOptions,
};

/// Reference [`ServerDriver`] on the tokio runtime.
#[derive(Default)]
pub struct TokioDriver {
    http_created: AtomicBool,
    ws: Arc<OnceLock<WsConnectionFn>>,
}

impl TokioDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServerDriver for TokioDriver {
    fn create_http_server(&self, options: HttpServerOptions) {
        self.http_created.store(true, Ordering::SeqCst);
        http::spawn_http(options, self.ws.clone());
    }

    fn create_https_server(&self, options: HttpsServerOptions) {
        https::spawn_https(options);
    }

    fn create_tcp_server(&self, options: TcpServerOptions, socket_options: TcpSocketOptions) {
        tcp::spawn_tcp(options, socket_options);
    }

    fn create_udp_server(&self, options: UdpServerOptions) {
        udp::spawn_udp(options);
    }

    fn attach_http_web_socket(&self, handler: WsConnectionFn) -> Result<(), DriverError> {
        if !self.http_created.load(Ordering::SeqCst) {
            return Err(DriverError::HttpServerNotCreated);
        }
        self.ws
            .set(handler)
            .map_err(|_| DriverError::WebSocketAlreadyAttached)
    }

    fn cluster(&self, workers: usize) {
        // worker processes replaying the startup sequence are the process
        // supervisor's job; readiness stays a primary-process guarantee
        tracing::warn!(
            workers,
            "Cluster fan-out requested; delegating process forking to the deployment"
        );
    }
}
