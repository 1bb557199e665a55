//! Server driver contract.
//!
//! The orchestrator validates preconditions and assembles option objects;
//! everything that actually opens sockets lives behind this trait. Creation
//! calls are fire-and-forget: a driver binds in the background and reports
//! through the `on_listening` acknowledgment, never through a return value.
//! A listener that never acknowledges stalls readiness — there is no
//! timeout at this layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::UdpKind;
use crate::modules::{HttpHandlerFn, TcpConnectionFn, UdpDatagramFn, WsConnectionFn};
use crate::servers::readiness::ListenerAck;

/// Error type for the driver requests that validate their own state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("http server has not been created; nothing to attach the websocket upgrade to")]
    HttpServerNotCreated,

    #[error("a websocket upgrade handler is already attached")]
    WebSocketAlreadyAttached,
}

/// Options for an HTTP listener.
pub struct HttpServerOptions {
    pub port: u16,
    pub handler: HttpHandlerFn,
    pub on_listening: ListenerAck,
    pub cluster: bool,
}

/// Options for an HTTPS listener. TLS material is loaded by the driver.
pub struct HttpsServerOptions {
    pub port: u16,
    pub handler: HttpHandlerFn,
    pub on_listening: ListenerAck,
    pub cluster: bool,
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Options for a TCP listener.
pub struct TcpServerOptions {
    pub port: u16,
    pub handler: TcpConnectionFn,
    pub on_listening: ListenerAck,
    pub cluster: bool,
}

/// Socket-level TCP options, forwarded verbatim to the driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpSocketOptions {
    pub allow_half_open: bool,
    pub pause_on_connect: bool,
}

/// Options for a UDP listener.
pub struct UdpServerOptions {
    pub port: u16,
    pub kind: UdpKind,
    pub handler: UdpDatagramFn,
    pub on_listening: ListenerAck,
    pub cluster: bool,
}

/// The external protocol-server library, seen from the orchestrator.
pub trait ServerDriver: Send + Sync {
    fn create_http_server(&self, options: HttpServerOptions);

    fn create_https_server(&self, options: HttpsServerOptions);

    fn create_tcp_server(&self, options: TcpServerOptions, socket_options: TcpSocketOptions);

    fn create_udp_server(&self, options: UdpServerOptions);

    /// Attach a websocket upgrade handler to the already-created HTTP
    /// listener. Fails when no HTTP server exists; does not affect
    /// readiness accounting.
    fn attach_http_web_socket(&self, handler: WsConnectionFn) -> Result<(), DriverError>;

    /// Fork `workers` processes that each replay the startup sequence.
    /// Requested once, after every listener start call has been issued.
    fn cluster(&self, workers: usize);
}
