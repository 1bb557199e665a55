//! Contracts for application modules.
//!
//! The bootstrap layer never inspects module internals; it discovers
//! modules by namespace and hands them to the router, middleware pipeline,
//! initializer runner, or server driver. Each contract deliberately exposes
//! its required pieces as `Option`s: a module missing a piece is not a
//! discovery error, it is a registration error raised by the component that
//! actually needs the piece.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ws::WebSocket;
use axum::http::{Method, Request, Response};
use futures_util::future::BoxFuture;
use tokio::net::{TcpStream, UdpSocket};

use crate::error::BoxError;

/// Composed async HTTP request handler.
pub type HttpHandlerFn =
    Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response<Body>> + Send + Sync>;

/// Handler for a single route action.
pub type RouteHandlerFn = HttpHandlerFn;

/// Outcome of a middleware invocation: pass the (possibly modified) request
/// on, or short-circuit with a response.
pub enum MiddlewareVerdict {
    Next(Request<Body>),
    Respond(Response<Body>),
}

/// A single middleware step.
pub type MiddlewareFn =
    Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, MiddlewareVerdict> + Send + Sync>;

/// Handler for an accepted TCP connection.
pub type TcpConnectionFn =
    Arc<dyn Fn(TcpStream, SocketAddr) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handler for a received UDP datagram. The bound socket is shared so the
/// handler can reply.
pub type UdpDatagramFn =
    Arc<dyn Fn(Vec<u8>, SocketAddr, Arc<UdpSocket>) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handler for an upgraded websocket connection.
pub type WsConnectionFn = Arc<dyn Fn(WebSocket) -> BoxFuture<'static, ()> + Send + Sync>;

/// One HTTP method a route responds to.
pub struct RouteAction {
    pub method: Method,
    pub handler: RouteHandlerFn,
}

/// A route module: a url plus at least one method handler.
///
/// Both pieces are optional at the contract level; the router rejects
/// incomplete modules at registration time.
pub trait RouteModule: Send + Sync {
    fn url(&self) -> Option<&str>;
    fn actions(&self) -> Vec<RouteAction>;
}

/// A middleware module: a static priority plus an onRequest handler.
pub trait MiddlewareModule: Send + Sync {
    fn priority(&self) -> Option<u32>;
    fn handler(&self) -> Option<MiddlewareFn>;
}

/// A socket handler module, keyed by the protocol directory it was
/// discovered under. A module only provides the handler matching its
/// protocol; the orchestrator requires the matching one and fails startup
/// when it is absent.
pub trait SocketModule: Send + Sync {
    fn tcp_handler(&self) -> Option<TcpConnectionFn> {
        None
    }

    fn udp_handler(&self) -> Option<UdpDatagramFn> {
        None
    }

    fn ws_handler(&self) -> Option<WsConnectionFn> {
        None
    }
}

/// A startup task run to completion before any listener opens.
pub trait Initializer: Send + Sync {
    /// Execution order; lower runs first. `None` marks a malformed module
    /// and fails registration.
    fn priority(&self) -> Option<u32>;

    fn run(&self) -> BoxFuture<'static, Result<(), BoxError>>;
}
