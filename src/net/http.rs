//! HTTP listener backed by axum.
//!
//! # Responsibilities
//! - Bind the configured port and acknowledge listening
//! - Wire up middleware layers (tracing, request ID)
//! - Hand every request to the composed bootstrap handler
//! - Serve the websocket upgrade path when a handler is attached
//!
//! # Design Decisions
//! - The upgrade check runs per request at the server level, so a
//!   websocket handler attached after creation is still honored on any
//!   path, matching the attach-to-running-listener contract

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderValue;
use axum::response::Response;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::modules::{HttpHandlerFn, WsConnectionFn};
use crate::servers::HttpServerOptions;

/// Request ID generator (UUID v4).
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[derive(Clone)]
pub(crate) struct HttpState {
    handler: HttpHandlerFn,
    ws: Arc<OnceLock<WsConnectionFn>>,
}

/// Spawn the HTTP listener. Fire-and-forget: bind errors are logged and the
/// listener never acknowledges.
pub(crate) fn spawn_http(options: HttpServerOptions, ws: Arc<OnceLock<WsConnectionFn>>) {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], options.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(error) => {
                tracing::error!(port = options.port, error = %error, "Failed to bind http listener");
                return;
            }
        };
        tracing::info!(address = %addr, cluster = options.cluster, "HTTP server listening");

        let app = build_app(HttpState {
            handler: options.handler,
            ws,
        });
        options.on_listening.listening();

        if let Err(error) = axum::serve(listener, app).await {
            tracing::error!(error = %error, "HTTP server terminated");
        }
    });
}

pub(crate) fn build_app(state: HttpState) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
        .layer(TraceLayer::new_for_http())
}

/// Build an app without a websocket slot, for listeners that do not carry
/// upgrades (HTTPS).
pub(crate) fn build_plain_app(handler: HttpHandlerFn) -> axum::Router {
    build_app(HttpState {
        handler,
        ws: Arc::new(OnceLock::new()),
    })
}

async fn dispatch(State(state): State<HttpState>, request: Request) -> Response {
    if let Some(handler) = state.ws.get().cloned() {
        let (mut parts, body) = request.into_parts();
        match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
            Ok(upgrade) => {
                return upgrade.on_upgrade(move |socket| handler(socket));
            }
            Err(_) => {
                // not an upgrade request; fall through to the handler
                let request = Request::from_parts(parts, body);
                return (state.handler)(request).await;
            }
        }
    }
    (state.handler)(request).await
}
