//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use axum::body::Body;
use axum::extract::ws::Message;
use axum::http::{Method, Request, Response};
use futures_util::future::BoxFuture;
use tokio::io::AsyncWriteExt;

use igniter::error::BoxError;
use igniter::modules::{
    Initializer, MiddlewareFn, MiddlewareModule, MiddlewareVerdict, RouteAction, RouteModule,
    SocketModule, TcpConnectionFn, UdpDatagramFn, WsConnectionFn,
};

/// A scratch application directory following the bootstrap convention.
pub struct AppFixture {
    dir: tempfile::TempDir,
}

impl AppFixture {
    /// Create the fixture and write its `config/config.json`.
    pub fn new(config: serde_json::Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.json"),
            serde_json::to_vec_pretty(&config).unwrap(),
        )
        .unwrap();
        Self { dir }
    }

    /// Create an empty module marker file under the app root.
    pub fn module_file(&self, relative: &str) -> &Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(path).unwrap();
        self
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Minimal http config enabling one GET-only server.
pub fn http_config(port: u16) -> serde_json::Value {
    serde_json::json!({
        "servers": {
            "http": {"enabled": true, "port": port, "methods": ["GET"]}
        },
        "cluster": {"enabled": false}
    })
}

fn text_handler(body: &'static str) -> igniter::modules::RouteHandlerFn {
    Arc::new(move |_request| {
        Box::pin(async move { Response::builder().body(Body::from(body)).unwrap() })
    })
}

/// Route returning a fixed body on GET.
pub struct TextRoute {
    pub path: &'static str,
    pub body: &'static str,
}

impl RouteModule for TextRoute {
    fn url(&self) -> Option<&str> {
        Some(self.path)
    }

    fn actions(&self) -> Vec<RouteAction> {
        vec![RouteAction {
            method: Method::GET,
            handler: text_handler(self.body),
        }]
    }
}

/// Route module with no url: rejected at registration.
pub struct NoUrlRoute;

impl RouteModule for NoUrlRoute {
    fn url(&self) -> Option<&str> {
        None
    }

    fn actions(&self) -> Vec<RouteAction> {
        vec![RouteAction {
            method: Method::GET,
            handler: text_handler(""),
        }]
    }
}

/// Request extension set by [`TagMiddleware`].
#[derive(Debug, Clone)]
pub struct Tag(pub &'static str);

/// Middleware that stamps a tag onto each request.
pub struct TagMiddleware {
    pub priority: Option<u32>,
    pub tag: &'static str,
}

impl MiddlewareModule for TagMiddleware {
    fn priority(&self) -> Option<u32> {
        self.priority
    }

    fn handler(&self) -> Option<MiddlewareFn> {
        let tag = self.tag;
        Some(Arc::new(move |mut request: Request<Body>| {
            Box::pin(async move {
                request.extensions_mut().insert(Tag(tag));
                MiddlewareVerdict::Next(request)
            })
        }))
    }
}

/// Route echoing the tag a middleware stamped onto the request.
pub struct TagEchoRoute {
    pub path: &'static str,
}

impl RouteModule for TagEchoRoute {
    fn url(&self) -> Option<&str> {
        Some(self.path)
    }

    fn actions(&self) -> Vec<RouteAction> {
        vec![RouteAction {
            method: Method::GET,
            handler: Arc::new(|request: Request<Body>| {
                Box::pin(async move {
                    let tag = request
                        .extensions()
                        .get::<Tag>()
                        .map(|tag| tag.0)
                        .unwrap_or("untagged");
                    Response::builder().body(Body::from(tag)).unwrap()
                })
            }),
        }]
    }
}

/// Route serving whatever a startup initializer stored.
pub struct SharedValueRoute {
    pub path: &'static str,
    pub value: Arc<OnceLock<String>>,
}

impl RouteModule for SharedValueRoute {
    fn url(&self) -> Option<&str> {
        Some(self.path)
    }

    fn actions(&self) -> Vec<RouteAction> {
        let value = self.value.clone();
        vec![RouteAction {
            method: Method::GET,
            handler: Arc::new(move |_request| {
                let value = value.clone();
                Box::pin(async move {
                    let body = value.get().cloned().unwrap_or_default();
                    Response::builder().body(Body::from(body)).unwrap()
                })
            }),
        }]
    }
}

/// Initializer storing a value for routes to serve.
pub struct SetValueInitializer {
    pub priority: Option<u32>,
    pub value: Arc<OnceLock<String>>,
    pub text: &'static str,
}

impl Initializer for SetValueInitializer {
    fn priority(&self) -> Option<u32> {
        self.priority
    }

    fn run(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        let value = self.value.clone();
        let text = self.text;
        Box::pin(async move {
            let _ = value.set(text.to_string());
            Ok(())
        })
    }
}

/// Initializer recording its execution order.
pub struct OrderedInitializer {
    pub priority: Option<u32>,
    pub tag: &'static str,
    pub order: Arc<Mutex<Vec<&'static str>>>,
}

impl Initializer for OrderedInitializer {
    fn priority(&self) -> Option<u32> {
        self.priority
    }

    fn run(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        let order = self.order.clone();
        let tag = self.tag;
        Box::pin(async move {
            order.lock().unwrap().push(tag);
            Ok(())
        })
    }
}

/// Initializer that always fails.
pub struct FailingInitializer;

impl Initializer for FailingInitializer {
    fn priority(&self) -> Option<u32> {
        Some(1)
    }

    fn run(&self) -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin(async { Err("database unreachable".into()) })
    }
}

/// Socket handler answering every TCP connection with a fixed reply.
pub struct TcpReply {
    pub reply: &'static str,
}

impl SocketModule for TcpReply {
    fn tcp_handler(&self) -> Option<TcpConnectionFn> {
        let reply = self.reply;
        Some(Arc::new(move |mut stream, _peer| {
            Box::pin(async move {
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            })
        }))
    }
}

/// Socket handler echoing every UDP datagram back to its sender.
pub struct UdpEcho;

impl SocketModule for UdpEcho {
    fn udp_handler(&self) -> Option<UdpDatagramFn> {
        Some(Arc::new(|datagram, peer, socket| {
            Box::pin(async move {
                let _ = socket.send_to(&datagram, peer).await;
            })
        }))
    }
}

/// Socket handler echoing websocket text frames.
pub struct WsEcho;

impl SocketModule for WsEcho {
    fn ws_handler(&self) -> Option<WsConnectionFn> {
        Some(Arc::new(|mut socket| {
            Box::pin(async move {
                while let Some(Ok(message)) = socket.recv().await {
                    if let Message::Text(text) = message {
                        if socket.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                }
            })
        }))
    }
}

/// Socket module exposing no handler at all.
pub struct BareSocket;

impl SocketModule for BareSocket {}
