//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Validate route registrations (url + at least one method handler)
//! - Store the composed route table, immutable after construction
//! - Dispatch requests: match url and method, run the middleware hook,
//!   invoke the route handler
//!
//! # Design Decisions
//! - Unsupported method ⇒ 501, unknown url ⇒ 404, known url without the
//!   method ⇒ 405
//! - The matched route is inserted into request extensions before the
//!   middleware hook runs, so middleware can see what it is wrapping
//! - O(1) url lookup via HashMap; exact matching only

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use thiserror::Error;

use crate::modules::{HttpHandlerFn, MiddlewareFn, MiddlewareVerdict, RouteHandlerFn, RouteModule};

/// Error type for route registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("route module does not declare a url")]
    MissingUrl,

    #[error("route module does not expose any http method handlers")]
    NoActions,
}

/// Information about the matched route, available to middleware and
/// handlers through request extensions.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    pub url: String,
    pub method: Method,
}

/// Request router for one protocol listener.
#[derive(Default)]
pub struct Router {
    supported: Vec<Method>,
    routes: HashMap<String, HashMap<Method, RouteHandlerFn>>,
    middleware: Option<MiddlewareFn>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict dispatch to the given methods.
    pub fn set_supported_http_methods(&mut self, methods: Vec<Method>) {
        self.supported = methods;
    }

    /// Install the per-request middleware hook.
    pub fn set_middleware(&mut self, hook: MiddlewareFn) {
        self.middleware = Some(hook);
    }

    /// Validate and register one route module. Later registrations of the
    /// same url and method win, matching the discovery order.
    pub fn register_route(&mut self, module: &Arc<dyn RouteModule>) -> Result<(), RouterError> {
        let url = module.url().ok_or(RouterError::MissingUrl)?.to_string();
        let actions = module.actions();
        if actions.is_empty() {
            return Err(RouterError::NoActions);
        }
        let entry = self.routes.entry(url).or_default();
        for action in actions {
            entry.insert(action.method, action.handler);
        }
        Ok(())
    }

    /// Freeze the route table into a composed request handler.
    pub fn into_request_handler(self) -> HttpHandlerFn {
        let router = Arc::new(self);
        Arc::new(move |request| {
            let router = router.clone();
            Box::pin(async move { router.dispatch(request).await })
        })
    }

    async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        if !self.supported.contains(&method) {
            return status_response(StatusCode::NOT_IMPLEMENTED);
        }
        let Some(entry) = self.routes.get(&path) else {
            return status_response(StatusCode::NOT_FOUND);
        };
        let Some(handler) = entry.get(&method).cloned() else {
            return status_response(StatusCode::METHOD_NOT_ALLOWED);
        };

        let mut request = request;
        request.extensions_mut().insert(MatchedRoute {
            url: path,
            method,
        });

        if let Some(hook) = &self.middleware {
            match hook(request).await {
                MiddlewareVerdict::Next(next) => request = next,
                MiddlewareVerdict::Respond(response) => return response,
            }
        }
        handler(request).await
    }
}

fn status_response(status: StatusCode) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::from(status.canonical_reason().unwrap_or("")))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::RouteAction;

    struct FixedRoute {
        url: Option<&'static str>,
        body: &'static str,
    }

    impl RouteModule for FixedRoute {
        fn url(&self) -> Option<&str> {
            self.url
        }

        fn actions(&self) -> Vec<RouteAction> {
            let body = self.body;
            vec![RouteAction {
                method: Method::GET,
                handler: Arc::new(move |_| {
                    Box::pin(async move {
                        Response::builder().body(Body::from(body)).unwrap()
                    })
                }),
            }]
        }
    }

    struct BareRoute;

    impl RouteModule for BareRoute {
        fn url(&self) -> Option<&str> {
            Some("/bare")
        }

        fn actions(&self) -> Vec<RouteAction> {
            Vec::new()
        }
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatches_matched_route() {
        let mut router = Router::new();
        router.set_supported_http_methods(vec![Method::GET]);
        let module: Arc<dyn RouteModule> = Arc::new(FixedRoute {
            url: Some("/test"),
            body: "test",
        });
        router.register_route(&module).unwrap();

        let handler = router.into_request_handler();
        let response = handler(get("/test")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "test");
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let mut router = Router::new();
        router.set_supported_http_methods(vec![Method::GET]);
        let handler = router.into_request_handler();
        assert_eq!(handler(get("/missing")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_501() {
        let mut router = Router::new();
        router.set_supported_http_methods(vec![Method::POST]);
        let module: Arc<dyn RouteModule> = Arc::new(FixedRoute {
            url: Some("/test"),
            body: "test",
        });
        router.register_route(&module).unwrap();

        let handler = router.into_request_handler();
        assert_eq!(
            handler(get("/test")).await.status(),
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn test_malformed_modules_are_rejected() {
        let mut router = Router::new();

        let no_url: Arc<dyn RouteModule> = Arc::new(FixedRoute {
            url: None,
            body: "",
        });
        assert_eq!(router.register_route(&no_url), Err(RouterError::MissingUrl));

        let no_actions: Arc<dyn RouteModule> = Arc::new(BareRoute);
        assert_eq!(router.register_route(&no_actions), Err(RouterError::NoActions));
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let mut router = Router::new();
        router.set_supported_http_methods(vec![Method::GET]);
        let module: Arc<dyn RouteModule> = Arc::new(FixedRoute {
            url: Some("/test"),
            body: "test",
        });
        router.register_route(&module).unwrap();
        router.set_middleware(Arc::new(|_| {
            Box::pin(async {
                MiddlewareVerdict::Respond(
                    Response::builder()
                        .status(StatusCode::TOO_MANY_REQUESTS)
                        .body(Body::empty())
                        .unwrap(),
                )
            })
        }));

        let handler = router.into_request_handler();
        assert_eq!(
            handler(get("/test")).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
