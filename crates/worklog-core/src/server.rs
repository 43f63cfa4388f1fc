//! HTTP server implementation
//!
//! Hyper-based server with:
//! - Multi-threaded tokio runtime
//! - Per-method routing for O(1) dispatch
//! - TCP_NODELAY for low latency
//! - Connection tracking for graceful shutdown

use crate::{Method, Request, Response, Result, Router, StatusCode};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use parking_lot::RwLock;
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 5000,
            workers: num_cpus::get(),
        }
    }
}

impl ServerConfig {
    /// Resolve the bind address
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.hostname, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| crate::Error::InvalidAddress(e.to_string()))
    }
}

/// Dynamic route handler type
pub type DynamicHandler = Arc<
    dyn Fn(Request) -> Pin<Box<dyn std::future::Future<Output = Response> + Send>> + Send + Sync,
>;

/// Server state shared across all connections
///
/// Uses handler ids for routing, with separate storage for:
/// - Static responses (pre-rendered, cloned per request)
/// - Dynamic handlers (async closures)
///
/// Routes are registered during startup and only read afterwards.
pub struct ServerState {
    router: RwLock<Router<u32>>,
    static_responses: RwLock<HashMap<u32, Response>>,
    dynamic_handlers: RwLock<HashMap<u32, DynamicHandler>>,
    next_id: AtomicU32,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            router: RwLock::new(Router::new()),
            static_responses: RwLock::new(HashMap::new()),
            dynamic_handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(0),
        }
    }

    fn allocate_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a pre-rendered response for a route
    pub fn add_static(&self, method: Method, path: &str, response: Response) -> Result<()> {
        let id = self.allocate_id();
        self.router.write().route(method, path, id)?;
        self.static_responses.write().insert(id, response);
        Ok(())
    }

    /// Register a dynamic handler for a route
    pub fn add_dynamic(&self, method: Method, path: &str, handler: DynamicHandler) -> Result<()> {
        let id = self.allocate_id();
        self.router.write().route(method, path, id)?;
        self.dynamic_handlers.write().insert(id, handler);
        Ok(())
    }

    /// Match and handle a request
    pub async fn handle(&self, mut req: Request) -> Response {
        let matched = self.router.read().match_route(req.method, &req.path);

        if let Some(matched) = matched {
            // Static response first (fastest path)
            if let Some(response) = self.static_responses.read().get(&matched.value).cloned() {
                return response;
            }

            // Guard must be released before the handler is awaited
            let handler = self.dynamic_handlers.read().get(&matched.value).cloned();
            if let Some(handler) = handler {
                req.params = matched.params;
                return handler(req).await;
            }
        }

        Response::not_found()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks active connections for graceful shutdown
///
/// Used to:
/// - Count active connections
/// - Signal shutdown to reject new connections
/// - Wait for existing connections to drain
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    active: AtomicU64,
    shutting_down: AtomicBool,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    pub fn start_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

/// Create a tuned TCP listener
pub fn create_listener(addr: &SocketAddr) -> Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    Ok(TcpListener::from_std(socket.into())?)
}

/// Convert a hyper request to our Request type
///
/// The body is discarded: no route consumes one.
fn from_hyper_request(req: &hyper::Request<Incoming>) -> Result<Request> {
    let method = Method::parse(req.method().as_str())?;
    let uri = req.uri();

    let mut request = Request::new(method, uri.path());
    request.query = uri.query().map(|s| s.to_string());

    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    Ok(request)
}

/// Convert our Response to a hyper response
fn to_hyper_response(res: Response) -> hyper::Response<Full<Bytes>> {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Full::new(res.body)).unwrap_or_else(|_| {
        hyper::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
            .body(Full::new(Bytes::from_static(b"Internal Server Error")))
            .expect("minimal response")
    })
}

async fn handle_request(
    state: Arc<ServerState>,
    req: hyper::Request<Incoming>,
) -> std::result::Result<hyper::Response<Full<Bytes>>, std::convert::Infallible> {
    let start = Instant::now();

    let response = match from_hyper_request(&req) {
        Ok(request) => {
            let method = request.method;
            let path = request.path.clone();
            let response = state.handle(request).await;
            info!(
                method = %method,
                path = %path,
                status = response.status.as_u16(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "request"
            );
            response
        }
        Err(e) => {
            debug!("rejected request: {e}");
            crate::ResponseBuilder::new(StatusCode::METHOD_NOT_ALLOWED)
                .header("content-type", "text/plain")
                .body("Method Not Allowed")
                .build()
        }
    };

    Ok(to_hyper_response(response))
}

/// Serve connections until the shutdown signal fires, then drain
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    mut shutdown: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper_util::rt::TokioIo;

    let tracker = Arc::new(ConnectionTracker::new());

    info!(addr = %listener.local_addr()?, "listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("accept error: {e}");
                        continue;
                    }
                };

                if tracker.is_shutting_down() {
                    drop(stream);
                    continue;
                }

                let _ = stream.set_nodelay(true);
                let state = state.clone();
                let conn_tracker = tracker.clone();
                conn_tracker.increment();

                tokio::spawn(async move {
                    debug!(peer = %peer, "connection opened");
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| {
                        let state = state.clone();
                        async move { handle_request(state, req).await }
                    });

                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        // Clients hanging up mid-request are routine
                        if !e.to_string().contains("connection closed") {
                            debug!("connection error: {e}");
                        }
                    }

                    conn_tracker.decrement();
                });
            }
            _ = &mut shutdown => {
                tracker.start_shutdown();
                break;
            }
        }
    }

    // Drain in-flight connections, bounded
    let deadline = Instant::now() + Duration::from_secs(5);
    while tracker.count() > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    info!(remaining = tracker.count(), "server stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestBuilder;

    fn index_response() -> Response {
        Response::html("<!DOCTYPE html><title>Work Hours Logger</title>")
    }

    #[tokio::test]
    async fn test_static_route_dispatch() {
        let state = ServerState::new();
        state
            .add_static(Method::Get, "/", index_response())
            .unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/").build())
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("text/html; charset=utf-8"));
    }

    #[tokio::test]
    async fn test_static_route_is_idempotent() {
        let state = ServerState::new();
        state
            .add_static(Method::Get, "/", index_response())
            .unwrap();

        let first = state
            .handle(RequestBuilder::new(Method::Get, "/").build())
            .await;
        let second = state
            .handle(RequestBuilder::new(Method::Get, "/").build())
            .await;
        assert_eq!(first.body, second.body);
        assert_eq!(first.status, second.status);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = ServerState::new();
        state
            .add_static(Method::Get, "/", index_response())
            .unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/api/logs").build())
            .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dynamic_route_receives_params() {
        let state = ServerState::new();
        let handler: DynamicHandler = Arc::new(|req: Request| {
            Box::pin(async move { Response::text(req.param("path").unwrap_or("").to_string()) })
        });
        state
            .add_dynamic(Method::Get, "/static/{*path}", handler)
            .unwrap();

        let res = state
            .handle(RequestBuilder::new(Method::Get, "/static/js/app.js").build())
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(&res.body[..], b"js/app.js");
    }

    #[test]
    fn test_connection_tracker() {
        let tracker = ConnectionTracker::new();
        assert_eq!(tracker.count(), 0);
        tracker.increment();
        tracker.increment();
        assert_eq!(tracker.count(), 2);
        tracker.decrement();
        assert_eq!(tracker.count(), 1);

        assert!(!tracker.is_shutting_down());
        tracker.start_shutdown();
        assert!(tracker.is_shutting_down());
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.workers >= 1);
        assert!(config.addr().is_ok());
    }
}
