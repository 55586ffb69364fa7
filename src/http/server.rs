//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the axum Router with the fixed endpoint set
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch introspection paths through the route table
//! - Serve the echo and static-file endpoints
//! - Emit access and rejection log events for every dispatch

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{header, Method, Response, StatusCode},
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;

use crate::config::ServerConfig;
use crate::http::facts::RequestFacts;
use crate::http::render::{PageData, Renderer};
use crate::observability::{logging, metrics};
use crate::routing::{self, Action};

/// Application state injected into handlers.
///
/// Read-only after construction; the only state shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let renderer = Arc::new(Renderer::new(&config));
        Self { config, renderer }
    }
}

/// Build the axum router with all endpoints and middleware layers.
///
/// The echo and static-file endpoints are exact (case-sensitive) routes;
/// everything else falls through to the table dispatcher.
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    let request_timeout = Duration::from_secs(config.timeouts.request_secs);
    let state = AppState::new(config);

    Router::new()
        .route("/GET", any(query_echo))
        .route("/POST", any(body_echo))
        .route("/favicon.ico", any(favicon))
        .route("/robots.txt", any(robots))
        .fallback(dispatch)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
}

/// Table dispatcher for the introspection paths.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
) -> Response<Body> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    match routing::lookup(&path) {
        Some(Action::Field(name)) => {
            let facts = extract_facts(&state, &req, peer);
            let value = facts.get(name).unwrap_or_default().to_string();
            log_access(peer, &method, &path, StatusCode::OK);
            state.renderer.plain(StatusCode::OK, value)
        }
        Some(Action::Index) => {
            let facts = extract_facts(&state, &req, peer);
            let data = PageData::index(&facts);
            let response = state.renderer.page(req.headers(), "index", &data);
            log_access(peer, &method, &path, response.status());
            response
        }
        None => {
            log_reject(peer, &method, &path, StatusCode::NOT_FOUND);
            state.renderer.error_page(
                req.headers(),
                StatusCode::NOT_FOUND,
                &format!("{path} not found"),
            )
        }
    }
}

/// Query echo: GET only, writes the raw query string back.
async fn query_echo(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
) -> Response<Body> {
    let path = req.uri().path().to_string();
    if req.method() != Method::GET {
        log_reject(peer, req.method(), &path, StatusCode::BAD_REQUEST);
        return state
            .renderer
            .error_page(req.headers(), StatusCode::BAD_REQUEST, "method not GET");
    }

    let query = req.uri().query().unwrap_or_default().to_string();
    log_access(peer, &Method::GET, &path, StatusCode::OK);
    state.renderer.plain(StatusCode::OK, query)
}

/// Body echo: POST only, streams the request body back verbatim.
async fn body_echo(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
) -> Response<Body> {
    let path = req.uri().path().to_string();
    if req.method() != Method::POST {
        log_reject(peer, req.method(), &path, StatusCode::BAD_REQUEST);
        return state
            .renderer
            .error_page(req.headers(), StatusCode::BAD_REQUEST, "method not POST");
    }

    log_access(peer, &Method::POST, &path, StatusCode::OK);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::SERVER, state.renderer.server_header())
        .body(req.into_body())
        .unwrap()
}

async fn favicon(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
) -> Response<Body> {
    let path = req.uri().path().to_string();
    serve_asset(
        &state,
        peer,
        req.method(),
        req.headers(),
        &path,
        "favicon.ico",
        "image/x-icon",
    )
    .await
}

async fn robots(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
) -> Response<Body> {
    let path = req.uri().path().to_string();
    serve_asset(
        &state,
        peer,
        req.method(),
        req.headers(),
        &path,
        "robots.txt",
        "text/plain; charset=utf-8",
    )
    .await
}

/// Stream a file from the template directory verbatim.
async fn serve_asset(
    state: &AppState,
    peer: SocketAddr,
    method: &Method,
    headers: &header::HeaderMap,
    path: &str,
    name: &str,
    content_type: &'static str,
) -> Response<Body> {
    match tokio::fs::read(state.renderer.asset_path(name)).await {
        Ok(bytes) => {
            log_access(peer, method, path, StatusCode::OK);
            Response::builder()
                .status(StatusCode::OK)
                .header(header::SERVER, state.renderer.server_header())
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(bytes))
                .unwrap()
        }
        Err(_) => {
            log_reject(peer, method, path, StatusCode::NOT_FOUND);
            state.renderer.error_page(
                headers,
                StatusCode::NOT_FOUND,
                &format!("could not find {path}"),
            )
        }
    }
}

fn extract_facts(state: &AppState, req: &Request, peer: SocketAddr) -> RequestFacts {
    RequestFacts::extract(
        req.headers(),
        req.method(),
        req.uri(),
        req.version(),
        peer,
        state.config.listener.trust_forwarded_for,
    )
}

fn log_access(peer: SocketAddr, method: &Method, path: &str, status: StatusCode) {
    logging::access(peer, path, status.as_u16());
    metrics::record_request(method.as_str(), status.as_u16());
}

fn log_reject(peer: SocketAddr, method: &Method, path: &str, status: StatusCode) {
    error!(remote = %peer, status = status.as_u16(), path, "request rejected");
    metrics::record_request(method.as_str(), status.as_u16());
}
