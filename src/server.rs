//! Static preview server for the built site.
//!
//! Serves `dist/` under the site's base path the same way the static host
//! does, so the wasm bundle can be checked locally after `trunk build`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

use crate::logging::{LogLevel, Logger};

const DEFAULT_PORT: u16 = 5173;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_BASE_PATH: &str = "/lab-website/";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const PORT_BOUNDS: (u16, u16) = (1024, 65_535);
const REQUEST_ID_HEADER: &str = "x-request-id";
const HTML_CACHE_CONTROL: &str = "no-cache";
const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    /// Always starts and ends with `/`.
    pub base_path: String,
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            base_path: DEFAULT_BASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_u16_with_bounds(&lookup, "PORT", DEFAULT_PORT, PORT_BOUNDS);
        let dist_dir = parse_non_empty_string(&lookup, "SITE_DIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let base_path = parse_non_empty_string(&lookup, "SITE_BASE_PATH")
            .map(|value| normalize_base_path(&value))
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        let log_level = parse_non_empty_string(&lookup, "LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            base_path,
            log_level,
        }
    }

    /// Base path without the trailing slash; empty when the site is served
    /// from the root.
    fn mount_point(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    logger: Logger,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let logger = Logger::new(config.log_level);
        Self {
            config: Arc::new(config),
            logger,
        }
    }
}

pub async fn run() -> Result<(), ServerError> {
    let state = AppState::new(ServerConfig::from_env());
    let port = state.config.port;
    let address = format!("0.0.0.0:{port}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    state.logger.info(
        "server_started",
        json!({
            "url": format!("http://127.0.0.1:{port}{}", state.config.base_path),
            "distDir": state.config.dist_dir.display().to_string(),
        }),
    );

    axum::serve(listener, router(state))
        .await
        .map_err(ServerError::Serve)
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();
    let static_service = ServeDir::new(&config.dist_dir)
        .not_found_service(ServeFile::new(config.dist_dir.join("index.html")));

    let router = if config.mount_point().is_empty() {
        Router::new().fallback_service(static_service)
    } else {
        let base_path = config.base_path.clone();
        Router::new()
            .route(
                "/",
                get(move || {
                    let target = base_path.clone();
                    async move { Redirect::temporary(&target) }
                }),
            )
            .nest_service(config.mount_point(), static_service)
            .fallback(not_found)
    };

    router
        .layer(middleware::from_fn_with_state(state.clone(), track_request))
        .with_state(state)
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = resolve_request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();

    if status.is_success() && !response.headers().contains_key(header::CACHE_CONTROL) {
        let value = if is_html(response.headers()) {
            HTML_CACHE_CONTROL
        } else {
            ASSET_CACHE_CONTROL
        };
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, cache_control(value));
    }

    if let Ok(request_id_header) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, request_id_header);
    }

    let level = if status.is_server_error() {
        LogLevel::Warn
    } else {
        LogLevel::Info
    };
    state.logger.log(
        level,
        "request_served",
        json!({
            "requestId": request_id,
            "method": method.as_str(),
            "path": path,
            "status": status.as_u16(),
            "durationMs": started_at.elapsed().as_millis() as u64,
        }),
    );

    response
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"))
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

pub fn normalize_base_path(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

fn parse_u16_with_bounds<F>(lookup: &F, name: &str, default: u16, bounds: (u16, u16)) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}
