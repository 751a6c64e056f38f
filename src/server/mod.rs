// Genie HTTP server
// Serves the synthesis API plus the static front-end to browsers on the LAN

pub mod routes;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::genie::Synthesizer;
use crate::vocab::Vocabulary;

const MIN_BODY_BYTES: usize = 16 * 1024;
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Size limits applied before synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_prompt_chars: usize,
    pub max_body_bytes: usize,
}

impl RequestLimits {
    /// Body limit leaves room for a prompt of 4-byte characters plus JSON framing
    pub fn new(max_prompt_chars: usize) -> Self {
        Self {
            max_prompt_chars,
            max_body_bytes: MIN_BODY_BYTES.max(max_prompt_chars.saturating_mul(4) + 1024),
        }
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Shared state for the request handlers
pub struct AppState {
    pub synthesizer: Synthesizer,
    pub vocab: &'static Vocabulary,
    pub limits: RequestLimits,
}

/// Holds the running server's shutdown mechanism
pub struct RunningServer {
    pub shutdown_tx: oneshot::Sender<()>,
    pub addr: SocketAddr,
    pub handle: JoinHandle<()>,
}

impl RunningServer {
    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            error!(error = %e, "Server task failed");
        }
    }
}

/// Build the full application router.
/// Without a static directory the server runs in API-only mode.
pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    // CORS is permissive: the API carries no credentials
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    let body_limit = state.limits.max_body_bytes;
    let api = routes::api_routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let app = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static assets");
            api.route_service("/", ServeFile::new(dir.join("index.html")))
                .nest_service("/src", ServeDir::new(dir.join("src")))
        }
        None => {
            info!("No static directory found, API-only mode");
            api
        }
    };

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(preflight))
}

/// Answer every OPTIONS request with 204 and permissive CORS headers
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "content-type, accept"),
            (header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE),
        ],
    )
        .into_response()
}

/// Start the HTTP server.
/// Returns the running server handle (for shutdown) or the bind error.
pub async fn start_server(
    state: Arc<AppState>,
    listen: SocketAddr,
    static_dir: Option<&Path>,
) -> std::io::Result<RunningServer> {
    let app = build_router(state, static_dir);

    // Try to bind to the requested port, with fallback
    let listener = try_bind(listen).await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    info!(%addr, "Server starting");
    if let Some(url) = lan_url(addr) {
        info!(%url, "Reachable on the local network");
    }

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Shutdown signal received, draining connections");
            })
            .await
        {
            error!(error = %e, "Server error");
        }
        info!("Server stopped");
    });

    Ok(RunningServer {
        shutdown_tx,
        addr,
        handle,
    })
}

/// Bind the preferred address, falling back to nearby ports then an OS-assigned one
async fn try_bind(preferred: SocketAddr) -> std::io::Result<TcpListener> {
    let first_error = match TcpListener::bind(preferred).await {
        Ok(listener) => return Ok(listener),
        Err(e) => e,
    };

    // Try ports preferred+1 through preferred+10
    for offset in 1..=10u16 {
        let port = preferred.port().saturating_add(offset);
        if let Ok(listener) = TcpListener::bind(SocketAddr::new(preferred.ip(), port)).await {
            warn!(preferred = preferred.port(), port, "Preferred port unavailable");
            return Ok(listener);
        }
    }

    // Fall back to OS-assigned port
    match TcpListener::bind(SocketAddr::new(preferred.ip(), 0)).await {
        Ok(listener) => {
            warn!(preferred = preferred.port(), "All preferred ports unavailable, using an OS-assigned port");
            Ok(listener)
        }
        Err(_) => Err(first_error),
    }
}

/// URL other devices can use when bound to every interface
fn lan_url(addr: SocketAddr) -> Option<String> {
    if !addr.ip().is_unspecified() {
        return None;
    }
    let ip: IpAddr = local_ip_address::local_ip().ok()?;
    Some(format!("http://{}:{}", ip, addr.port()))
}
