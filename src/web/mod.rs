use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::Path as AxumPath,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_embed::Embed;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::TaskApi;

mod errors;
mod handlers;
mod pages;
mod session;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn TaskApi>,
}

impl AppState {
    pub fn new(api: impl TaskApi + 'static) -> Self {
        AppState { api: Arc::new(api) }
    }
}

/// Embedded static assets compiled into the binary.
#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

/// Same-origin path of the htmx script every page loads.
pub const HTMX_ASSET: &str = "htmx.min.js";

/// Pinned release used when `static/htmx.min.js` is not bundled in the build.
pub const HTMX_RELEASE_URL: &str = "https://unpkg.com/htmx.org@2.0.4/dist/htmx.min.js";

/// Serve embedded static files at /static/{path}.
async fn static_handler(AxumPath(path): AxumPath<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = if path.ends_with(".js") {
                "application/javascript"
            } else if path.ends_with(".css") {
                "text/css"
            } else {
                "application/octet-stream"
            };
            ([(header::CONTENT_TYPE, mime)], content.data).into_response()
        }
        None if path == HTMX_ASSET => Redirect::temporary(HTMX_RELEASE_URL).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/signin",
            get(handlers::sign_in_page).post(handlers::sign_in),
        )
        .route(
            "/signup",
            get(handlers::sign_up_page).post(handlers::sign_up),
        )
        .route("/signout", post(handlers::sign_out))
        .route("/tasks", get(handlers::task_list))
        .route(
            "/tasks/new",
            get(handlers::new_task_page).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::task_detail).post(handlers::update_task),
        )
        .route("/tasks/{id}/toggle", post(handlers::toggle_task))
        .route(
            "/tasks/{id}/delete",
            get(handlers::confirm_delete).post(handlers::delete_task),
        )
        .route("/static/{*path}", get(static_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the browser client until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(%local, "web server listening");
    println!("taskdeck web UI: http://{local}");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
