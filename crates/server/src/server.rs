//! Server state, router, and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use board::storage::default_allowed_types;
use board::{BlobStore, Directory, FileStorage, Reports, Storage, TaskFlow};

use crate::config::Config;
use crate::handlers;

/// Shared application state.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration.
    pub config: Config,
    /// Persistent store, kept for readiness checks.
    pub storage: Arc<dyn Storage>,
    /// Task workflow service.
    pub flow: TaskFlow,
    /// User directory service.
    pub directory: Directory,
    /// Reporting service.
    pub reports: Reports,
}

impl ServerState {
    /// Open the stores under the configured data directory.
    pub async fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data_dir));
        storage
            .initialize()
            .await
            .context("Failed to initialize file storage")?;

        let blobs = Arc::new(BlobStore::with_limits(
            config.data_dir.join("blobs"),
            config.max_proof_bytes,
            default_allowed_types(),
        ));
        blobs
            .initialize()
            .await
            .context("Failed to initialize blob store")?;

        Ok(Self {
            flow: TaskFlow::new(storage.clone(), blobs),
            directory: Directory::new(storage.clone()),
            reports: Reports::new(storage.clone()),
            storage,
            config,
        })
    }
}

/// Build the HTTP router with all API routes and the middleware stack.
pub fn build_router(state: ServerState) -> Router {
    // HTTP-level backstop above the blob store's own limit, so oversized
    // uploads still reach the domain check and get the JSON 413
    let body_limit = usize::try_from(state.config.max_proof_bytes.saturating_add(64 * 1024))
        .unwrap_or(usize::MAX);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Tasks
        .route(
            "/api/tasks",
            get(handlers::tasks::all_tasks).post(handlers::tasks::create_task),
        )
        .route("/api/tasks/mine", get(handlers::tasks::my_tasks))
        .route("/api/tasks/{id}", get(handlers::tasks::get_task))
        .route(
            "/api/tasks/{id}/proof",
            put(handlers::tasks::upload_proof).get(handlers::tasks::download_proof),
        )
        .route(
            "/api/tasks/{id}/complete",
            post(handlers::tasks::mark_complete),
        )
        .route("/api/tasks/{id}/review", post(handlers::tasks::review_task))
        // Caller profile
        .route(
            "/api/me",
            get(handlers::users::get_me).put(handlers::users::save_profile),
        )
        .route("/api/me/role", get(handlers::users::my_role))
        // User administration
        .route("/api/users", get(handlers::users::all_user_stats))
        .route("/api/users/active", get(handlers::users::active_users))
        .route(
            "/api/users/{principal}",
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        .route(
            "/api/users/{principal}/tasks",
            get(handlers::users::user_tasks),
        )
        .route(
            "/api/users/{principal}/role",
            put(handlers::users::set_user_role),
        )
        .route(
            "/api/users/{principal}/status",
            put(handlers::users::set_account_status),
        )
        // Reporting
        .route("/api/dashboard", get(handlers::reports::admin_dashboard))
        .route(
            "/api/departments/productivity",
            get(handlers::reports::department_productivity),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                warn!(origin, "Unparseable CORS origin, falling back to permissive");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    }
}

/// Bind the configured address and serve until ctrl-c or SIGTERM.
pub async fn run_server(state: ServerState) -> Result<()> {
    let addr = state.config.bind_addr();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Taskdesk API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Taskdesk API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

// ============================================================================
// Health endpoints
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "taskdesk",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn readiness_check(
    State(state): State<ServerState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    // Ready means the store is reachable
    if let Err(e) = state.storage.list_users().await {
        warn!(error = %e, "Readiness check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(HealthResponse {
        status: "ready",
        service: "taskdesk",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
