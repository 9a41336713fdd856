//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the console's routes
//! - Wire the access gate in order: origin filter, perimeter verifier, admin guard
//! - Wire ambient middleware (request id, tracing, timeout, CORS, cache headers)
//! - Serve with connection info and graceful shutdown

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{auth::admin_auth_middleware, setup_admin_router};
use crate::assets::BlobClient;
use crate::backend::BackendClient;
use crate::config::ConsoleConfig;
use crate::http::handlers::{
    accounts::*, admin_accounts::*, assets::*, auth_users::*, payments::*, transactions::*,
    ui::console_index,
};
use crate::http::request::{request_span, UuidRequestId};
use crate::lifecycle::Shutdown;
use crate::payments::PaymentFeeds;
use crate::security::{
    headers::{api_cache_headers, cors_layer},
    origin::{origin_filter_middleware, AllowList},
    perimeter::{perimeter_middleware, PerimeterVerifier},
    session::{AdminCredentials, SessionSigner},
};

/// Application state injected into handlers and gate middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub allow_list: Arc<AllowList>,
    /// `None` when the perimeter is bypassed outside production.
    pub perimeter: Option<Arc<PerimeterVerifier>>,
    pub sessions: Arc<SessionSigner>,
    pub credentials: Arc<AdminCredentials>,
    pub backend: Arc<BackendClient>,
    pub assets: Arc<BlobClient>,
    pub payments: Arc<PaymentFeeds>,
    /// Ends event streams so graceful shutdown can drain their connections.
    pub shutdown: Arc<Shutdown>,
}

/// Routes that require an admin session.
fn admin_data_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route(
            "/api/accounts/{id}",
            patch(update_account).delete(delete_account),
        )
        .route("/api/transactions", get(list_transactions))
        .route("/api/auth/users", get(list_auth_users).post(create_auth_user))
        .route(
            "/api/auth/users/{id}",
            patch(update_auth_user).delete(delete_auth_user),
        )
        .route(
            "/api/admin-accounts",
            get(list_admin_accounts).post(create_admin_account),
        )
        .route(
            "/api/admin-accounts/{id}",
            patch(update_admin_account).delete(delete_admin_account),
        )
        .route("/api/assets/list", get(list_assets))
        .route("/api/assets/upload", post(upload_asset))
        .route("/api/assets", delete(remove_asset))
        .route("/api/payment/callbacks", get(payment_callbacks))
        .route("/api/payment/callbacks/monitor", get(callbacks_monitor))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            admin_auth_middleware,
        ))
}

/// Build the full application router.
///
/// Layers run outermost first: request id, trace, timeout, CORS, cache
/// headers, origin filter, perimeter verifier, then per-route admin guard.
pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/payment/health", get(payment_health))
        .route("/api/payment/monitor", get(payment_monitor))
        .merge(setup_admin_router(&state))
        .merge(admin_data_routes(&state));

    if let Some(root) = state.config.web_root.as_deref() {
        app = app
            .route("/", get(console_index))
            .fallback_service(ServeDir::new(root));
    }

    let mut app = app
        .layer(DefaultBodyLimit::max(state.config.listener.max_body_size))
        .with_state(state.clone());

    if let Some(perimeter) = state.perimeter.clone() {
        app = app.layer(middleware::from_fn_with_state(perimeter, perimeter_middleware));
    }

    app.layer(middleware::from_fn_with_state(
        state.allow_list.clone(),
        origin_filter_middleware,
    ))
    .layer(middleware::from_fn(api_cache_headers))
    .layer(cors_layer())
    .layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(state.config.timeouts.request_secs),
    ))
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(TraceLayer::new_for_http().make_span_with(request_span))
    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// HTTP server for the admin console.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
