//! Admin login and identity routes.
//!
//! `POST /api/admin/login` issues the session cookie and sits outside the
//! session guard; `GET /api/admin/me` sits behind it.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: &AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/api/admin/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/api/admin/login", post(login))
        .merge(guarded)
}
