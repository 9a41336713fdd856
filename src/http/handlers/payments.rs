use axum::{
    extract::State,
    response::sse::{KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::http::response::{data, ApiError, DataEnvelope};
use crate::http::server::AppState;
use crate::payments::monitor::{callback_events, health_events};
use crate::payments::HealthReport;

pub async fn payment_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: state.payments.health().await,
    })
}

pub async fn payment_monitor(State(state): State<AppState>) -> impl IntoResponse {
    let events = health_events(state.payments.clone(), state.shutdown.notified());
    Sse::new(events).keep_alive(KeepAlive::default())
}

pub async fn payment_callbacks(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Value>>, ApiError> {
    state
        .payments
        .callbacks()
        .await
        .map(data)
        .map_err(|err| ApiError::upstream("callbacks_fetch_failed", &err))
}

pub async fn callbacks_monitor(State(state): State<AppState>) -> impl IntoResponse {
    let events = callback_events(state.payments.clone(), state.shutdown.notified());
    Sse::new(events).keep_alive(KeepAlive::default())
}
