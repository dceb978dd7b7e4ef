/// API Request Handlers
/// Every handler reads the latest snapshot published by the polling task

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::view;
use super::AppState;
use crate::core::{ServiceRecord, ServiceStatus};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    total: usize,
    online: usize,
    offline: usize,
    loading: usize,
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn dashboard_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot();
    Html(view::render_page(
        &snapshot,
        state.locale,
        &state.target_host,
        state.poll_interval.as_secs(),
    ))
}

// ============================================================================
// Service Status Handlers
// ============================================================================

pub async fn get_services(State(state): State<AppState>) -> Json<ApiResponse<Vec<ServiceRecord>>> {
    Json(ApiResponse::ok(state.snapshot().records().to_vec()))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> (StatusCode, Json<ApiResponse<ServiceRecord>>) {
    match state.snapshot().get(&key) {
        Some(record) => (StatusCode::OK, Json(ApiResponse::ok(record.clone()))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown service: {}", key))),
        ),
    }
}

pub async fn get_summary(State(state): State<AppState>) -> Json<ApiResponse<StatusSummary>> {
    let snapshot = state.snapshot();
    Json(ApiResponse::ok(StatusSummary {
        total: snapshot.len(),
        online: snapshot.count(ServiceStatus::Online),
        offline: snapshot.count(ServiceStatus::Offline),
        loading: snapshot.count(ServiceStatus::Loading),
    }))
}

pub async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<String>>) {
    state.refresher.refresh();
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok("Refresh scheduled".to_string())),
    )
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
