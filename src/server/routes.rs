/// API Routes definition

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::handlers;
use super::websocket;
use super::AppState;

pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    // Protected routes (require token when one is configured)
    let protected_routes = Router::new()
        .route("/api/refresh", post(handlers::refresh))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Public routes (read-only)
    let public_routes = Router::new()
        .route("/", get(handlers::dashboard_page))
        .route("/api/services", get(handlers::get_services))
        .route("/api/services/:key", get(handlers::get_service))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/health", get(handlers::health_check))
        .route("/ws/status", get(websocket::ws_status_handler));

    let mut app = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}
