//! Router HTTP del backend de la flota
//!
//! Cada recurso expone `GET/POST /{recurso}` y `GET/PUT/DELETE /{recurso}/:id`.

pub mod bus_routes;
pub mod reservation_routes;
pub mod route_routes;
pub mod schedule_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir la aplicación completa con CORS y trazas HTTP
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/buses", bus_routes::create_bus_router())
        .nest("/routes", route_routes::create_route_router())
        .nest("/schedules", schedule_routes::create_schedule_router())
        .nest("/reservations", reservation_routes::create_reservation_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "bus_fleet",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
