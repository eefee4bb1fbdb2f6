use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::BusController;
use crate::models::{Bus, BusDraft, BusPatch};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bus_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buses).post(create_bus))
        .route("/:id", get(get_bus).put(update_bus).delete(delete_bus))
}

async fn list_buses(State(state): State<AppState>) -> Json<Vec<Bus>> {
    Json(BusController::new(&state).list().await)
}

async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Bus>, AppError> {
    let bus = BusController::new(&state).get_by_id(id).await?;
    Ok(Json(bus))
}

async fn create_bus(
    State(state): State<AppState>,
    body: Result<Json<BusDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Bus>), AppError> {
    let Json(draft) = body?;
    let bus = BusController::new(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(bus)))
}

async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<BusPatch>, JsonRejection>,
) -> Result<Json<Bus>, AppError> {
    let Json(patch) = body?;
    let bus = BusController::new(&state).update(id, patch).await?;
    Ok(Json(bus))
}

async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    BusController::new(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Autobús eliminado exitosamente" })))
}
