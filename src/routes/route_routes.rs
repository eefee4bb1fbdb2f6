use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::RouteController;
use crate::models::{Route, RouteDraft, RoutePatch};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", get(get_route).put(update_route).delete(delete_route))
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(RouteController::new(&state).list().await)
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Route>, AppError> {
    let route = RouteController::new(&state).get_by_id(id).await?;
    Ok(Json(route))
}

async fn create_route(
    State(state): State<AppState>,
    body: Result<Json<RouteDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let Json(draft) = body?;
    let route = RouteController::new(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<RoutePatch>, JsonRejection>,
) -> Result<Json<Route>, AppError> {
    let Json(patch) = body?;
    let route = RouteController::new(&state).update(id, patch).await?;
    Ok(Json(route))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    RouteController::new(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Ruta eliminada exitosamente" })))
}
