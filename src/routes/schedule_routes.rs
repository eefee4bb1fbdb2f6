use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::ScheduleController;
use crate::models::{Schedule, ScheduleDraft, SchedulePatch};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/:id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}

async fn list_schedules(State(state): State<AppState>) -> Json<Vec<Schedule>> {
    Json(ScheduleController::new(&state).list().await)
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleController::new(&state).get_by_id(id).await?;
    Ok(Json(schedule))
}

async fn create_schedule(
    State(state): State<AppState>,
    body: Result<Json<ScheduleDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let Json(draft) = body?;
    let schedule = ScheduleController::new(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<SchedulePatch>, JsonRejection>,
) -> Result<Json<Schedule>, AppError> {
    let Json(patch) = body?;
    let schedule = ScheduleController::new(&state).update(id, patch).await?;
    Ok(Json(schedule))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    ScheduleController::new(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Horario eliminado exitosamente" })))
}
