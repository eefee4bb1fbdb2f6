use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::ReservationController;
use crate::models::{Reservation, ReservationDraft, ReservationPatch};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route(
            "/:id",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
}

async fn list_reservations(State(state): State<AppState>) -> Json<Vec<Reservation>> {
    Json(ReservationController::new(&state).list().await)
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reservation>, AppError> {
    let reservation = ReservationController::new(&state).get_by_id(id).await?;
    Ok(Json(reservation))
}

async fn create_reservation(
    State(state): State<AppState>,
    body: Result<Json<ReservationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let Json(draft) = body?;
    let reservation = ReservationController::new(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<ReservationPatch>, JsonRejection>,
) -> Result<Json<Reservation>, AppError> {
    let Json(patch) = body?;
    let reservation = ReservationController::new(&state).update(id, patch).await?;
    Ok(Json(reservation))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    ReservationController::new(&state).delete(id).await?;
    Ok(Json(json!({ "message": "Reserva eliminada exitosamente" })))
}
