use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::seat::SeatRef;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/reservation",
        get(check_reservation)
            .post(create_reservation)
            .delete(delete_reservation),
    )
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    row: i32,
    number: i32,
}

// GET /api/reservation?row=&number=
async fn check_reservation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let seat = SeatRef::new(params.row, params.number);
    if !seat.is_valid() {
        return Err(ApiError::Validation(
            "row and number must be positive".to_string(),
        ));
    }

    let reserved = state.reservations.is_reserved(seat).await;
    Ok(Json(json!({ "reserved": reserved })))
}

#[derive(Debug, Deserialize)]
struct ReservationRequest {
    user_id: i64,
    row: i32,
    number: i32,
}

// POST /api/reservation
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Пользователь должен существовать, движок это не перепроверяет
    state.users.get_by_id(req.user_id).await?;

    let reservation = state
        .reservations
        .reserve(req.user_id, SeatRef::new(req.row, req.number))
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// DELETE /api/reservation
async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .reservations
        .delete_reservation(req.user_id, SeatRef::new(req.row, req.number))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
