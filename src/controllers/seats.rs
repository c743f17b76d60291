use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Seat;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/seats", get(get_seats))
}

#[derive(Debug, Deserialize)]
struct SeatsQuery {
    free: Option<bool>,
}

// GET /api/seats — все места, ?free=true — свободные, ?free=false — занятые
async fn get_seats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeatsQuery>,
) -> Result<Json<Vec<Seat>>, ApiError> {
    let seats = match params.free {
        None => state.seats.list_all().await?,
        Some(true) => state.seats.list_free().await?,
        Some(false) => state.seats.list_reserved().await?,
    };

    Ok(Json(seats))
}
