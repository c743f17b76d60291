use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::stores::users::NewUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user).get(get_user))
}

// POST /api/users
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
struct UserQuery {
    id: Option<i64>,
    email: Option<String>,
}

// GET /api/users?id= или /api/users?email=
async fn get_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    match (params.id, params.email) {
        (Some(id), _) => {
            let user = state.users.get_by_id(id).await?;
            Ok(Json(json!(user)))
        }
        (None, Some(email)) => {
            let id = state.users.get_id_by_email(&email).await?;
            Ok(Json(json!({ "user_id": id })))
        }
        (None, None) => Err(ApiError::Validation(
            "id or email query parameter required".to_string(),
        )),
    }
}
