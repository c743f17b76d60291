use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Семантические ошибки домена. Транспорт (HTTP-коды) подбирается
/// в `IntoResponse`, сами ошибки к нему не привязаны.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("user already created")]
    DuplicateUser,

    #[error("user not found")]
    UserNotFound,

    #[error("reservation already exist")]
    ReservationAlreadyExists,

    #[error("reservation not found")]
    ReservationNotFound,

    #[error("no permission")]
    NoPermission,

    #[error("internal storage error")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUser => StatusCode::CONFLICT,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::ReservationAlreadyExists => StatusCode::CONFLICT,
            ApiError::ReservationNotFound => StatusCode::NOT_FOUND,
            ApiError::NoPermission => StatusCode::FORBIDDEN,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Тело ошибки: текст + момент времени
#[derive(Debug, Serialize)]
pub struct ErrDto {
    pub error: String,
    pub time: DateTime<Utc>,
}

impl ErrDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            time: Utc::now(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Детали сбоя хранилища не отдаем клиенту, только в лог
        let body = match &self {
            ApiError::Storage(e) => {
                tracing::error!("storage error: {:?}", e);
                ErrDto::new("internal server error")
            }
            other => ErrDto::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
