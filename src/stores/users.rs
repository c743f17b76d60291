use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::error::ApiError;
use crate::models::User;

/// Данные для регистрации пользователя.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "malformed email"))]
    pub email: String,
}

#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Создает пользователя. Дубликат email превращаем в доменную
    /// ошибку, а не отдаем голый сбой хранилища.
    pub async fn create(&self, new: NewUser) -> Result<User, ApiError> {
        new.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2)
             RETURNING user_id, name, email",
        )
        .bind(&new.name)
        .bind(&new.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateUser,
            _ => ApiError::Storage(e),
        })?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT user_id, name, email FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn get_id_by_email(&self, email: &str) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
