use sqlx::{PgConnection, PgPool};

use crate::models::{seat::SeatRef, Seat};

/// Хранилище мест. Пул передается явно при создании,
/// никакого глобального состояния.
#[derive(Clone)]
pub struct SeatStore {
    pool: PgPool,
}

impl SeatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"SELECT id, "row", number, is_reserved FROM seats ORDER BY "row", number"#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_free(&self) -> Result<Vec<Seat>, sqlx::Error> {
        self.list_by_flag(false).await
    }

    pub async fn list_reserved(&self) -> Result<Vec<Seat>, sqlx::Error> {
        self.list_by_flag(true).await
    }

    async fn list_by_flag(&self, reserved: bool) -> Result<Vec<Seat>, sqlx::Error> {
        sqlx::query_as::<_, Seat>(
            r#"SELECT id, "row", number, is_reserved FROM seats
               WHERE is_reserved = $1 ORDER BY "row", number"#,
        )
        .bind(reserved)
        .fetch_all(&self.pool)
        .await
    }

    /// Читает флаг места под блокировкой строки (FOR UPDATE).
    /// Вызывается только внутри транзакции движка резервирования.
    /// `None` — такого места нет.
    pub async fn get_flag_for_update(
        conn: &mut PgConnection,
        seat: SeatRef,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT is_reserved FROM seats WHERE "row" = $1 AND number = $2 FOR UPDATE"#,
        )
        .bind(seat.row)
        .bind(seat.number)
        .fetch_optional(conn)
        .await
    }

    /// Выставляет флаг места; вызывается внутри той же транзакции,
    /// что и запись в reservations.
    pub async fn set_flag(
        conn: &mut PgConnection,
        seat: SeatRef,
        reserved: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(r#"UPDATE seats SET is_reserved = $1 WHERE "row" = $2 AND number = $3"#)
            .bind(reserved)
            .bind(seat.row)
            .bind(seat.number)
            .execute(conn)
            .await?;
        Ok(())
    }
}
