//! reservations.rs
//!
//! Движок переходов резервирования. Держит инвариант: флаг
//! `seats.is_reserved` истинен тогда и только тогда, когда на место
//! ссылается ровно одна строка в `reservations`.
//!
//! Проверка "свободно ли место" выполняется ВНУТРИ той же транзакции,
//! что и последующие записи, блокирующим чтением (SELECT ... FOR UPDATE
//! по строке места). Отдельная проверка до транзакции недостаточна: два
//! конкурентных запроса могут оба увидеть "свободно".

use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{seat::SeatRef, Reservation};
use crate::stores::SeatStore;

#[derive(Clone)]
pub struct ReservationEngine {
    pool: PgPool,
}

impl ReservationEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Точечный снимок флага места. Чтение вне транзакции, к моменту
    /// следующей записи может устареть; единственный надежный барьер -
    /// блокирующее чтение внутри `reserve`/`delete_reservation`.
    ///
    /// Никогда не возвращает ошибку: нулевая ссылка, отсутствующее
    /// место и сбой чтения дают `false`.
    pub async fn is_reserved(&self, seat: SeatRef) -> bool {
        if !seat.is_valid() {
            return false;
        }

        sqlx::query_scalar::<_, bool>(
            r#"SELECT is_reserved FROM seats WHERE "row" = $1 AND number = $2"#,
        )
        .bind(seat.row)
        .bind(seat.number)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
    }

    /// Переход Free -> Reserved. Вставка строки резервирования и
    /// установка флага коммитятся вместе или не происходят вовсе.
    pub async fn reserve(&self, user_id: i64, seat: SeatRef) -> Result<Reservation, ApiError> {
        if !seat.is_valid() {
            return Err(ApiError::Validation(
                "row and number must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Блокируем строку места до конца транзакции
        let reserved = SeatStore::get_flag_for_update(&mut *tx, seat)
            .await?
            .ok_or_else(|| ApiError::Validation("seat does not exist".to_string()))?;

        if reserved {
            // tx роняется без коммита - откат
            return Err(ApiError::ReservationAlreadyExists);
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (user_id, seat_row, seat_number)
             VALUES ($1, $2, $3)
             RETURNING reservation_id, user_id, seat_row, seat_number",
        )
        .bind(user_id)
        .bind(seat.row)
        .bind(seat.number)
        .fetch_one(&mut *tx)
        .await?;

        SeatStore::set_flag(&mut *tx, seat, true).await?;

        tx.commit().await?;

        tracing::debug!(
            reservation_id = reservation.reservation_id,
            user_id,
            row = seat.row,
            number = seat.number,
            "seat reserved"
        );

        Ok(reservation)
    }

    /// Переход Reserved -> Free. Удалять резервирование может только
    /// его владелец.
    pub async fn delete_reservation(&self, user_id: i64, seat: SeatRef) -> Result<(), ApiError> {
        if !seat.is_valid() {
            return Err(ApiError::Validation(
                "row and number must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Тот же порядок блокировок, что и в reserve: сначала место
        SeatStore::get_flag_for_update(&mut *tx, seat).await?;

        // Совпадать должны ОБА поля, row и number
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT reservation_id, user_id FROM reservations
             WHERE seat_row = $1 AND seat_number = $2
             FOR UPDATE",
        )
        .bind(seat.row)
        .bind(seat.number)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((reservation_id, owner_id)) = row else {
            return Err(ApiError::ReservationNotFound);
        };

        if owner_id != user_id {
            return Err(ApiError::NoPermission);
        }

        sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(&mut *tx)
            .await?;

        SeatStore::set_flag(&mut *tx, seat, false).await?;

        tx.commit().await?;

        tracing::debug!(
            reservation_id,
            user_id,
            row = seat.row,
            number = seat.number,
            "reservation deleted"
        );

        Ok(())
    }
}
