use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: i64,
    pub user_id: i64,
    pub seat_row: i32,
    pub seat_number: i32,
}
