use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub row: i32,
    pub number: i32,
    pub is_reserved: bool,
}

/// Ссылка на место: пара (row, number). Значение с нулевым или
/// отрицательным полем считается "нет места".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRef {
    pub row: i32,
    pub number: i32,
}

impl SeatRef {
    pub fn new(row: i32, number: i32) -> Self {
        Self { row, number }
    }

    pub fn is_valid(&self) -> bool {
        self.row > 0 && self.number > 0
    }
}
