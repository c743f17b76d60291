pub mod reservations;
pub mod seats;
pub mod users;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(users::routes())
        .merge(seats::routes())
        .merge(reservations::routes())
}
