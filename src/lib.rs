pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod stores;

use std::sync::Arc;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub users: stores::UserStore,
    pub seats: stores::SeatStore,
    pub reservations: services::ReservationEngine,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        // Каждому хранилищу и движку пул передается явно
        let users = stores::UserStore::new(db.pool.clone());
        let seats = stores::SeatStore::new(db.pool.clone());
        let reservations = services::ReservationEngine::new(db.pool.clone());

        Ok(Arc::new(Self {
            db,
            config,
            users,
            seats,
            reservations,
        }))
    }
}
