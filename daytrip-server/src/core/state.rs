//! Server State
//!
//! Cloned into every handler; all fields are cheap to clone.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::bookings::BookingEngine;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::{BlobStore, LocalBlobStore};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub bookings: Arc<BookingEngine>,
    pub blob_store: Arc<dyn BlobStore>,
}

impl ServerState {
    /// Wire state from already-opened parts
    pub fn new(config: Config, db: DbService, blob_store: Arc<dyn BlobStore>) -> Self {
        let bookings = Arc::new(BookingEngine::from_config(db.pool.clone(), &config));
        Self {
            config: Arc::new(config),
            db,
            bookings,
            blob_store,
        }
    }

    /// Open the database and local blob storage named by `config`
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;
        let db = DbService::new(&config.database_path).await?;
        std::fs::create_dir_all(&config.image_storage_base_path)?;
        let blob_store = Arc::new(LocalBlobStore::new(
            config.image_storage_base_path.clone(),
            config.image_storage_base_url.clone(),
        ));
        tracing::info!(
            max_pax_per_date = config.max_pax_per_date,
            gratuity_rate_per_pax = config.gratuity_rate_per_pax,
            enforce_status_transitions = config.enforce_status_transitions,
            "Booking rules loaded"
        );
        Ok(Self::new(config.clone(), db, blob_store))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
