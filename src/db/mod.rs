//! Database Module
//!
//! Embedded SurrealDB connection and schema setup.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "figure_store";
const DATABASE: &str = "store";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database under `db_dir`
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let path = db_dir.join("store.db");
        let db = Surreal::new::<RocksDb>(path.to_string_lossy().as_ref())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        let service = Self { db };
        service.setup().await?;

        tracing::info!(path = %path.display(), "Database connection established");
        Ok(service)
    }

    /// Open an in-memory database, used by tests
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory db: {}", e)))?;

        let service = Self { db };
        service.setup().await?;
        Ok(service)
    }

    async fn setup(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        // Unique indexes backing the invariants the repositories rely on:
        // one account per email, one cart per user, no duplicate order numbers.
        self.db
            .query(
                "
                DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user FIELDS email UNIQUE;
                DEFINE INDEX IF NOT EXISTS uniq_cart_user ON TABLE cart FIELDS user_id UNIQUE;
                DEFINE INDEX IF NOT EXISTS uniq_order_number ON TABLE orders FIELDS order_number UNIQUE;
                ",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define indexes: {}", e)))?;

        Ok(())
    }
}
