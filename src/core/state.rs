//! Server state

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::ROLE_ADMIN;
use crate::db::repository::UserRepository;
use crate::storage::FileStorage;
use crate::utils::AppResult;

/// Shared server state - singleton references for every handler
///
/// Cloning is shallow; the database handle and JWT service are shared.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
    /// Upload file storage
    pub storage: FileStorage,
}

impl ServerState {
    /// Initialize the full state: work-dir layout, database, services
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::utils::AppError::internal(format!("Failed to create work dir: {}", e)))?;

        let db_service = DbService::new(&config.database_dir()).await?;

        let state = Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            storage: FileStorage::new(config.uploads_dir()),
        };

        state.ensure_admin_account().await?;
        Ok(state)
    }

    /// Build state over an existing (usually in-memory) database, used by
    /// tests
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let storage = FileStorage::new(config.uploads_dir());
        Self {
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            config,
            db,
            storage,
        }
    }

    /// Create the back-office account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`
    /// when configured and not yet present
    async fn ensure_admin_account(&self) -> AppResult<()> {
        let (Ok(email), Ok(password)) = (
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            return Ok(());
        };

        let users = UserRepository::new(self.db.clone());
        if users.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let hash = crate::auth::hash_password(&password)?;
        users
            .create("Administrator".into(), email.clone(), hash, ROLE_ADMIN.into())
            .await?;
        tracing::info!(email = %email, "Admin account created");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
