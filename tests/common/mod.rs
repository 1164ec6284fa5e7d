//! Shared test setup: in-memory database, temp work dir, token helpers.
#![allow(dead_code)]

use figure_store::auth::hash_password;
use figure_store::core::{Config, ServerState};
use figure_store::db::DbService;
use figure_store::db::models::{Product, ProductCreate};
use figure_store::db::repository::{ProductRepository, UserRepository};

pub async fn test_state(dir: &tempfile::TempDir) -> ServerState {
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    config.ensure_work_dir_structure().unwrap();
    let db = DbService::new_in_memory().await.unwrap();
    ServerState::with_db(config, db.db)
}

/// Create an account and return a bearer token for it
pub async fn token_for(state: &ServerState, email: &str, role: &str) -> String {
    let users = UserRepository::new(state.get_db());
    let hash = hash_password("password123").unwrap();
    users
        .create("Test User".into(), email.into(), hash, role.into())
        .await
        .unwrap();
    state
        .jwt_service
        .generate_token(email, "Test User", role)
        .unwrap()
}

/// Seed one product and return it
pub async fn seed_product(
    state: &ServerState,
    name: &str,
    title: &str,
    price: i64,
    stock: i64,
) -> Product {
    ProductRepository::new(state.get_db())
        .create(
            ProductCreate {
                name: name.into(),
                studio: "Good Smile".into(),
                title: title.into(),
                scale: "1/7".into(),
                price,
                stock,
                description: String::new(),
            },
            vec![format!("/uploads/{}.jpg", name)],
        )
        .await
        .unwrap()
}
