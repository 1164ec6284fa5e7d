//! User Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ProfileUpdate, User, UserProfile};

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create an account; the unique email index rejects duplicates
    pub async fn create(&self, name: String, email: String, password_hash: String, role: String) -> RepoResult<User> {
        let now = Utc::now();
        let user = User {
            id: None,
            name,
            email: email.clone(),
            password: password_hash,
            role,
            address: String::new(),
            phone: String::new(),
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| match RepoError::from(e) {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate(format!("Email {} is already registered", email))
                }
                other => other,
            })?;
        created.ok_or_else(|| RepoError::Database("User create returned nothing".into()))
    }

    pub async fn update_profile(&self, email: &str, update: ProfileUpdate) -> RepoResult<User> {
        #[derive(serde::Serialize)]
        struct Patch {
            #[serde(flatten)]
            update: ProfileUpdate,
            updated_at: chrono::DateTime<Utc>,
        }

        let updated: Vec<User> = self
            .base
            .db()
            .query("UPDATE user MERGE $patch WHERE email = $email RETURN AFTER")
            .bind((
                "patch",
                Patch {
                    update,
                    updated_at: Utc::now(),
                },
            ))
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", email)))
    }

    /// Customer accounts (role `user`), for the admin back-office
    pub async fn find_customers(&self) -> RepoResult<Vec<UserProfile>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = 'user' ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }
}
