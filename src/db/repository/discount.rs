//! Discount Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{Discount, DiscountCreate};

const DISCOUNT_TABLE: &str = "discount";

#[derive(Clone)]
pub struct DiscountRepository {
    base: BaseRepository,
}

impl DiscountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All discounts, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Discount>> {
        let discounts: Vec<Discount> = self
            .base
            .db()
            .query("SELECT * FROM discount ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(discounts)
    }

    pub async fn create(&self, data: DiscountCreate) -> RepoResult<Discount> {
        let discount = Discount {
            id: None,
            title: data.title,
            discount_percent: data.discount_percent,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: Utc::now(),
        };

        let created: Option<Discount> =
            self.base.db().create(DISCOUNT_TABLE).content(discount).await?;
        created.ok_or_else(|| RepoError::Database("Discount create returned nothing".into()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = make_thing(DISCOUNT_TABLE, id);
        let deleted: Option<Discount> = self
            .base
            .db()
            .delete((DISCOUNT_TABLE, thing.id.to_raw()))
            .await?;
        Ok(deleted.is_some())
    }
}
