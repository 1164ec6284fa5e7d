//! Product Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{Product, ProductCreate, ProductFilter, ProductUpdate};

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Filtered catalog listing, newest first
    ///
    /// Studio/title filter by case-insensitive containment, scale exactly.
    pub async fn find_filtered(&self, filter: &ProductFilter) -> RepoResult<Vec<Product>> {
        let mut conditions = Vec::new();
        if filter.studio.is_some() {
            conditions.push("string::contains(string::lowercase(studio), string::lowercase($studio))");
        }
        if filter.title.is_some() {
            conditions.push("string::contains(string::lowercase(title), string::lowercase($title))");
        }
        if filter.scale.is_some() {
            conditions.push("scale = $scale");
        }

        let sql = if conditions.is_empty() {
            "SELECT * FROM product ORDER BY created_at DESC".to_string()
        } else {
            format!(
                "SELECT * FROM product WHERE {} ORDER BY created_at DESC",
                conditions.join(" AND ")
            )
        };

        let mut query = self.base.db().query(sql);
        if let Some(studio) = filter.studio.clone() {
            query = query.bind(("studio", studio));
        }
        if let Some(title) = filter.title.clone() {
            query = query.bind(("title", title));
        }
        if let Some(scale) = filter.scale.clone() {
            query = query.bind(("scale", scale));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let product: Option<Product> = self
            .base
            .db()
            .select((PRODUCT_TABLE, thing.id.to_raw()))
            .await?;
        Ok(product)
    }

    /// Fetch many products in one round trip; missing ids are simply absent
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let things: Vec<Thing> = ids.iter().map(|id| make_thing(PRODUCT_TABLE, id)).collect();
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn create(&self, data: ProductCreate, images: Vec<String>) -> RepoResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: None,
            name: data.name,
            studio: data.studio,
            title: data.title,
            scale: data.scale,
            price: data.price,
            stock: data.stock,
            images,
            description: data.description,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(PRODUCT_TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Product create returned nothing".into()))
    }

    /// Merge a partial update into the record
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        // Negative stock can never be saved, not even by an admin edit
        if matches!(data.stock, Some(s) if s < 0) {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let thing = make_thing(PRODUCT_TABLE, id);
        let now = Utc::now();

        #[derive(serde::Serialize)]
        struct Patch {
            #[serde(flatten)]
            data: ProductUpdate,
            updated_at: chrono::DateTime<Utc>,
        }

        let updated: Option<Product> = self
            .base
            .db()
            .update((PRODUCT_TABLE, thing.id.to_raw()))
            .merge(Patch {
                data,
                updated_at: now,
            })
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = make_thing(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self
            .base
            .db()
            .delete((PRODUCT_TABLE, thing.id.to_raw()))
            .await?;
        Ok(deleted.is_some())
    }

    /// Distinct titles, used by the admin discount form
    pub async fn distinct_titles(&self) -> RepoResult<Vec<String>> {
        let mut titles = self.distinct_field("title").await?;
        titles.sort();
        titles.dedup();
        Ok(titles)
    }

    /// Distinct non-empty values of one string field
    pub async fn distinct_field(&self, field: &str) -> RepoResult<Vec<String>> {
        // Field name comes from a fixed internal set, never from a caller
        let sql = format!("SELECT VALUE {} FROM product", field);
        let values: Vec<String> = self.base.db().query(sql).await?.take(0)?;
        let mut distinct: Vec<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
        distinct.sort();
        distinct.dedup();
        Ok(distinct)
    }
}
