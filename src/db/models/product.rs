//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use super::serde_id;

/// Catalog product
///
/// `title` doubles as the linkage key against [`super::Discount`] records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_id::option")]
    pub id: Option<Thing>,
    pub name: String,
    #[serde(default)]
    pub studio: String,
    #[serde(default)]
    pub title: String,
    /// Figure scale, e.g. "1/7"
    #[serde(default)]
    pub scale: String,
    /// Unit price in whole baht
    pub price: i64,
    /// Units on hand, never negative after a successful mutation
    pub stock: i64,
    /// Ordered upload references, e.g. "/uploads/<file>"
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Record id in `product:xxx` string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// First image reference, used for cart/order snapshots
    pub fn primary_image(&self) -> String {
        self.images.first().cloned().unwrap_or_default()
    }
}

/// Create payload (admin)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub studio: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub scale: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i64,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: i64,
    #[serde(default)]
    pub description: String,
}

/// Partial update payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Catalog filter accepted by the public listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive contains
    pub studio: Option<String>,
    /// Case-insensitive contains
    pub title: Option<String>,
    /// Exact match
    pub scale: Option<String>,
}
