//! Discount Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use super::serde_id;

/// Title-matched percentage discount
///
/// `title` is matched against [`super::Product::title`]. A discount with
/// neither date is permanently active; the window semantics live in
/// [`crate::pricing::resolver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default, with = "serde_id::option")]
    pub id: Option<Thing>,
    pub title: String,
    /// Percent off, 1..=100
    pub discount_percent: u32,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Create payload (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiscountCreate {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(range(min = 1, max = 100, message = "discount percent must be 1-100"))]
    pub discount_percent: u32,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}
