//! Cart Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use super::serde_id;

/// One cart line
///
/// `price` and `image` are snapshots taken when the line was added; the
/// checkout path never trusts them and re-derives pricing from the live
/// catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product record id in `product:xxx` string form
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
}

/// Per-user cart, keyed by the session email
///
/// Invariant: at most one line per product; re-adding a product merges
/// into the existing line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_id::option")]
    pub id: Option<Thing>,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// Add-to-cart payload
///
/// Only the product reference and quantity cross the boundary; the name,
/// snapshot price and image are filled in server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartAdd {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    #[validate(range(min = 1, max = 9999, message = "quantity must be between 1 and 9999"))]
    pub quantity: i64,
}
