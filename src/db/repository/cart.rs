//! Cart Repository
//!
//! One cart document per user email. Line merging happens here so every
//! caller preserves the one-line-per-product invariant.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem};

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user_id = $user")
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Add a line, merging quantity into an existing line for the same
    /// product
    pub async fn add_item(&self, user_id: &str, item: CartItem) -> RepoResult<Cart> {
        match self.find_by_user(user_id).await? {
            Some(mut cart) => {
                match cart
                    .items
                    .iter_mut()
                    .find(|i| i.product_id == item.product_id)
                {
                    Some(existing) => existing.quantity += item.quantity,
                    None => cart.items.push(item),
                }
                self.save_items(&cart).await
            }
            None => {
                let cart = Cart {
                    id: None,
                    user_id: user_id.to_string(),
                    items: vec![item],
                };
                let created: Option<Cart> =
                    self.base.db().create(CART_TABLE).content(cart).await?;
                created.ok_or_else(|| RepoError::Database("Cart create returned nothing".into()))
            }
        }
    }

    /// Remove one line; a cart that never existed is not an error
    pub async fn remove_item(&self, user_id: &str, product_id: &str) -> RepoResult<Option<Cart>> {
        let Some(mut cart) = self.find_by_user(user_id).await? else {
            return Ok(None);
        };
        cart.items.retain(|i| i.product_id != product_id);
        Ok(Some(self.save_items(&cart).await?))
    }

    /// Drop the user's cart entirely (checkout completion)
    pub async fn delete_by_user(&self, user_id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart WHERE user_id = $user")
            .bind(("user", user_id.to_string()))
            .await?;
        Ok(())
    }

    async fn save_items(&self, cart: &Cart) -> RepoResult<Cart> {
        let updated: Vec<Cart> = self
            .base
            .db()
            .query("UPDATE cart SET items = $items WHERE user_id = $user RETURN AFTER")
            .bind(("items", cart.items.clone()))
            .bind(("user", cart.user_id.clone()))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart for {} not found", cart.user_id)))
    }
}
