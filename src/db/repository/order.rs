//! Order Repository
//!
//! Order persistence plus the transactional fulfillment path. Stock
//! decrement and the status flip commit as one unit or not at all, so two
//! concurrent confirmations over shared stock can never both win.

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, make_thing};
use crate::db::models::{Order, OrderItem};

// "order" itself is a SurrealQL keyword (ORDER BY), hence the plural
const ORDER_TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Order create returned nothing".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = make_thing(ORDER_TABLE, id);
        let order: Option<Order> = self
            .base
            .db()
            .select((ORDER_TABLE, thing.id.to_raw()))
            .await?;
        Ok(order)
    }

    /// All orders, newest first (admin)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// One customer's order history, newest first
    pub async fn find_by_user(&self, user: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn exists_order_number(&self, order_number: &str) -> RepoResult<bool> {
        let found: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE order_number FROM orders WHERE order_number = $n LIMIT 1")
            .bind(("n", order_number.to_string()))
            .await?
            .take(0)?;
        Ok(!found.is_empty())
    }

    /// Confirm a pending order: flip status to `fulfilled` and decrement
    /// stock for every line inside a single transaction
    ///
    /// Each decrement is conditional (`WHERE stock >= quantity`); an empty
    /// update result throws inside the transaction, cancelling the status
    /// flip and every prior decrement. Surfaces as:
    /// - [`RepoError::Conflict`] naming the product when stock is short
    /// - [`RepoError::Validation`] when the order is not pending
    pub async fn fulfill(&self, order_id: &str, items: &[OrderItem]) -> RepoResult<Order> {
        let order_thing = make_thing(ORDER_TABLE, order_id);

        let mut sql = String::from(
            "BEGIN TRANSACTION;
             LET $ord = UPDATE $order_id SET status = 'fulfilled', updated_at = $now \
                 WHERE status = 'pending' RETURN AFTER;
             IF array::len($ord) == 0 { THROW 'order_not_pending' };\n",
        );
        for idx in 0..items.len() {
            sql.push_str(&format!(
                "LET $line{idx} = UPDATE $product{idx} SET stock -= $qty{idx}, updated_at = $now \
                     WHERE stock >= $qty{idx} RETURN AFTER;
                 IF array::len($line{idx}) == 0 {{ THROW 'insufficient_stock:{idx}' }};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("order_id", order_thing))
            .bind(("now", Utc::now()));
        for (idx, item) in items.iter().enumerate() {
            query = query
                .bind((format!("product{idx}"), make_thing("product", &item.product_id)))
                .bind((format!("qty{idx}"), item.quantity));
        }

        // A THROW aborts the transaction and surfaces on the throwing
        // statement; the remaining statements only report the generic
        // "failed transaction" message, so every statement error has to
        // be inspected for the markers
        match query.await {
            Ok(mut response) => {
                let errors = response.take_errors();
                if !errors.is_empty() {
                    return Err(Self::map_fulfill_errors(errors.into_values(), items));
                }
            }
            Err(e) => return Err(Self::map_fulfill_errors(std::iter::once(e), items)),
        }

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }

    fn map_fulfill_errors(
        errors: impl IntoIterator<Item = surrealdb::Error>,
        items: &[OrderItem],
    ) -> RepoError {
        let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();

        if messages.iter().any(|m| m.contains("order_not_pending")) {
            return RepoError::Validation("Order is not awaiting confirmation".into());
        }
        for msg in &messages {
            if let Some(pos) = msg.find("insufficient_stock:") {
                let idx: usize = msg[pos + "insufficient_stock:".len()..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap_or(0);
                let name = items
                    .get(idx)
                    .map(|i| i.name.as_str())
                    .unwrap_or("unknown product");
                return RepoError::Conflict(format!("Insufficient stock for \"{}\"", name));
            }
        }
        RepoError::Database(messages.join("; "))
    }

    /// Cancel a pending order; no stock effect
    pub async fn cancel(&self, order_id: &str) -> RepoResult<Order> {
        let order_thing = make_thing(ORDER_TABLE, order_id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $order_id SET status = 'cancelled', updated_at = $now \
                 WHERE status = 'pending' RETURN AFTER",
            )
            .bind(("order_id", order_thing))
            .bind(("now", Utc::now()))
            .await?
            .take(0)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Validation("Order is not awaiting confirmation".into()))
    }
}
