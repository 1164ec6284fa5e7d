//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_id;

/// Order lifecycle
///
/// `Pending` is the single initial state ("awaiting confirmation").
/// `Fulfilled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Fulfilled | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// One order line, fully snapshotted at checkout from server-side pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product record id in `product:xxx` string form
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub quantity: i64,
    /// Discounted unit price actually charged
    pub price: i64,
    /// Undiscounted catalog price at checkout time
    pub original_price: i64,
    pub discount_percent: u32,
    #[serde(default)]
    pub image: String,
}

/// Shipping contact captured at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipping {
    pub fullname: String,
    pub address: String,
    pub phone: String,
}

/// Persisted order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_id::option")]
    pub id: Option<Thing>,
    /// Customer email
    pub user: String,
    pub items: Vec<OrderItem>,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub vat: Decimal,
    pub total: Decimal,
    pub shipping: Shipping,
    /// Stored payment-slip filename
    pub slip: String,
    /// Unique 10-digit human-facing identifier
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// Admin status-update payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub order_id: String,
    pub status: String,
}
