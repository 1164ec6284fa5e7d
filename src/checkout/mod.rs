//! Order Finalizer
//!
//! Turns a cart reference into a persisted order. Every price is
//! re-derived server-side from the live catalog and discounts at the
//! moment of commitment; the client's item list is only a reference for
//! which products and quantities to charge.

pub mod order_number;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::db::models::{Order, OrderItem, OrderStatus, Shipping};
use crate::db::repository::{CartRepository, DiscountRepository, OrderRepository, ProductRepository};
use crate::pricing::{price_line, totals_for_subtotal};
use crate::utils::{AppError, AppResult};

/// Per-line quantity cap; keeps line totals far away from i64 overflow
pub const MAX_QUANTITY: i64 = 9_999;

/// One requested line: which product, how many
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Checkout input, assembled by the handler from the multipart form
#[derive(Debug, Clone, Validate)]
pub struct CheckoutRequest {
    pub user_email: String,
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub items: Vec<CheckoutItem>,
    /// Stored slip filename; the handler writes the upload before calling
    pub slip: String,
}

/// What the customer gets back
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_number: String,
    pub total: Decimal,
}

/// Finalize an order
///
/// Aborts without persisting anything when a referenced product has
/// vanished, when validation fails, or when order-number generation is
/// exhausted. On success the order is stored as `pending` and the
/// customer's cart is cleared.
pub async fn finalize_order(
    db: &Surreal<Db>,
    request: CheckoutRequest,
    now: DateTime<Utc>,
) -> AppResult<CheckoutReceipt> {
    request.validate()?;
    if request.items.is_empty() {
        return Err(AppError::validation("Cannot check out an empty cart"));
    }
    for item in &request.items {
        if item.quantity < 1 {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "Item quantity cannot exceed {}",
                MAX_QUANTITY
            )));
        }
    }
    if request.slip.is_empty() {
        return Err(AppError::validation("Payment slip is required"));
    }

    let products_repo = ProductRepository::new(db.clone());
    let discounts_repo = DiscountRepository::new(db.clone());
    let orders_repo = OrderRepository::new(db.clone());
    let carts_repo = CartRepository::new(db.clone());

    // Re-resolve every line server-side; unlike the cart read path, a
    // vanished product aborts the whole checkout
    let ids: Vec<String> = request.items.iter().map(|i| i.product_id.clone()).collect();
    let products = products_repo.find_by_ids(&ids).await?;
    let discounts = discounts_repo.find_all().await?;

    let mut items = Vec::with_capacity(request.items.len());
    let mut subtotal: i64 = 0;
    for requested in &request.items {
        let product = products
            .iter()
            .find(|p| p.id_string() == requested.product_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Product {} no longer exists", requested.product_id))
            })?;

        let line = price_line(requested.quantity, product, &discounts, now);
        subtotal += line.line_total();
        items.push(OrderItem {
            product_id: line.product_id,
            name: line.name,
            title: line.title,
            quantity: line.quantity,
            price: line.unit_price,
            original_price: line.original_price,
            discount_percent: line.discount_percent,
            image: line.image,
        });
    }

    let totals = totals_for_subtotal(subtotal);
    let order_number = order_number::generate_unique(&orders_repo).await?;

    let order = Order {
        id: None,
        user: request.user_email.clone(),
        items,
        subtotal: totals.subtotal,
        shipping_fee: totals.shipping_fee,
        vat: totals.vat,
        total: totals.grand_total,
        shipping: Shipping {
            fullname: request.fullname,
            address: request.address,
            phone: request.phone,
        },
        slip: request.slip,
        order_number,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let persisted = orders_repo.create(order).await?;

    // Clear the originating cart; the order is already committed, so a
    // failure here must not fail the checkout
    if let Err(e) = carts_repo.delete_by_user(&request.user_email).await {
        tracing::error!(user = %request.user_email, error = %e, "Failed to clear cart after checkout");
    }

    tracing::info!(
        order_number = %persisted.order_number,
        user = %persisted.user,
        total = %persisted.total,
        "Order placed"
    );

    Ok(CheckoutReceipt {
        order_number: persisted.order_number,
        total: persisted.total,
    })
}
