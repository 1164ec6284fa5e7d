//! Cart Aggregator
//!
//! Joins cart lines against the live catalog, prices each line through the
//! resolver and calculator, and derives the order totals. Read-only: never
//! mutates carts or products.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::db::models::{CartItem, Discount, Product};
use crate::pricing::calculator::discounted_unit_price;
use crate::pricing::resolver::{MatchPolicy, resolve};

/// Flat shipping fee (baht) charged on any non-empty cart
pub const SHIPPING_FEE: i64 = 200;

/// VAT rate applied to the subtotal (7%)
pub fn vat_rate() -> Decimal {
    Decimal::new(7, 2)
}

/// One cart line joined against the live catalog and priced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub title: String,
    pub image: String,
    pub quantity: i64,
    /// Undiscounted catalog price
    pub original_price: i64,
    pub discount_percent: u32,
    /// Discounted unit price actually charged
    pub unit_price: i64,
    /// Live stock, so the UI can warn before checkout
    pub stock: i64,
}

impl PricedLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

/// Derived money summary for a priced cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: i64,
    pub shipping_fee: i64,
    /// `round2(subtotal × 0.07)` - VAT base is the subtotal only
    pub vat: Decimal,
    pub grand_total: Decimal,
}

/// A fully priced cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedCart {
    pub items: Vec<PricedLine>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

/// Totals for a given subtotal: empty carts pay nothing at all
pub fn totals_for_subtotal(subtotal: i64) -> CartTotals {
    let shipping_fee = if subtotal > 0 { SHIPPING_FEE } else { 0 };
    let vat = (Decimal::from(subtotal) * vat_rate())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let grand_total = Decimal::from(subtotal + shipping_fee) + vat;
    CartTotals {
        subtotal,
        shipping_fee,
        vat,
        grand_total,
    }
}

/// Price a cart against the live catalog
///
/// Lines whose product no longer exists are dropped silently - a vanished
/// product must not error the whole cart on the read path.
pub fn price_cart(
    items: &[CartItem],
    products: &[Product],
    discounts: &[Discount],
    now: DateTime<Utc>,
) -> PricedCart {
    let lines: Vec<PricedLine> = items
        .iter()
        .filter_map(|item| {
            let product = products.iter().find(|p| p.id_string() == item.product_id)?;
            Some(price_line(item.quantity, product, discounts, now))
        })
        .collect();

    let subtotal = lines.iter().map(PricedLine::line_total).sum();
    PricedCart {
        items: lines,
        totals: totals_for_subtotal(subtotal),
    }
}

/// Price a single line for a known product
pub fn price_line(
    quantity: i64,
    product: &Product,
    discounts: &[Discount],
    now: DateTime<Utc>,
) -> PricedLine {
    let resolved = resolve(&product.title, discounts, now, MatchPolicy::Exact);
    PricedLine {
        product_id: product.id_string(),
        name: product.name.clone(),
        title: product.title.clone(),
        image: product.primary_image(),
        quantity,
        original_price: product.price,
        discount_percent: resolved.percent,
        unit_price: discounted_unit_price(product.price, resolved.percent),
        stock: product.stock,
    }
}
