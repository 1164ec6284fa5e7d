//! Pricing Engine Module
//!
//! Discount resolution, discounted-price arithmetic and cart totals.
//! Pricing is computed on the backend everywhere a price is shown or
//! charged; client-submitted prices are never trusted.

pub mod aggregator;
pub mod calculator;
pub mod resolver;

pub use aggregator::{CartTotals, PricedCart, PricedLine, SHIPPING_FEE, price_cart, price_line, totals_for_subtotal};
pub use calculator::discounted_unit_price;
pub use resolver::{MatchPolicy, ResolvedDiscount, is_window_active, resolve};
