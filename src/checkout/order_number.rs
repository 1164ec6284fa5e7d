//! Order number generation
//!
//! Human-facing 10-digit identifiers, distinct from the internal record
//! id. Collisions are re-rolled against existing orders with a bounded
//! number of attempts; the unique index on `order_number` backstops any
//! race between the check and the insert.

use rand::Rng;

use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// Re-roll cap: 10^10 candidates make collisions vanishingly rare, so
/// hitting this means something is wrong with the store itself
const MAX_ATTEMPTS: usize = 16;

/// Random 10-digit numeric string (no leading zero)
fn random_order_number() -> String {
    rand::thread_rng()
        .gen_range(1_000_000_000u64..10_000_000_000u64)
        .to_string()
}

/// Generate an order number not used by any existing order
pub async fn generate_unique(orders: &OrderRepository) -> AppResult<String> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_order_number();
        if !orders.exists_order_number(&candidate).await? {
            return Ok(candidate);
        }
        tracing::warn!(order_number = %candidate, "Order number collision, re-rolling");
    }

    Err(AppError::conflict(
        "Could not allocate a unique order number",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_are_ten_digits() {
        for _ in 0..1000 {
            let n = random_order_number();
            assert_eq!(n.len(), 10);
            assert!(n.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(n.as_bytes()[0], b'0');
        }
    }
}
