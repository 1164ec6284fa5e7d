//! Discount Resolver
//!
//! Matches a discount to a product by title and decides whether it is
//! currently active in the storefront timezone (UTC+7).

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::db::models::Discount;

/// Storefront reference timezone offset (Thailand, UTC+7)
const BANGKOK_OFFSET_SECS: i32 = 7 * 3600;

/// How discount titles are matched against product titles
///
/// Every production call site uses [`MatchPolicy::Exact`]; the substring
/// policy exists for looser matching against hand-typed titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Discount title equals the product title
    Exact,
    /// Discount title is contained in the product title, case-insensitive
    Substring,
}

impl MatchPolicy {
    fn matches(self, discount_title: &str, product_title: &str) -> bool {
        match self {
            MatchPolicy::Exact => discount_title == product_title,
            MatchPolicy::Substring => product_title
                .to_lowercase()
                .contains(&discount_title.to_lowercase()),
        }
    }
}

/// Resolution outcome
///
/// Absence of a match is not an error: it yields zero percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedDiscount {
    /// Percent to apply: 0, or the matched discount's percent when active
    pub percent: u32,
    /// Whether a matched discount is inside its window right now
    pub is_active: bool,
}

/// Resolve the applicable discount for a product title
///
/// When several discounts match, the most recently created one wins, which
/// keeps the outcome independent of storage iteration order.
pub fn resolve(
    product_title: &str,
    discounts: &[Discount],
    now: DateTime<Utc>,
    policy: MatchPolicy,
) -> ResolvedDiscount {
    let matched = discounts
        .iter()
        .filter(|d| policy.matches(&d.title, product_title))
        .max_by_key(|d| d.created_at);

    match matched {
        Some(discount) if is_window_active(discount, now) => ResolvedDiscount {
            percent: discount.discount_percent,
            is_active: true,
        },
        _ => ResolvedDiscount::default(),
    }
}

/// Whether `now` falls inside the discount window
///
/// A missing start date means "active since forever"; a missing end date
/// means "never expires". The end date is inclusive of its entire calendar
/// day in UTC+7: the discount stays active through 23:59:59.999 local time
/// and expires at local midnight.
pub fn is_window_active(discount: &Discount, now: DateTime<Utc>) -> bool {
    if let Some(start) = discount.start_date
        && now < start
    {
        return false;
    }
    if let Some(end) = discount.end_date
        && now > end_of_day_bangkok(end)
    {
        return false;
    }
    true
}

/// Last instant (23:59:59.999 UTC+7) of the calendar day containing `end`
fn end_of_day_bangkok(end: DateTime<Utc>) -> DateTime<Utc> {
    let bangkok =
        FixedOffset::east_opt(BANGKOK_OFFSET_SECS).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
    let local_day = end.with_timezone(&bangkok).date_naive();
    let local_midnight = local_day
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_local_timezone(bangkok)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(end);
    local_midnight + Duration::days(1) - Duration::milliseconds(1)
}
