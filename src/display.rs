//! Display values derived from deals

use jiff::Timestamp;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Formatter, Money, Params, Position, iso};

use crate::{deals::Deal, numeric::Numeric};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Render an amount as whole rupees with Indian digit grouping, e.g. `₹1,49,900`.
///
/// Missing or non-finite amounts render as `₹0`.
pub fn format_price(amount: impl Into<Numeric>) -> String {
    let rounded = amount
        .into()
        .or_zero()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    // Rounding can leave a negative zero behind, which would print a sign.
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };

    Formatter::money(&Money::from_decimal(rounded, iso::INR), rupee_params())
}

fn rupee_params() -> Params {
    Params {
        digit_separator: ',',
        exponent_separator: '.',
        separator_pattern: vec![3, 2, 2],
        positions: vec![Position::Sign, Position::Symbol, Position::Amount],
        rounding: Some(0),
        symbol: Some(iso::INR.symbol),
        code: Some(iso::INR.iso_alpha_code),
    }
}

/// Up votes minus down votes. Missing counts are treated as zero.
pub fn net_score(deal: &Deal) -> i64 {
    deal.upvotes
        .to_i64_or_zero()
        .saturating_sub(deal.downvotes.to_i64_or_zero())
}

/// Coarse elapsed time between `timestamp` and `now`: `just now`, `5m ago`, `3h ago`
/// or `2d ago`. Timestamps in the future read as `just now`.
pub fn time_ago(timestamp: Timestamp, now: Timestamp) -> String {
    let seconds = now.duration_since(timestamp).as_secs();

    if seconds < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if seconds < SECONDS_PER_HOUR {
        format!("{}m ago", seconds / SECONDS_PER_MINUTE)
    } else if seconds < SECONDS_PER_DAY {
        format!("{}h ago", seconds / SECONDS_PER_HOUR)
    } else {
        format!("{}d ago", seconds / SECONDS_PER_DAY)
    }
}

/// [`time_ago`] against the current clock.
pub fn time_ago_now(timestamp: Timestamp) -> String {
    time_ago(timestamp, Timestamp::now())
}

/// Discount implied by two prices, as a whole percentage rounded half up.
///
/// Returns `None` when either price is missing or the original price is zero.
pub fn calculate_discount(
    original_price: impl Into<Numeric>,
    deal_price: impl Into<Numeric>,
) -> Option<i64> {
    let original = original_price.into().value()?;
    let deal = deal_price.into().value()?;

    if original.is_zero() {
        return None;
    }

    let percent = (original - deal).checked_div(original)? * Decimal::ONE_HUNDRED;

    (percent + Decimal::new(5, 1)).floor().to_i64()
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_with_indian_grouping() {
        assert_eq!(format_price(149_900), "₹1,49,900");
        assert_eq!(format_price(24_990), "₹24,990");
        assert_eq!(format_price(999), "₹999");
        assert_eq!(format_price(10_000_000), "₹1,00,00,000");
    }

    #[test]
    fn formats_without_decimals() {
        assert_eq!(format_price(Decimal::new(9_995, 1)), "₹1,000");
        assert_eq!(format_price(Decimal::new(9_994, 1)), "₹999");
    }

    #[test]
    fn non_numeric_amounts_format_as_zero() {
        assert_eq!(format_price(f64::NAN), "₹0");
        assert_eq!(format_price(f64::INFINITY), "₹0");
        assert_eq!(format_price(None::<f64>), "₹0");
        assert_eq!(format_price("abc"), "₹0");
        assert_eq!(format_price(Numeric::MISSING), "₹0");
    }

    #[test]
    fn net_score_can_go_negative() {
        let deal = Deal {
            upvotes: Numeric::from(2),
            downvotes: Numeric::from(7),
            ..Deal::new("d")
        };

        assert_eq!(net_score(&deal), -5);
    }

    #[test]
    fn net_score_treats_missing_counts_as_zero() {
        let deal = Deal {
            upvotes: Numeric::from("lots"),
            downvotes: Numeric::from(3),
            ..Deal::new("d")
        };

        assert_eq!(net_score(&deal), -3);
    }

    #[test]
    fn time_ago_buckets() -> TestResult {
        let now: Timestamp = "2024-01-15T12:00:00Z".parse()?;
        let ago = |seconds: i64| now.checked_sub(SignedDuration::from_secs(seconds));

        assert_eq!(time_ago(ago(0)?, now), "just now");
        assert_eq!(time_ago(ago(59)?, now), "just now");
        assert_eq!(time_ago(ago(60)?, now), "1m ago");
        assert_eq!(time_ago(ago(3_599)?, now), "59m ago");
        assert_eq!(time_ago(ago(3_600)?, now), "1h ago");
        assert_eq!(time_ago(ago(86_399)?, now), "23h ago");
        assert_eq!(time_ago(ago(86_400)?, now), "1d ago");
        assert_eq!(time_ago(ago(10 * 86_400 + 5)?, now), "10d ago");

        Ok(())
    }

    #[test]
    fn future_timestamps_are_just_now() -> TestResult {
        let now: Timestamp = "2024-01-15T12:00:00Z".parse()?;
        let later = now.checked_add(SignedDuration::from_secs(3_600))?;

        assert_eq!(time_ago(later, now), "just now");

        Ok(())
    }

    #[test]
    fn calculates_rounded_discount() {
        assert_eq!(calculate_discount(159_900, 149_900), Some(6));
        assert_eq!(calculate_discount(139_999, 119_999), Some(14));
        assert_eq!(calculate_discount(200, 199), Some(1));
        assert_eq!(calculate_discount(0, 10), None);
        assert_eq!(calculate_discount("abc", 10), None);
    }
}
