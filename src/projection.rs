//! Deal list projection
//!
//! Turns a raw collection of deals plus a [`DealFilters`] into the ordered
//! sequence to render. The projection is a pure function of its arguments:
//! the same input always produces the same output, and nothing is cached
//! between calls.
//!
//! Ordering is a chain of keys, each consulted only when the previous ones
//! compare equal:
//!
//! 1. promoted deals before non-promoted deals;
//! 2. among promoted deals, ascending `promotion_order`;
//! 3. the requested [`SortBy`] key.
//!
//! Values that are missing or malformed always sort after present values,
//! whatever the direction of the key. The sort is stable, so deals that tie
//! on every key keep their input order.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::{
    deals::Deal,
    filters::{DealFilters, SortBy},
    search::matches_folded,
};

/// Filter and order deals for display.
pub fn project<'a>(deals: &'a [Deal], filters: &DealFilters) -> Vec<&'a Deal> {
    project_matching(deals, filters, None)
}

/// Filter and order deals for display, additionally keeping only those matching a
/// free-text query.
pub fn project_matching<'a>(
    deals: &'a [Deal],
    filters: &DealFilters,
    query: Option<&str>,
) -> Vec<&'a Deal> {
    let needle = query.map(str::to_lowercase);

    let mut projected: Vec<&Deal> = deals
        .iter()
        .filter(|deal| filters.matches(deal))
        .filter(|deal| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_folded(deal, needle))
        })
        .collect();

    let sort_by = filters.sort_by();

    projected.sort_by(|a, b| compare(a, b, sort_by));

    projected
}

/// Total order used by the projection.
pub fn compare(a: &Deal, b: &Deal, sort_by: SortBy) -> Ordering {
    b.is_promoted
        .cmp(&a.is_promoted)
        .then_with(|| {
            if a.is_promoted && b.is_promoted {
                ascending(a.promotion_order.value(), b.promotion_order.value())
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| compare_by(a, b, sort_by))
}

fn compare_by(a: &Deal, b: &Deal, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Newest => descending(a.created_at, b.created_at),
        SortBy::Popular => descending(popularity(a), popularity(b)),
        SortBy::Discount => descending(
            a.discount_percentage.value(),
            b.discount_percentage.value(),
        ),
        SortBy::PriceLow => ascending(a.deal_price.value(), b.deal_price.value()),
        SortBy::PriceHigh => descending(a.deal_price.value(), b.deal_price.value()),
    }
}

/// Net score for ranking; missing when either counter is.
fn popularity(deal: &Deal) -> Option<Decimal> {
    deal.upvotes
        .value()?
        .checked_sub(deal.downvotes.value()?)
}

fn ascending<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (a, b) => missing_last(a.is_some(), b.is_some()),
    }
}

fn descending<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => missing_last(a.is_some(), b.is_some()),
    }
}

fn missing_last(a_present: bool, b_present: bool) -> Ordering {
    b_present.cmp(&a_present)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::numeric::Numeric;

    fn ids<'a>(deals: &[&'a Deal]) -> Vec<&'a str> {
        deals.iter().map(|&deal| deal.id.as_str()).collect()
    }

    fn promoted(id: &str, order: impl Into<Numeric>) -> Deal {
        Deal {
            is_promoted: true,
            promotion_order: order.into(),
            ..Deal::new(id)
        }
    }

    fn priced(id: &str, price: impl Into<Numeric>) -> Deal {
        Deal {
            deal_price: price.into(),
            ..Deal::new(id)
        }
    }

    #[test]
    fn promoted_deals_lead_in_promotion_order() {
        let deals = [
            Deal::new("plain"),
            promoted("second", 2),
            promoted("first", 1),
        ];

        let projected = project(&deals, &DealFilters::default());

        assert_eq!(ids(&projected), ["first", "second", "plain"]);
    }

    #[test]
    fn missing_promotion_order_sorts_last_among_promoted() {
        let deals = [
            promoted("unranked", Numeric::MISSING),
            promoted("ranked", 5),
            Deal::new("plain"),
        ];

        let projected = project(&deals, &DealFilters::default());

        assert_eq!(ids(&projected), ["ranked", "unranked", "plain"]);
    }

    #[test]
    fn non_promoted_ignore_promotion_order() {
        let deals = [
            Deal {
                promotion_order: Numeric::from(9),
                ..priced("b", 20)
            },
            Deal {
                promotion_order: Numeric::from(1),
                ..priced("a", 10)
            },
        ];

        let filters = DealFilters {
            sort_by: Some(SortBy::PriceHigh),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["b", "a"]);
    }

    #[test]
    fn sort_key_breaks_promotion_order_ties() {
        let deals = [
            Deal {
                upvotes: Numeric::from(1),
                downvotes: Numeric::from(0),
                ..promoted("low", 1)
            },
            Deal {
                upvotes: Numeric::from(10),
                downvotes: Numeric::from(0),
                ..promoted("high", 1)
            },
        ];

        let filters = DealFilters {
            sort_by: Some(SortBy::Popular),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["high", "low"]);
    }

    #[test]
    fn price_sorts_put_malformed_prices_last_both_ways() {
        let deals = [priced("bad", "abc"), priced("cheap", 10), priced("dear", 99)];

        let low = DealFilters {
            sort_by: Some(SortBy::PriceLow),
            ..DealFilters::default()
        };
        let high = DealFilters {
            sort_by: Some(SortBy::PriceHigh),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &low)), ["cheap", "dear", "bad"]);
        assert_eq!(ids(&project(&deals, &high)), ["dear", "cheap", "bad"]);
    }

    #[test]
    fn popular_puts_unreadable_votes_below_negative_scores() {
        let deals = [
            Deal {
                upvotes: Numeric::from("abc"),
                downvotes: Numeric::from(0),
                ..Deal::new("broken")
            },
            Deal {
                upvotes: Numeric::from(0),
                downvotes: Numeric::from(5),
                ..Deal::new("disliked")
            },
        ];

        let filters = DealFilters {
            sort_by: Some(SortBy::Popular),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["disliked", "broken"]);
    }

    #[test]
    fn discount_sort_descends_with_missing_last() {
        let deals = [
            Deal {
                discount_percentage: Numeric::MISSING,
                ..Deal::new("none")
            },
            Deal {
                discount_percentage: Numeric::from(6),
                ..Deal::new("six")
            },
            Deal {
                discount_percentage: Numeric::from(17),
                ..Deal::new("seventeen")
            },
        ];

        let filters = DealFilters {
            sort_by: Some(SortBy::Discount),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["seventeen", "six", "none"]);
    }

    #[test]
    fn newest_is_the_default_order() -> TestResult {
        let stamp = |text: &str| text.parse::<Timestamp>();

        let deals = [
            Deal {
                created_at: Some(stamp("2024-01-13T09:20:00Z")?),
                ..Deal::new("old")
            },
            Deal {
                created_at: None,
                ..Deal::new("undated")
            },
            Deal {
                created_at: Some(stamp("2024-01-15T10:30:00Z")?),
                ..Deal::new("new")
            },
        ];

        assert_eq!(
            ids(&project(&deals, &DealFilters::default())),
            ["new", "old", "undated"]
        );

        Ok(())
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let deals = [priced("a", 5), priced("b", 5), priced("c", 5)];

        let filters = DealFilters {
            sort_by: Some(SortBy::PriceLow),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["a", "b", "c"]);
    }

    #[test]
    fn filters_before_ordering() {
        let deals = [priced("bad", "abc"), priced("cheap", 50), priced("ok", 150)];

        let filters = DealFilters {
            min_price: Some(Decimal::from(100)),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["ok"]);
    }

    #[test]
    fn query_matches_title_or_brand_case_insensitively() {
        let deals = [
            Deal {
                title: "Galaxy S24 Ultra".to_string(),
                brand: "Samsung".to_string(),
                ..Deal::new("galaxy")
            },
            Deal {
                title: "WH-1000XM5".to_string(),
                brand: "Sony".to_string(),
                ..Deal::new("sony")
            },
        ];

        let filters = DealFilters::default();

        assert_eq!(
            ids(&project_matching(&deals, &filters, Some("GALAXY"))),
            ["galaxy"]
        );
        assert_eq!(
            ids(&project_matching(&deals, &filters, Some("sOnY"))),
            ["sony"]
        );
        assert_eq!(project_matching(&deals, &filters, Some("")).len(), 2);
    }
}
