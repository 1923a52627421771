//! Listing behaviour over hand-built deal sets.

use testresult::TestResult;

use dealfeed::prelude::*;

fn deal(id: &str) -> Deal {
    Deal {
        title: format!("Deal {id}"),
        deal_price: Numeric::from(1_000),
        original_price: Numeric::from(1_200),
        discount_percentage: Numeric::from(17),
        ..Deal::new(id)
    }
}

fn ids<'a>(deals: &[&'a Deal]) -> Vec<&'a str> {
    deals.iter().map(|&deal| deal.id.as_str()).collect()
}

#[test]
fn popular_ranks_promoted_before_net_score() {
    let deals = vec![
        Deal {
            is_promoted: true,
            promotion_order: Numeric::from(2),
            ..deal("A")
        },
        Deal {
            is_promoted: true,
            promotion_order: Numeric::from(1),
            ..deal("B")
        },
        Deal {
            upvotes: Numeric::from(100),
            ..deal("C")
        },
    ];

    let filters = DealFilters {
        sort_by: Some(SortBy::Popular),
        ..DealFilters::default()
    };

    assert_eq!(ids(&project(&deals, &filters)), ["B", "A", "C"]);
}

#[test]
fn non_numeric_price_fails_a_price_bound_only() {
    let deals = vec![Deal {
        deal_price: Numeric::from("abc"),
        ..deal("abc")
    }];

    let bounded = DealFilters {
        min_price: Some(100.into()),
        ..DealFilters::default()
    };

    assert!(project(&deals, &bounded).is_empty());
    assert_eq!(ids(&project(&deals, &DealFilters::default())), ["abc"]);
}

#[test]
fn vote_increments_only_the_target() {
    let mut deals = vec![
        Deal {
            upvotes: Numeric::from(5),
            downvotes: Numeric::from(0),
            ..deal("target")
        },
        Deal {
            upvotes: Numeric::from(7),
            downvotes: Numeric::from(2),
            ..deal("other")
        },
    ];

    assert!(apply_vote(&mut deals, &DealId::from("target"), VoteDirection::Up));

    let tallies: Vec<VoteTally> = deals.iter().map(VoteTally::of).collect();

    assert_eq!(
        tallies,
        [
            VoteTally {
                upvotes: Numeric::from(6),
                downvotes: Numeric::from(0),
            },
            VoteTally {
                upvotes: Numeric::from(7),
                downvotes: Numeric::from(2),
            },
        ]
    );
}

#[test]
fn rejected_vote_restores_counters() -> TestResult {
    let mut deals = vec![Deal {
        upvotes: Numeric::from(5),
        ..deal("1")
    }];
    let mut votes = OptimisticVotes::new();

    let ticket = votes
        .apply(&mut deals, &DealId::from("1"), VoteDirection::Up)
        .ok_or("vote not applied")?;

    assert_eq!(deals.first().ok_or("missing deal")?.upvotes, Numeric::from(6));
    assert!(votes.rollback(&mut deals, ticket));
    assert_eq!(deals.first().ok_or("missing deal")?.upvotes, Numeric::from(5));
    assert!(votes.is_empty());

    Ok(())
}

#[test]
fn formats_missing_prices_as_zero() {
    assert_eq!(format_price(f64::NAN), "₹0");
    assert_eq!(format_price(Numeric::MISSING), "₹0");
    assert_eq!(format_price(Numeric::from("abc")), "₹0");
}

#[test]
fn affiliate_links() {
    assert_eq!(
        affiliate_link("https://x.com/d", "Amazon"),
        "https://x.com/d?tag=spicybeats-21"
    );
    assert_eq!(
        affiliate_link("https://x.com/d?x=1", "flipkart"),
        "https://x.com/d?x=1&affid=spicybeats"
    );
    assert_eq!(
        affiliate_link("https://x.com/d", "unknownstore"),
        "https://x.com/d"
    );
}

#[test]
fn equal_keys_keep_input_order() {
    let deals: Vec<Deal> = ["x", "y", "z"].into_iter().map(deal).collect();

    for sort_by in [
        SortBy::Newest,
        SortBy::Popular,
        SortBy::Discount,
        SortBy::PriceLow,
        SortBy::PriceHigh,
    ] {
        let filters = DealFilters {
            sort_by: Some(sort_by),
            ..DealFilters::default()
        };

        assert_eq!(ids(&project(&deals, &filters)), ["x", "y", "z"], "{sort_by:?}");
    }
}
