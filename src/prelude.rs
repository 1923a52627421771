//! Dealfeed prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    admin::{AdminStatus, admin_view},
    affiliate::{affiliate_link, affiliate_param},
    deals::{Deal, DealId, DealType, PriceHistory, Specs, retain_well_formed},
    display::{calculate_discount, format_price, net_score, time_ago, time_ago_now},
    filters::{DealFilters, DealTypeFilter, SortBy},
    fixtures::{Fixture, FixtureError},
    listing::{write_admin_table, write_deal_detail, write_deal_table},
    numeric::Numeric,
    projection::{project, project_matching},
    search::{RECENT_SEARCHES, SearchHistory, matches_query},
    votes::{OptimisticVotes, VoteDirection, VoteTally, VoteTicket, apply_vote},
};
