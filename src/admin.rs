//! Admin deal table

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::deals::Deal;

/// Status filter of the admin table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AdminStatus {
    /// Every deal
    #[default]
    All,

    /// Promoted deals only
    Promoted,

    /// Verified deals only
    Verified,
}

impl AdminStatus {
    /// Whether a deal passes this filter.
    #[must_use]
    pub fn admits(self, deal: &Deal) -> bool {
        match self {
            Self::All => true,
            Self::Promoted => deal.is_promoted,
            Self::Verified => deal.is_verified,
        }
    }
}

/// Deals shown in the admin table, in input order.
///
/// The query matches title, brand or category, ignoring case; an empty query
/// matches everything.
pub fn admin_view<'a>(deals: &'a [Deal], query: &str, status: AdminStatus) -> Vec<&'a Deal> {
    let needle = query.to_lowercase();

    deals
        .iter()
        .filter(|deal| {
            needle.is_empty()
                || [&deal.title, &deal.brand, &deal.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|deal| status.admits(deal))
        .collect()
}
