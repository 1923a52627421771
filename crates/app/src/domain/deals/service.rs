//! Deals service.

use async_trait::async_trait;
use dealfeed::{
    deals::{Deal, DealId, PriceHistory},
    filters::DealFilters,
    numeric::Numeric,
    votes::{VoteDirection, VoteTally},
};
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    client::{DataClient, Select},
    domain::deals::{
        data::{DealUpdate, NewDeal},
        errors::DealsServiceError,
    },
};

/// Table holding deal rows.
pub const DEALS_TABLE: &str = "electronics_deals";

/// Table holding recorded price points.
pub const PRICE_HISTORY_TABLE: &str = "price_history";

/// Deals service over the hosted backend.
#[derive(Debug, Clone)]
pub struct RestDealsService {
    client: DataClient,
}

impl RestDealsService {
    /// Service issuing requests through `client`.
    #[must_use]
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }
}

/// Backend query for a filtered listing. Sort preferences stay client side; the
/// backend only applies its promoted-then-newest order.
pub(crate) fn listing_select(filters: &DealFilters) -> Select {
    let mut select = Select::table(DEALS_TABLE);

    if let Some(category) = &filters.category {
        select = select.eq("category", category);
    }

    if let Some(brand) = &filters.brand {
        select = select.eq("brand", brand);
    }

    if let Some(city) = &filters.city {
        select = select.eq("city", city);
    }

    if let Some(deal_type) = filters.deal_type.and_then(|filter| filter.deal_type()) {
        select = select.eq("deal_type", deal_type.as_str());
    }

    if let Some(min_price) = filters.min_price {
        select = select.gte("deal_price", min_price);
    }

    if let Some(max_price) = filters.max_price {
        select = select.lte("deal_price", max_price);
    }

    select
        .order("is_promoted", false)
        .order("promotion_order", true)
        .order("created_at", false)
}

#[derive(Debug, Serialize)]
struct VoteArgs<'a> {
    deal_id: &'a DealId,
    vote_type: VoteDirection,
}

#[derive(Debug, Serialize)]
struct PromoteArgs<'a> {
    deal_id: &'a DealId,
    promoted: bool,
    promotion_order: i64,
}

/// Counters a vote procedure may echo back. Both must be present to be trusted.
#[derive(Debug, Deserialize)]
struct VoteCounts {
    upvotes: Numeric,
    downvotes: Numeric,
}

fn vote_tally(reply: Option<serde_json::Value>) -> Option<VoteTally> {
    let reply = match reply? {
        serde_json::Value::Array(rows) => rows.into_iter().next()?,
        other => other,
    };

    serde_json::from_value::<VoteCounts>(reply)
        .ok()
        .map(|counts| VoteTally {
            upvotes: counts.upvotes,
            downvotes: counts.downvotes,
        })
}

/// Decode listing rows one at a time; a row that does not decode is skipped.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Deal> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned();

            serde_json::from_value(row)
                .inspect_err(|error| warn!(?id, %error, "skipping undecodable deal row"))
                .ok()
        })
        .collect()
}

#[async_trait]
impl DealsService for RestDealsService {
    async fn list_deals(&self, filters: DealFilters) -> Result<Vec<Deal>, DealsServiceError> {
        let rows = self.client.select(&listing_select(&filters)).await?;

        Ok(decode_rows(rows))
    }

    async fn get_deal(&self, deal: DealId) -> Result<Deal, DealsServiceError> {
        let select = Select::table(DEALS_TABLE).eq("id", &deal);

        self.client
            .select_single(&select)
            .await?
            .ok_or(DealsServiceError::NotFound)
    }

    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, DealsServiceError> {
        Ok(self.client.insert(DEALS_TABLE, &deal).await?)
    }

    async fn update_deal(
        &self,
        deal: DealId,
        update: DealUpdate,
    ) -> Result<Deal, DealsServiceError> {
        self.client
            .update(DEALS_TABLE, deal.as_str(), &update)
            .await?
            .ok_or(DealsServiceError::NotFound)
    }

    async fn vote_deal(
        &self,
        deal: DealId,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>, DealsServiceError> {
        let args = VoteArgs {
            deal_id: &deal,
            vote_type: direction,
        };

        let reply = self.client.rpc("vote_deal", &args).await?;

        Ok(vote_tally(reply))
    }

    async fn promote_deal(
        &self,
        deal: DealId,
        promoted: bool,
        promotion_order: i64,
    ) -> Result<(), DealsServiceError> {
        let args = PromoteArgs {
            deal_id: &deal,
            promoted,
            promotion_order,
        };

        self.client.rpc("promote_deal", &args).await?;

        Ok(())
    }

    async fn price_history(&self, deal: DealId) -> Result<Vec<PriceHistory>, DealsServiceError> {
        let select = Select::table(PRICE_HISTORY_TABLE)
            .eq("deal_id", &deal)
            .order("recorded_at", true);

        Ok(self.client.select(&select).await?)
    }
}

#[automock]
#[async_trait]
/// Deal operations.
pub trait DealsService: Send + Sync {
    /// Retrieves deals matching the filter constraints, promoted first, then newest.
    async fn list_deals(&self, filters: DealFilters) -> Result<Vec<Deal>, DealsServiceError>;

    /// Retrieve a single deal.
    async fn get_deal(&self, deal: DealId) -> Result<Deal, DealsServiceError>;

    /// Creates a new deal and returns it as stored.
    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, DealsServiceError>;

    /// Updates a deal and returns it as stored.
    async fn update_deal(
        &self,
        deal: DealId,
        update: DealUpdate,
    ) -> Result<Deal, DealsServiceError>;

    /// Records a vote. Returns the current counters when the backend reports them.
    async fn vote_deal(
        &self,
        deal: DealId,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>, DealsServiceError>;

    /// Sets the promotion flag and rank of a deal.
    async fn promote_deal(
        &self,
        deal: DealId,
        promoted: bool,
        promotion_order: i64,
    ) -> Result<(), DealsServiceError>;

    /// Retrieves the recorded prices of a deal, oldest first.
    async fn price_history(&self, deal: DealId) -> Result<Vec<PriceHistory>, DealsServiceError>;
}
