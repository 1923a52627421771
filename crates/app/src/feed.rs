//! Deal feed session
//!
//! A [`DealFeed`] owns everything one listing screen needs: the last fetched
//! deals, the filter configuration, the search box with its history, and the
//! votes that are still waiting for the backend.

use std::sync::Arc;

use dealfeed::{
    deals::{Deal, DealId, PriceHistory, retain_well_formed},
    filters::DealFilters,
    projection::project_matching,
    search::SearchHistory,
    votes::{OptimisticVotes, VoteDirection},
};
use tracing::{debug, warn};

use crate::domain::deals::{DealsService, DealsServiceError};

/// Listing screen state.
pub struct DealFeed {
    service: Arc<dyn DealsService>,
    deals: Vec<Deal>,
    filters: DealFilters,
    query: String,
    history: SearchHistory,
    votes: OptimisticVotes,
    well_formed_only: bool,
}

impl std::fmt::Debug for DealFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealFeed")
            .field("deals", &self.deals.len())
            .field("filters", &self.filters)
            .field("query", &self.query)
            .field("pending_votes", &self.votes.len())
            .finish_non_exhaustive()
    }
}

impl DealFeed {
    /// Empty feed backed by `service`.
    pub fn new(service: Arc<dyn DealsService>) -> Self {
        Self {
            service,
            deals: Vec::new(),
            filters: DealFilters::default(),
            query: String::new(),
            history: SearchHistory::new(),
            votes: OptimisticVotes::new(),
            well_formed_only: false,
        }
    }

    /// Drop fetched deals whose prices or discount are not numbers.
    #[must_use]
    pub fn well_formed_only(mut self) -> Self {
        self.well_formed_only = true;
        self
    }

    /// Current filter configuration.
    pub fn filters(&self) -> &DealFilters {
        &self.filters
    }

    /// Replace the filter configuration. Takes effect locally at once; call
    /// [`refresh`](Self::refresh) to refetch from the backend.
    pub fn set_filters(&mut self, filters: DealFilters) {
        self.filters = filters;
    }

    /// Apply a search query and remember it in the history.
    pub fn search(&mut self, query: &str) {
        self.history.record(query);
        query.clone_into(&mut self.query);
    }

    /// Clear the search box. The history is kept.
    pub fn clear_search(&mut self) {
        self.query.clear();
    }

    /// Current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Recent searches.
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Mutable access to the recent searches.
    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    /// Every fetched deal, in backend order.
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Locally known deal with the given id.
    pub fn deal(&self, id: &DealId) -> Option<&Deal> {
        self.deals.iter().find(|deal| deal.id == *id)
    }

    /// Deals to show: filtered, searched and ordered.
    pub fn visible(&self) -> Vec<&Deal> {
        let query = (!self.query.trim().is_empty()).then_some(self.query.as_str());

        project_matching(&self.deals, &self.filters, query)
    }

    /// Whether a deal carries a vote the backend has not confirmed yet.
    pub fn is_unconfirmed(&self, id: &DealId) -> bool {
        self.votes.is_unconfirmed(id)
    }

    /// Refetch deals for the current filters. The fetched rows replace local state,
    /// including counters touched by unconfirmed votes.
    ///
    /// # Errors
    ///
    /// Returns the service error; local state is left as it was.
    pub async fn refresh(&mut self) -> Result<usize, DealsServiceError> {
        let mut fetched = self.service.list_deals(self.filters.clone()).await?;

        if self.well_formed_only {
            retain_well_formed(&mut fetched);
        }

        let discarded = self.votes.reconcile(&mut self.deals, fetched);

        if discarded > 0 {
            debug!(discarded, "fetched deals replaced unconfirmed votes");
        }

        Ok(self.deals.len())
    }

    /// Vote on a deal. The local counter moves immediately and is rolled back when
    /// the backend rejects the vote.
    ///
    /// Deals not loaded locally are voted on remotely only.
    ///
    /// # Errors
    ///
    /// Returns the service error after rolling back the local counter.
    pub async fn vote(
        &mut self,
        id: &DealId,
        direction: VoteDirection,
    ) -> Result<(), DealsServiceError> {
        let Some(ticket) = self.votes.apply(&mut self.deals, id, direction) else {
            self.service.vote_deal(id.clone(), direction).await?;
            return Ok(());
        };

        match self.service.vote_deal(id.clone(), direction).await {
            Ok(tally) => {
                self.votes.confirm(&mut self.deals, ticket, tally);
                Ok(())
            }
            Err(error) => {
                warn!(deal = %id, %error, "vote rejected, rolling back");
                self.votes.rollback(&mut self.deals, ticket);
                Err(error)
            }
        }
    }

    /// Fetch a deal for its detail view.
    ///
    /// # Errors
    ///
    /// Returns [`DealsServiceError::NotFound`] when the deal does not exist.
    pub async fn detail(&self, id: &DealId) -> Result<Deal, DealsServiceError> {
        self.service.get_deal(id.clone()).await
    }

    /// Fetch a deal's recorded prices, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the service error.
    pub async fn price_history(&self, id: &DealId) -> Result<Vec<PriceHistory>, DealsServiceError> {
        self.service.price_history(id.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use dealfeed::{filters::SortBy, numeric::Numeric, votes::VoteTally};
    use mockall::predicate::eq;
    use testresult::TestResult;

    use super::*;
    use crate::domain::deals::MockDealsService;

    fn deal(id: &str, upvotes: i64) -> Deal {
        Deal {
            title: format!("Deal {id}"),
            brand: "Acme".to_string(),
            deal_price: Numeric::from(100),
            original_price: Numeric::from(120),
            discount_percentage: Numeric::from(17),
            upvotes: Numeric::from(upvotes),
            downvotes: Numeric::from(0),
            ..Deal::new(id)
        }
    }

    fn listing(deals: Vec<Deal>) -> MockDealsService {
        let mut service = MockDealsService::new();

        service
            .expect_list_deals()
            .once()
            .return_once(move |_| Ok(deals));

        service
    }

    async fn loaded(service: MockDealsService) -> Result<DealFeed, DealsServiceError> {
        let mut feed = DealFeed::new(Arc::new(service));
        feed.refresh().await?;
        Ok(feed)
    }

    fn upvotes(feed: &DealFeed, id: &str) -> Option<Numeric> {
        feed.deal(&DealId::from(id)).map(|deal| deal.upvotes)
    }

    #[tokio::test]
    async fn confirmed_vote_takes_backend_tally() -> TestResult {
        let mut service = listing(vec![deal("1", 5), deal("2", 9)]);

        service
            .expect_vote_deal()
            .once()
            .with(eq(DealId::from("1")), eq(VoteDirection::Up))
            .return_once(|_, _| {
                Ok(Some(VoteTally {
                    upvotes: Numeric::from(8),
                    downvotes: Numeric::from(0),
                }))
            });

        let mut feed = loaded(service).await?;

        feed.vote(&DealId::from("1"), VoteDirection::Up).await?;

        assert_eq!(upvotes(&feed, "1"), Some(Numeric::from(8)));
        assert_eq!(upvotes(&feed, "2"), Some(Numeric::from(9)));
        assert!(!feed.is_unconfirmed(&DealId::from("1")));

        Ok(())
    }

    #[tokio::test]
    async fn accepted_vote_without_tally_keeps_local_increment() -> TestResult {
        let mut service = listing(vec![deal("1", 5)]);

        service
            .expect_vote_deal()
            .once()
            .return_once(|_, _| Ok(None));

        let mut feed = loaded(service).await?;

        feed.vote(&DealId::from("1"), VoteDirection::Up).await?;

        assert_eq!(upvotes(&feed, "1"), Some(Numeric::from(6)));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_vote_rolls_back() -> TestResult {
        let mut service = listing(vec![deal("1", 5)]);

        service.expect_vote_deal().once().return_once(|_, _| {
            Err(DealsServiceError::Remote {
                status: 401,
                message: "not signed in".to_string(),
            })
        });

        let mut feed = loaded(service).await?;

        let result = feed.vote(&DealId::from("1"), VoteDirection::Up).await;

        assert!(matches!(result, Err(DealsServiceError::Remote { status: 401, .. })));
        assert_eq!(upvotes(&feed, "1"), Some(Numeric::from(5)));
        assert!(!feed.is_unconfirmed(&DealId::from("1")));

        Ok(())
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_deals() -> TestResult {
        let mut service = MockDealsService::new();
        let mut calls = 0;

        service.expect_list_deals().times(2).returning(move |_| {
            calls += 1;

            if calls == 1 {
                Ok(vec![deal("1", 5)])
            } else {
                Err(DealsServiceError::Remote {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            }
        });

        let mut feed = loaded(service).await?;

        assert!(feed.refresh().await.is_err());
        assert_eq!(feed.deals().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_sends_current_filters() -> TestResult {
        let filters = DealFilters {
            category: Some("Audio".to_string()),
            ..DealFilters::default()
        };

        let mut service = MockDealsService::new();

        service
            .expect_list_deals()
            .once()
            .with(eq(filters.clone()))
            .return_once(|_| Ok(Vec::new()));

        let mut feed = DealFeed::new(Arc::new(service));
        feed.set_filters(filters);

        assert_eq!(feed.refresh().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn well_formed_only_drops_malformed_rows() -> TestResult {
        let malformed = Deal {
            deal_price: Numeric::from("abc"),
            ..deal("2", 0)
        };

        let mut feed =
            DealFeed::new(Arc::new(listing(vec![deal("1", 0), malformed]))).well_formed_only();

        assert_eq!(feed.refresh().await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn search_filters_visible_and_records_history() -> TestResult {
        let mut feed = loaded(listing(vec![
            Deal {
                title: "Galaxy S24".to_string(),
                ..deal("1", 1)
            },
            Deal {
                title: "Pixel 8".to_string(),
                ..deal("2", 2)
            },
        ]))
        .await?;

        feed.set_filters(DealFilters {
            sort_by: Some(SortBy::Popular),
            ..DealFilters::default()
        });

        let all: Vec<&str> = feed.visible().iter().map(|deal| deal.id.as_str()).collect();
        assert_eq!(all, ["2", "1"]);

        feed.search("galaxy");

        let found: Vec<&str> = feed.visible().iter().map(|deal| deal.id.as_str()).collect();
        assert_eq!(found, ["1"]);
        assert_eq!(feed.history().recent().collect::<Vec<_>>(), ["galaxy"]);

        feed.clear_search();

        assert_eq!(feed.visible().len(), 2);
        assert_eq!(feed.history().len(), 1);

        Ok(())
    }
}
