//! In-memory deals service backed by fixture data.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dealfeed::{
    deals::{Deal, DealId, PriceHistory},
    filters::DealFilters,
    numeric::Numeric,
    projection::project,
    votes::{VoteDirection, VoteTally, apply_vote},
};
use jiff::Timestamp;

use crate::domain::deals::{
    DealsService,
    data::{DealUpdate, NewDeal},
    errors::DealsServiceError,
};

#[derive(Debug, Default)]
struct Store {
    deals: Vec<Deal>,
    price_history: Vec<PriceHistory>,
    next_id: u64,
}

/// Deals service that keeps every row in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDealsService {
    store: Mutex<Store>,
}

impl InMemoryDealsService {
    /// Service seeded with the given deals.
    #[must_use]
    pub fn new(deals: Vec<Deal>) -> Self {
        Self::with_price_history(deals, Vec::new())
    }

    /// Service seeded with deals and their recorded prices.
    #[must_use]
    pub fn with_price_history(deals: Vec<Deal>, price_history: Vec<PriceHistory>) -> Self {
        let next_id = deals
            .iter()
            .filter_map(|deal| deal.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            store: Mutex::new(Store {
                deals,
                price_history,
                next_id,
            }),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_mut<'a>(deals: &'a mut [Deal], id: &DealId) -> Result<&'a mut Deal, DealsServiceError> {
    deals
        .iter_mut()
        .find(|deal| deal.id == *id)
        .ok_or(DealsServiceError::NotFound)
}

#[async_trait]
impl DealsService for InMemoryDealsService {
    async fn list_deals(&self, filters: DealFilters) -> Result<Vec<Deal>, DealsServiceError> {
        // Only the backend's own order applies here; sort preferences stay client side.
        let filters = DealFilters {
            sort_by: None,
            ..filters
        };

        let store = self.store();

        Ok(project(&store.deals, &filters).into_iter().cloned().collect())
    }

    async fn get_deal(&self, deal: DealId) -> Result<Deal, DealsServiceError> {
        self.store()
            .deals
            .iter()
            .find(|candidate| candidate.id == deal)
            .cloned()
            .ok_or(DealsServiceError::NotFound)
    }

    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, DealsServiceError> {
        let mut store = self.store();

        let id = DealId::new(store.next_id.to_string());
        store.next_id = store.next_id.saturating_add(1);

        let created = Deal {
            title: deal.title,
            model_number: deal.model_number,
            brand: deal.brand,
            category: deal.category,
            description: deal.description,
            original_price: deal.original_price.into(),
            deal_price: deal.deal_price.into(),
            discount_percentage: deal.discount_percentage.into(),
            merchant: deal.merchant,
            deal_url: deal.deal_url,
            image_url: deal.image_url,
            specs: deal.specs,
            warranty_info: deal.warranty_info,
            expires_at: deal.expires_at,
            created_by: deal.created_by,
            upvotes: Numeric::from(0),
            downvotes: Numeric::from(0),
            created_at: Some(Timestamp::now()),
            deal_type: deal.deal_type,
            store_name: deal.store_name,
            address: deal.address,
            city: deal.city,
            state: deal.state,
            pincode: deal.pincode,
            promotion_order: Numeric::from(0),
            ..Deal::new(id)
        };

        store.deals.push(created.clone());

        Ok(created)
    }

    async fn update_deal(
        &self,
        deal: DealId,
        update: DealUpdate,
    ) -> Result<Deal, DealsServiceError> {
        let mut store = self.store();
        let stored = find_mut(&mut store.deals, &deal)?;

        if let Some(title) = update.title {
            stored.title = title;
        }

        if let Some(description) = update.description {
            stored.description = description;
        }

        if let Some(original_price) = update.original_price {
            stored.original_price = original_price.into();
        }

        if let Some(deal_price) = update.deal_price {
            stored.deal_price = deal_price.into();
        }

        if let Some(discount_percentage) = update.discount_percentage {
            stored.discount_percentage = discount_percentage.into();
        }

        if let Some(deal_url) = update.deal_url {
            stored.deal_url = deal_url;
        }

        if let Some(image_url) = update.image_url {
            stored.image_url = image_url;
        }

        if update.warranty_info.is_some() {
            stored.warranty_info = update.warranty_info;
        }

        if update.expires_at.is_some() {
            stored.expires_at = update.expires_at;
        }

        if let Some(is_verified) = update.is_verified {
            stored.is_verified = is_verified;
        }

        Ok(stored.clone())
    }

    async fn vote_deal(
        &self,
        deal: DealId,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>, DealsServiceError> {
        let mut store = self.store();

        if !apply_vote(&mut store.deals, &deal, direction) {
            return Err(DealsServiceError::NotFound);
        }

        Ok(store
            .deals
            .iter()
            .find(|candidate| candidate.id == deal)
            .map(VoteTally::of))
    }

    async fn promote_deal(
        &self,
        deal: DealId,
        promoted: bool,
        promotion_order: i64,
    ) -> Result<(), DealsServiceError> {
        let mut store = self.store();
        let stored = find_mut(&mut store.deals, &deal)?;

        stored.is_promoted = promoted;
        stored.promotion_order = Numeric::from(promotion_order);

        Ok(())
    }

    async fn price_history(&self, deal: DealId) -> Result<Vec<PriceHistory>, DealsServiceError> {
        let store = self.store();

        let mut history: Vec<PriceHistory> = store
            .price_history
            .iter()
            .filter(|entry| entry.deal_id == deal)
            .cloned()
            .collect();

        history.sort_by_key(|entry| entry.recorded_at);

        Ok(history)
    }
}
