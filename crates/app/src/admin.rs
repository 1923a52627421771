//! Admin deal management session

use std::sync::Arc;

use dealfeed::{
    admin::{AdminStatus, admin_view},
    deals::{Deal, DealId},
    filters::DealFilters,
    numeric::Numeric,
};
use tracing::info;

use crate::domain::deals::{DealsService, DealsServiceError};

/// Admin table state: every deal, a search query and a status filter.
pub struct AdminDesk {
    service: Arc<dyn DealsService>,
    deals: Vec<Deal>,
    query: String,
    status: AdminStatus,
}

impl std::fmt::Debug for AdminDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDesk")
            .field("deals", &self.deals.len())
            .field("query", &self.query)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl AdminDesk {
    /// Empty desk backed by `service`.
    pub fn new(service: Arc<dyn DealsService>) -> Self {
        Self {
            service,
            deals: Vec::new(),
            query: String::new(),
            status: AdminStatus::All,
        }
    }

    /// Fetch every deal.
    ///
    /// # Errors
    ///
    /// Returns the service error; local state is left as it was.
    pub async fn load(&mut self) -> Result<usize, DealsServiceError> {
        self.deals = self.service.list_deals(DealFilters::default()).await?;

        Ok(self.deals.len())
    }

    /// Search title, brand or category.
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
    }

    /// Restrict the view to promoted or verified deals.
    pub fn set_status(&mut self, status: AdminStatus) {
        self.status = status;
    }

    /// Every loaded deal.
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Deals matching the query and status filter, in load order.
    pub fn view(&self) -> Vec<&Deal> {
        admin_view(&self.deals, &self.query, self.status)
    }

    /// Flip a deal's promotion flag, keeping its rank. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns [`DealsServiceError::NotFound`] for deals that are not loaded, or the
    /// service error; the local deal is only changed once the backend accepts.
    pub async fn toggle_promotion(&mut self, id: &DealId) -> Result<bool, DealsServiceError> {
        let deal = self.local(id)?;
        let promoted = !deal.is_promoted;
        let order = deal.promotion_order.to_i64_or_zero();

        self.promote(id, promoted, order).await?;

        Ok(promoted)
    }

    /// Promote a deal at the given rank.
    ///
    /// # Errors
    ///
    /// Returns [`DealsServiceError::NotFound`] for deals that are not loaded, or the
    /// service error.
    pub async fn promote_at(&mut self, id: &DealId, order: i64) -> Result<(), DealsServiceError> {
        self.local(id)?;
        self.promote(id, true, order).await
    }

    /// Clear a deal's promotion flag.
    ///
    /// # Errors
    ///
    /// Returns [`DealsServiceError::NotFound`] for deals that are not loaded, or the
    /// service error.
    pub async fn demote(&mut self, id: &DealId) -> Result<(), DealsServiceError> {
        let order = self.local(id)?.promotion_order.to_i64_or_zero();

        self.promote(id, false, order).await
    }

    /// Change a deal's rank without touching its promotion flag.
    ///
    /// # Errors
    ///
    /// Returns [`DealsServiceError::NotFound`] for deals that are not loaded, or the
    /// service error.
    pub async fn set_promotion_order(
        &mut self,
        id: &DealId,
        order: i64,
    ) -> Result<(), DealsServiceError> {
        let promoted = self.local(id)?.is_promoted;

        self.promote(id, promoted, order).await
    }

    /// Next free rank after the highest promoted one.
    pub fn next_promotion_order(&self) -> i64 {
        self.deals
            .iter()
            .filter(|deal| deal.is_promoted)
            .map(|deal| deal.promotion_order.to_i64_or_zero())
            .max()
            .map_or(1, |order| order.saturating_add(1))
    }

    fn local(&self, id: &DealId) -> Result<&Deal, DealsServiceError> {
        self.deals
            .iter()
            .find(|deal| deal.id == *id)
            .ok_or(DealsServiceError::NotFound)
    }

    async fn promote(
        &mut self,
        id: &DealId,
        promoted: bool,
        order: i64,
    ) -> Result<(), DealsServiceError> {
        self.service.promote_deal(id.clone(), promoted, order).await?;

        info!(deal = %id, promoted, order, "promotion updated");

        for deal in self.deals.iter_mut().filter(|deal| deal.id == *id) {
            deal.is_promoted = promoted;
            deal.promotion_order = Numeric::from(order);
        }

        Ok(())
    }
}
