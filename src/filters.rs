//! Deal filters
//!
//! [`DealFilters`] is the per-screen filter and sort configuration. It is a
//! plain value: whoever owns the screen owns it, and it is passed to the
//! projection on every call.

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deals::{Deal, DealType};

/// Deal type constraint, with `All` meaning "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DealTypeFilter {
    /// Any deal type
    #[default]
    All,

    /// Online deals only
    Online,

    /// In-store deals only
    Physical,
}

impl DealTypeFilter {
    /// Whether a deal of the given type passes this constraint.
    #[must_use]
    pub fn admits(self, deal_type: DealType) -> bool {
        match self {
            Self::All => true,
            Self::Online => deal_type == DealType::Online,
            Self::Physical => deal_type == DealType::Physical,
        }
    }

    /// The single deal type admitted, or `None` for `All`.
    #[must_use]
    pub const fn deal_type(self) -> Option<DealType> {
        match self {
            Self::All => None,
            Self::Online => Some(DealType::Online),
            Self::Physical => Some(DealType::Physical),
        }
    }
}

/// Listing order applied after promotion ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recent first
    #[default]
    Newest,

    /// Highest net score first
    Popular,

    /// Highest stored discount first
    Discount,

    /// Cheapest first
    #[value(name = "price_low")]
    PriceLow,

    /// Most expensive first
    #[value(name = "price_high")]
    PriceHigh,
}

/// Filter and sort configuration for a deal listing. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DealFilters {
    /// Exact category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Exact brand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Exact city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Online, physical or all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<DealTypeFilter>,

    /// Inclusive lower bound on the deal price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,

    /// Inclusive upper bound on the deal price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,

    /// Listing order; newest when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl DealFilters {
    /// Whether no constraint is set. The sort order is not a constraint.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.brand.is_none()
            && self.city.is_none()
            && self.deal_type.is_none_or(|deal_type| deal_type == DealTypeFilter::All)
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// The effective sort order.
    #[must_use]
    pub fn sort_by(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    /// Whether a deal satisfies every constraint.
    ///
    /// A deal whose price is not a number fails any price bound, but is kept when no
    /// bound is set.
    #[must_use]
    pub fn matches(&self, deal: &Deal) -> bool {
        if self.category.as_ref().is_some_and(|category| *category != deal.category) {
            return false;
        }

        if self.brand.as_ref().is_some_and(|brand| *brand != deal.brand) {
            return false;
        }

        if self
            .city
            .as_ref()
            .is_some_and(|city| deal.city.as_ref() != Some(city))
        {
            return false;
        }

        if !self
            .deal_type
            .unwrap_or_default()
            .admits(deal.deal_type)
        {
            return false;
        }

        let price = deal.deal_price.value();

        let above_min = self
            .min_price
            .is_none_or(|min_price| price.is_some_and(|price| price >= min_price));

        let below_max = self
            .max_price
            .is_none_or(|max_price| price.is_some_and(|price| price <= max_price));

        above_min && below_max
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::numeric::Numeric;

    fn deal(category: &str, brand: &str, city: Option<&str>, price: Numeric) -> Deal {
        Deal {
            category: category.to_string(),
            brand: brand.to_string(),
            city: city.map(str::to_string),
            deal_price: price,
            ..Deal::new("d")
        }
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = DealFilters::default();

        assert!(filters.is_unconstrained());
        assert!(filters.matches(&deal("Audio", "Sony", None, Numeric::MISSING)));
    }

    #[test]
    fn text_constraints_are_exact_and_case_sensitive() {
        let filters = DealFilters {
            category: Some("Mobiles".to_string()),
            brand: Some("Apple".to_string()),
            ..DealFilters::default()
        };

        assert!(filters.matches(&deal("Mobiles", "Apple", None, Numeric::from(10))));
        assert!(!filters.matches(&deal("mobiles", "Apple", None, Numeric::from(10))));
        assert!(!filters.matches(&deal("Mobiles", "Samsung", None, Numeric::from(10))));
    }

    #[test]
    fn city_constraint_rejects_deals_without_a_city() {
        let filters = DealFilters {
            city: Some("Delhi".to_string()),
            ..DealFilters::default()
        };

        assert!(filters.matches(&deal("Mobiles", "Apple", Some("Delhi"), Numeric::MISSING)));
        assert!(!filters.matches(&deal("Mobiles", "Apple", Some("Mumbai"), Numeric::MISSING)));
        assert!(!filters.matches(&deal("Mobiles", "Apple", None, Numeric::MISSING)));
    }

    #[test]
    fn deal_type_all_is_no_constraint() {
        let physical = Deal {
            deal_type: DealType::Physical,
            ..Deal::new("p")
        };

        let all = DealFilters {
            deal_type: Some(DealTypeFilter::All),
            ..DealFilters::default()
        };
        let online = DealFilters {
            deal_type: Some(DealTypeFilter::Online),
            ..DealFilters::default()
        };

        assert!(all.is_unconstrained());
        assert!(all.matches(&physical));
        assert!(!online.matches(&physical));
        assert_eq!(DealTypeFilter::All.deal_type(), None);
        assert_eq!(DealTypeFilter::Physical.deal_type(), Some(DealType::Physical));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = DealFilters {
            min_price: Some(Decimal::from(100)),
            max_price: Some(Decimal::from(200)),
            ..DealFilters::default()
        };

        assert!(filters.matches(&deal("A", "B", None, Numeric::from(100))));
        assert!(filters.matches(&deal("A", "B", None, Numeric::from(200))));
        assert!(!filters.matches(&deal("A", "B", None, Numeric::from(99))));
        assert!(!filters.matches(&deal("A", "B", None, Numeric::from(201))));
    }

    #[test]
    fn non_numeric_price_fails_price_bounds_only() {
        let malformed = deal("A", "B", None, Numeric::from("abc"));

        let min_only = DealFilters {
            min_price: Some(Decimal::from(100)),
            ..DealFilters::default()
        };
        let max_only = DealFilters {
            max_price: Some(Decimal::from(100)),
            ..DealFilters::default()
        };

        assert!(!min_only.matches(&malformed));
        assert!(!max_only.matches(&malformed));
        assert!(DealFilters::default().matches(&malformed));
    }

    #[test]
    fn uses_web_client_key_names() -> TestResult {
        let filters: DealFilters = serde_json::from_str(
            r#"{"dealType": "physical", "minPrice": 500, "sortBy": "price_low"}"#,
        )?;

        assert_eq!(filters.deal_type, Some(DealTypeFilter::Physical));
        assert_eq!(filters.min_price, Some(Decimal::from(500)));
        assert_eq!(filters.sort_by(), SortBy::PriceLow);

        Ok(())
    }
}
