//! Deals Data

use dealfeed::deals::{DealType, Specs};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

/// New Deal Data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewDeal {
    /// Product title
    pub title: String,

    /// Manufacturer model number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,

    /// Product brand
    pub brand: String,

    /// Product category
    pub category: String,

    /// Free-form description
    pub description: String,

    /// Price before the deal
    pub original_price: Decimal,

    /// Price with the deal applied
    pub deal_price: Decimal,

    /// Advertised discount
    pub discount_percentage: Decimal,

    /// Merchant offering the deal
    pub merchant: String,

    /// Link to the offer
    pub deal_url: String,

    /// Product image
    pub image_url: String,

    /// Ordered display attributes
    pub specs: Specs,

    /// Warranty summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_info: Option<String>,

    /// When the offer ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,

    /// Submitting user
    pub created_by: String,

    /// Online or in store
    pub deal_type: DealType,

    /// Physical store name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    /// Physical store address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City the deal is available in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// State the deal is available in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

/// Deal Update Data
///
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DealUpdate {
    /// Product title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Price before the deal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,

    /// Price with the deal applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_price: Option<Decimal>,

    /// Advertised discount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Decimal>,

    /// Link to the offer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_url: Option<String>,

    /// Product image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Warranty summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_info: Option<String>,

    /// When the offer ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,

    /// Checked by a moderator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}
