//! Deals

use std::fmt;

use jiff::Timestamp;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::numeric::Numeric;

/// Opaque deal identifier assigned by the backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(String);

impl DealId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DealId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DealId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where a deal can be redeemed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    /// Redeemable through a merchant's website.
    #[default]
    Online,

    /// Redeemable in a physical store.
    Physical,
}

impl DealType {
    /// Wire name of the deal type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Physical => "physical",
        }
    }
}

/// Display attributes of a deal, in the order the store sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specs(Vec<(String, String)>);

impl Specs {
    /// Build from ordered pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate attributes in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Specs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for Specs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpecsVisitor)
    }
}

struct SpecsVisitor;

impl<'de> Visitor<'de> for SpecsVisitor {
    type Value = Specs;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to display values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Specs, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));

        while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
            let display = match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };

            entries.push((key, display));
        }

        Ok(Specs(entries))
    }

    fn visit_none<E: de::Error>(self) -> Result<Specs, E> {
        Ok(Specs::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Specs, E> {
        Ok(Specs::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Specs, D::Error> {
        deserializer.deserialize_any(SpecsVisitor)
    }
}

/// A single advertised offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deal {
    /// Store-assigned identifier
    pub id: DealId,

    /// Headline shown on listings
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
    pub original_price: Numeric,

    /// Price with the deal applied
    pub deal_price: Numeric,

    /// Stored discount; not recomputed from the two prices
    pub discount_percentage: Numeric,

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
    #[serde(
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<Timestamp>,

    /// Submitting user
    pub created_by: String,

    /// Up vote count
    pub upvotes: Numeric,

    /// Down vote count
    pub downvotes: Numeric,

    /// Checked by a moderator
    pub is_verified: bool,

    /// When the deal was posted; missing when the store sent something unparseable
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<Timestamp>,

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

    /// Store latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Store longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Manually featured
    pub is_promoted: bool,

    /// Featured rank, lower first; only meaningful when promoted
    pub promotion_order: Numeric,
}

impl Deal {
    /// Create a deal with the given identifier and every other field empty.
    pub fn new(id: impl Into<DealId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether all commerce fields hold numbers.
    pub fn is_well_formed(&self) -> bool {
        !(self.deal_price.is_missing()
            || self.original_price.is_missing()
            || self.discount_percentage.is_missing())
    }
}

/// Drop deals whose commerce fields are not all numeric.
pub fn retain_well_formed(deals: &mut Vec<Deal>) {
    deals.retain(Deal::is_well_formed);
}

/// A recorded price point for a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Store-assigned identifier
    pub id: String,

    /// Deal the price belongs to
    pub deal_id: DealId,

    /// Price at the time
    #[serde(default)]
    pub price: Numeric,

    /// When the price was observed
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub recorded_at: Option<Timestamp>,
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    deserializer.deserialize_any(TimestampVisitor)
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Option<Timestamp>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 timestamp")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.parse().ok())
    }

    fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}

        Ok(None)
    }
}
