//! Lenient numerics
//!
//! Deal rows come from an external store and their numeric columns are not
//! guaranteed to hold numbers. [`Numeric`] accepts anything at deserialization
//! time and keeps only values that are real, finite decimals.

use std::{fmt, str::FromStr};

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};

/// A numeric field that may be missing or malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Numeric(Option<Decimal>);

impl Numeric {
    /// A missing (or malformed) value.
    pub const MISSING: Self = Self(None);

    /// Wrap a known value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(Some(value))
    }

    /// The value, if the field held a number.
    #[must_use]
    pub const fn value(self) -> Option<Decimal> {
        self.0
    }

    /// Whether the field was missing or malformed.
    #[must_use]
    pub const fn is_missing(self) -> bool {
        self.0.is_none()
    }

    /// The value, or zero when missing.
    #[must_use]
    pub fn or_zero(self) -> Decimal {
        self.0.unwrap_or(Decimal::ZERO)
    }

    /// The value truncated to an integer, or zero when missing or out of range.
    #[must_use]
    pub fn to_i64_or_zero(self) -> i64 {
        self.0.and_then(|value| value.trunc().to_i64()).unwrap_or(0)
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Option<Decimal>> for Numeric {
    fn from(value: Option<Decimal>) -> Self {
        Self(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self::new(Decimal::from(value))
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        // NaN and the infinities have no decimal representation.
        Self(Decimal::from_f64(value))
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::MISSING, Self::from)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self(Decimal::from_str(value.trim()).ok())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("-"),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(value) = self.0 else {
            return serializer.serialize_none();
        };

        let whole = value.fract().is_zero().then(|| value.to_i64()).flatten();

        if let Some(whole) = whole {
            return serializer.serialize_i64(whole);
        }

        match value.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value, ideally a number")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Numeric, E> {
        Ok(Numeric::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Numeric, E> {
        Ok(Numeric::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Numeric, E> {
        Ok(Numeric::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Numeric, E> {
        Ok(Numeric::from(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Numeric, E> {
        Ok(Numeric::MISSING)
    }

    fn visit_none<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::MISSING)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::MISSING)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Numeric, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Numeric, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(Numeric::MISSING)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Numeric, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}

        Ok(Numeric::MISSING)
    }
}
