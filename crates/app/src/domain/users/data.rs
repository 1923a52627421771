//! User Data

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Profile row of a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id
    pub id: String,

    /// Sign-in email
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Profile picture
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// When the profile was created
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Preferred location of a user. Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationUpdate {
    /// City to show deals for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_city: Option<String>,

    /// Postal code to show deals for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_pincode: Option<String>,

    /// Last reported latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_latitude: Option<f64>,

    /// Last reported longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_longitude: Option<f64>,
}

/// Location row as stored, keyed by the user it belongs to.
#[derive(Debug, Serialize)]
pub(crate) struct LocationRow<'a> {
    pub(crate) user_id: &'a str,

    #[serde(flatten)]
    pub(crate) location: &'a LocationUpdate,

    pub(crate) updated_at: Timestamp,
}
