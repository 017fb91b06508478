//! Core data models for Restoview
//!
//! This module contains the restaurant and review records exchanged with the
//! backend API, along with the lenient decoders the backend's JSON requires.

pub mod api;
pub mod restaurant;

pub use api::{ApiError, HttpApi, RestaurantApi};
pub use restaurant::{
    filter_by_cuisine, filter_by_cuisine_and_neighborhood, filter_by_neighborhood, find_by_id,
    image_url_for_restaurant, sorted_hours, unique_cuisines, unique_neighborhoods,
};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Geographic coordinate pair of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lng: f64,
}

/// A restaurant as served by the backend and mirrored in the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Unique identifier, also the key in the local store
    pub id: u32,
    /// Human-readable name
    pub name: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// Location of the restaurant
    pub latlng: LatLng,
    /// Cuisine type (e.g. "Asian", "Pizza")
    pub cuisine_type: String,
    /// Neighborhood the restaurant is in
    pub neighborhood: String,
    /// Opening hours keyed by day name
    #[serde(default)]
    pub operating_hours: BTreeMap<String, String>,
    /// Whether the user marked this restaurant as a favourite
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_favorite: bool,
    /// Photo reference, used to build the image URL
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub photograph: Option<String>,
}

/// A review of a restaurant
///
/// Reviews written while offline have no `id` until the backend accepts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Identifier of the reviewed restaurant
    #[serde(deserialize_with = "lenient::number")]
    pub restaurant_id: u32,
    /// Author name
    pub name: String,
    /// Rating from 1 to 5
    #[serde(deserialize_with = "lenient::number")]
    pub rating: u8,
    /// Free-form comment text
    #[serde(default)]
    pub comments: String,
    /// When the review was written
    #[serde(rename = "createdAt", with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review written locally, timestamped now and not yet known to the server
    ///
    /// The timestamp is truncated to milliseconds, the precision it is stored
    /// with, so a review read back from disk compares equal to the original.
    pub fn new_local(
        restaurant_id: u32,
        name: impl Into<String>,
        rating: u8,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            restaurant_id,
            name: name.into(),
            rating,
            comments: comments.into(),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Whether the backend has assigned this review an identifier
    pub fn is_synced(&self) -> bool {
        self.id.is_some()
    }
}

/// Decoders for fields the backend sends with inconsistent JSON types
mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagOrText {
        Flag(bool),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u64),
        Text(String),
    }

    /// Accepts `true`, `false`, `"true"` or `"false"`
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match FlagOrText::deserialize(deserializer)? {
            FlagOrText::Flag(value) => Ok(value),
            FlagOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
        }
    }

    /// Accepts a JSON number or a string holding one
    pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + FromStr,
        <T as FromStr>::Err: Display,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(value) => T::try_from(value)
                .map_err(|_| de::Error::custom(format!("number out of range: {}", value))),
            NumberOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
        }
    }

    /// Accepts null, a string, or a number rendered as a string
    pub fn optional_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            NumberOrText::Number(n) => Some(n.to_string()),
            NumberOrText::Text(t) if t.trim().is_empty() => None,
            NumberOrText::Text(t) => Some(t),
        }))
    }
}

/// `createdAt` is epoch milliseconds from the backend but a date string when
/// written by older clients
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .or_else(|_| DateTime::parse_from_rfc2822(&text))
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| de::Error::custom(format!("invalid date: {}", text))),
        }
    }
}
