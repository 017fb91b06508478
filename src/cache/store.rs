//! Local store mirroring backend records on disk
//!
//! Provides a `LocalStore` with two collections: restaurants keyed by id and
//! reviews indexed by the restaurant they belong to. Each collection is one
//! JSON file carrying the time it was last written.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::StoreError;
use crate::data::{Restaurant, Review};

const RESTAURANTS: &str = "restaurants";
const REVIEWS: &str = "reviews";

/// Wrapper struct for a collection stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct Collection<T> {
    /// The stored records
    records: T,
    /// When the collection was last written
    updated_at: DateTime<Utc>,
}

/// Reads a JSON file, returning `None` when it does not exist
pub(super) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes JSON to a sibling temp file and renames it over `path`
pub(super) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Persistent mirror of restaurants and reviews
///
/// Stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/restoview/` on Linux). The store is never authoritative: callers
/// treat read failures as a cache miss.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory where collection files are stored
    dir: PathBuf,
}

impl LocalStore {
    /// Creates a LocalStore with a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn read_collection<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let collection: Option<Collection<T>> = read_json(&self.collection_path(name))?;
        Ok(collection.map(|c| c.records).unwrap_or_default())
    }

    fn write_collection<T: Serialize>(&self, name: &str, records: &T) -> Result<(), StoreError> {
        let collection = Collection {
            records,
            updated_at: Utc::now(),
        };
        write_json(&self.collection_path(name), &collection)
    }

    fn restaurant_map(&self) -> Result<BTreeMap<u32, Restaurant>, StoreError> {
        self.read_collection(RESTAURANTS)
    }

    fn review_index(&self) -> Result<BTreeMap<u32, Vec<Review>>, StoreError> {
        self.read_collection(REVIEWS)
    }

    /// All stored restaurants, ordered by id
    pub fn restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        Ok(self.restaurant_map()?.into_values().collect())
    }

    /// A single stored restaurant
    pub fn restaurant(&self, id: u32) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.restaurant_map()?.remove(&id))
    }

    /// Inserts or replaces restaurants by id
    pub fn put_restaurants(&self, restaurants: &[Restaurant]) -> Result<(), StoreError> {
        let mut map = self.restaurant_map().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable restaurant store");
            BTreeMap::new()
        });
        for restaurant in restaurants {
            map.insert(restaurant.id, restaurant.clone());
        }
        self.write_collection(RESTAURANTS, &map)
    }

    /// Inserts or replaces one restaurant
    pub fn put_restaurant(&self, restaurant: &Restaurant) -> Result<(), StoreError> {
        self.put_restaurants(std::slice::from_ref(restaurant))
    }

    /// Stored reviews for a restaurant, in insertion order
    pub fn reviews_for(&self, restaurant_id: u32) -> Result<Vec<Review>, StoreError> {
        Ok(self
            .review_index()?
            .remove(&restaurant_id)
            .unwrap_or_default())
    }

    /// Adds reviews to the index of their restaurant
    ///
    /// A review whose id is already stored replaces the stored copy.
    pub fn put_reviews(&self, reviews: &[Review]) -> Result<(), StoreError> {
        let mut index = self.review_index().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable review store");
            BTreeMap::new()
        });
        for review in reviews {
            let entries = index.entry(review.restaurant_id).or_default();
            let existing = review
                .id
                .and_then(|id| entries.iter().position(|r| r.id == Some(id)));
            match existing {
                Some(pos) => entries[pos] = review.clone(),
                None => entries.push(review.clone()),
            }
        }
        self.write_collection(REVIEWS, &index)
    }

    /// Adds a review to its restaurant's index if that index holds fetched reviews
    ///
    /// Returns whether the review was stored. A restaurant without an entry
    /// keeps none, so its next read still goes to the backend.
    pub fn add_review(&self, review: &Review) -> Result<bool, StoreError> {
        let mut index = self.review_index()?;
        let Some(entries) = index.get_mut(&review.restaurant_id) else {
            return Ok(false);
        };
        let existing = review
            .id
            .and_then(|id| entries.iter().position(|r| r.id == Some(id)));
        match existing {
            Some(pos) => entries[pos] = review.clone(),
            None => entries.push(review.clone()),
        }
        self.write_collection(REVIEWS, &index)?;
        Ok(true)
    }
}
