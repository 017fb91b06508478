//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tempfile::TempDir;

use restoview::cache::{LocalStore, PendingQueue};
use restoview::cli::StartupConfig;
use restoview::data::{ApiError, LatLng, Restaurant, RestaurantApi, Review};
use restoview::repository::Repository;

#[derive(Default)]
struct Inner {
    restaurants: Mutex<Vec<Restaurant>>,
    reviews: Mutex<Vec<Review>>,
    posted: Mutex<Vec<Review>>,
    calls: Mutex<Vec<String>>,
    offline: AtomicBool,
    next_id: AtomicU64,
}

/// In-memory backend that records every call it receives
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Arc<Inner>,
}

impl FakeApi {
    pub fn with_restaurants(restaurants: Vec<Restaurant>) -> Self {
        let api = Self::default();
        *api.inner.restaurants.lock().unwrap() = restaurants;
        api
    }

    pub fn add_review(&self, review: Review) {
        self.inner.reviews.lock().unwrap().push(review);
    }

    /// Makes every following call fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Reviews the backend accepted, in arrival order
    pub fn posted(&self) -> Vec<Review> {
        self.inner.posted.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.inner.calls.lock().unwrap().push(call.clone());
        if self.inner.offline.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                url: call,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RestaurantApi for FakeApi {
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.record("GET /restaurants".to_string())?;
        Ok(self.inner.restaurants.lock().unwrap().clone())
    }

    async fn fetch_reviews(&self, restaurant_id: u32) -> Result<Vec<Review>, ApiError> {
        self.record(format!("GET /reviews/?restaurant_id={}", restaurant_id))?;
        Ok(self
            .inner
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn post_review(&self, review: &Review) -> Result<Review, ApiError> {
        self.record("POST /reviews/".to_string())?;
        let mut stored = review.clone();
        stored.id = Some(self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.posted.lock().unwrap().push(stored.clone());
        self.inner.reviews.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update_favourite(&self, id: u32, is_favorite: bool) -> Result<Restaurant, ApiError> {
        self.record(format!("PUT /restaurants/{}/?is_favorite={}", id, is_favorite))?;
        let mut restaurants = self.inner.restaurants.lock().unwrap();
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::Status {
                status: StatusCode::NOT_FOUND,
                url: format!("/restaurants/{}/", id),
            })?;
        restaurant.is_favorite = is_favorite;
        Ok(restaurant.clone())
    }

    async fn is_reachable(&self) -> bool {
        !self.inner.offline.load(Ordering::SeqCst)
    }
}

pub fn restaurant(id: u32, name: &str, cuisine: &str, neighborhood: &str) -> Restaurant {
    let mut operating_hours = BTreeMap::new();
    operating_hours.insert("Monday".to_string(), "5:30 pm - 11:00 pm".to_string());
    Restaurant {
        id,
        name: name.to_string(),
        address: format!("{} Broadway", id),
        latlng: LatLng { lat: 40.7, lng: -73.9 },
        cuisine_type: cuisine.to_string(),
        neighborhood: neighborhood.to_string(),
        operating_hours,
        is_favorite: false,
        photograph: Some(id.to_string()),
    }
}

pub fn sample_restaurants() -> Vec<Restaurant> {
    vec![
        restaurant(1, "Mission Chinese Food", "Asian", "Manhattan"),
        restaurant(2, "Emily", "Pizza", "Brooklyn"),
        restaurant(3, "Kang Ho Dong Baekjeong", "Asian", "Manhattan"),
        restaurant(4, "Casa Enrique", "Mexican", "Queens"),
    ]
}

pub fn repository(api: FakeApi, dir: &TempDir) -> Repository<FakeApi> {
    Repository::new(
        api,
        LocalStore::with_dir(dir.path().join("cache")),
        PendingQueue::with_dir(dir.path()),
    )
}

pub fn config(dir: &TempDir) -> StartupConfig {
    StartupConfig {
        api_url: "http://localhost:1337".to_string(),
        restaurant_id: None,
        cuisine: None,
        neighborhood: None,
        offline: false,
        sync_only: false,
        cache_dir: dir.path().join("cache"),
        data_dir: dir.path().to_path_buf(),
        timeout: Duration::from_secs(1),
        log_level: tracing::Level::INFO,
    }
}
