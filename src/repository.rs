//! Cache-then-fetch data access for restaurants and reviews
//!
//! The `Repository` answers every read from the local store when it holds
//! anything, and only falls back to the backend when the store is empty. It
//! also owns the pending queue of reviews written while offline.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cache::{LocalStore, PendingQueue, StoreError};
use crate::data::{self, ApiError, Restaurant, RestaurantApi, Review};

/// Errors surfaced by repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local storage could not be used where it was required
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No restaurant with the requested id exists
    #[error("Restaurant with ID {0} was not found")]
    NotFound(u32),
}

/// Data access layer combining the backend, the local store and the pending queue
#[derive(Debug, Clone)]
pub struct Repository<A> {
    api: A,
    store: LocalStore,
    queue: PendingQueue,
}

impl<A> Repository<A> {
    /// Creates a repository over the given backend client and local files
    pub fn new(api: A, store: LocalStore, queue: PendingQueue) -> Self {
        Self { api, store, queue }
    }

    /// The backend client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The local store
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Queue a review for later submission, returning the queue length
    pub fn save_review_for_later(&self, review: &Review) -> Result<usize, RepositoryError> {
        let len = self.queue.push(review.clone())?;
        info!(restaurant_id = review.restaurant_id, pending = len, "review saved for later");
        Ok(len)
    }

    /// Reviews still waiting to be posted
    pub fn pending_reviews(&self) -> Result<Vec<Review>, RepositoryError> {
        Ok(self.queue.load()?)
    }

    /// Number of reviews waiting to be posted, zero if the queue is unreadable
    pub fn pending_count(&self) -> usize {
        self.queue.count().unwrap_or_else(|e| {
            warn!(error = %e, "pending review queue unreadable");
            0
        })
    }
}

impl<A: RestaurantApi> Repository<A> {
    /// Fetch all restaurants, preferring the local store
    pub async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        match self.store.restaurants() {
            Ok(cached) if !cached.is_empty() => {
                debug!(count = cached.len(), "restaurants served from local store");
                return Ok(cached);
            }
            Ok(_) => debug!("local store has no restaurants"),
            Err(e) => warn!(error = %e, "local restaurant store unreadable, fetching"),
        }

        self.fetch_and_cache_restaurants().await
    }

    /// Fetch all restaurants from the backend and mirror them locally
    pub async fn fetch_and_cache_restaurants(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let restaurants = self.api.fetch_restaurants().await?;
        info!(count = restaurants.len(), "fetched restaurants");

        if let Err(e) = self.store.put_restaurants(&restaurants) {
            warn!(error = %e, "failed to cache restaurants");
        }
        Ok(restaurants)
    }

    /// Fetch a restaurant by its ID
    pub async fn fetch_restaurant_by_id(&self, id: u32) -> Result<Restaurant, RepositoryError> {
        let restaurants = self.fetch_restaurants().await?;
        data::find_by_id(&restaurants, id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    /// Fetch restaurants serving a cuisine
    pub async fn fetch_restaurants_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        let restaurants = self.fetch_restaurants().await?;
        Ok(data::filter_by_cuisine(&restaurants, cuisine)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Fetch restaurants in a neighborhood
    pub async fn fetch_restaurants_by_neighborhood(
        &self,
        neighborhood: &str,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        let restaurants = self.fetch_restaurants().await?;
        Ok(data::filter_by_neighborhood(&restaurants, neighborhood)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Fetch restaurants by cuisine and neighborhood, `None` meaning "all"
    pub async fn fetch_restaurants_by_cuisine_and_neighborhood(
        &self,
        cuisine: Option<&str>,
        neighborhood: Option<&str>,
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        let restaurants = self.fetch_restaurants().await?;
        Ok(
            data::filter_by_cuisine_and_neighborhood(&restaurants, cuisine, neighborhood)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    /// Fetch all distinct neighborhoods
    pub async fn fetch_neighborhoods(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(data::unique_neighborhoods(&self.fetch_restaurants().await?))
    }

    /// Fetch all distinct cuisines
    pub async fn fetch_cuisines(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(data::unique_cuisines(&self.fetch_restaurants().await?))
    }

    /// Fetch the reviews of a restaurant, preferring the local store
    pub async fn fetch_reviews_by_restaurant_id(
        &self,
        restaurant_id: u32,
    ) -> Result<Vec<Review>, RepositoryError> {
        match self.store.reviews_for(restaurant_id) {
            Ok(cached) if !cached.is_empty() => {
                debug!(restaurant_id, count = cached.len(), "reviews served from local store");
                return Ok(cached);
            }
            Ok(_) => debug!(restaurant_id, "local store has no reviews"),
            Err(e) => warn!(error = %e, "local review store unreadable, fetching"),
        }

        let reviews = self.api.fetch_reviews(restaurant_id).await?;
        info!(restaurant_id, count = reviews.len(), "fetched reviews");

        if let Err(e) = self.store.put_reviews(&reviews) {
            warn!(error = %e, "failed to cache reviews");
        }
        Ok(reviews)
    }

    /// Post a review and mirror the stored copy locally
    ///
    /// Once the backend accepted the review this never fails, so callers can
    /// safely treat an `Ok` as "delivered".
    pub async fn post_and_cache_review(&self, review: &Review) -> Result<Review, RepositoryError> {
        let stored = self.api.post_review(review).await?;
        info!(restaurant_id = stored.restaurant_id, id = ?stored.id, "review posted");

        match self.store.add_review(&stored) {
            Ok(true) => {}
            Ok(false) => debug!(
                restaurant_id = stored.restaurant_id,
                "reviews not fetched yet, posted review left to the next fetch"
            ),
            Err(e) => warn!(error = %e, "failed to cache posted review"),
        }
        Ok(stored)
    }

    /// Mark or unmark a restaurant as favourite
    ///
    /// The stored copy is flipped before the backend is asked; if the backend
    /// refuses, the stored flag is restored and the error returned.
    pub async fn update_favourite_status(
        &self,
        restaurant_id: u32,
        is_favorite: bool,
    ) -> Result<Restaurant, RepositoryError> {
        let previous = match self.store.restaurant(restaurant_id) {
            Ok(Some(restaurant)) => {
                let mut optimistic = restaurant.clone();
                optimistic.is_favorite = is_favorite;
                if let Err(e) = self.store.put_restaurant(&optimistic) {
                    warn!(error = %e, "failed to store favourite optimistically");
                }
                Some(restaurant)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "local restaurant store unreadable");
                None
            }
        };

        match self.api.update_favourite(restaurant_id, is_favorite).await {
            Ok(confirmed) => {
                info!(restaurant_id, is_favorite, "favourite status confirmed");
                if let Err(e) = self.store.put_restaurant(&confirmed) {
                    warn!(error = %e, "failed to cache confirmed restaurant");
                }
                Ok(confirmed)
            }
            Err(e) => {
                if let Some(restaurant) = previous {
                    if let Err(store_err) = self.store.put_restaurant(&restaurant) {
                        warn!(error = %store_err, "failed to restore favourite status");
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Post every queued review in order, returning how many were delivered
    ///
    /// Each delivered review is removed from the persisted queue before the
    /// next one is sent. The first failure to post stops the drain and leaves
    /// that review and the rest queued. A failure to rewrite the queue after a
    /// delivery does not stop the drain: the next rewrite carries the removal.
    pub async fn post_saved_reviews(&self) -> Result<usize, RepositoryError> {
        let mut pending = self.queue.load()?;
        if pending.is_empty() {
            return Ok(0);
        }
        info!(pending = pending.len(), "posting saved reviews");

        let mut sent = 0;
        let mut persisted = true;
        while let Some(review) = pending.first().cloned() {
            if let Err(e) = self.post_and_cache_review(&review).await {
                warn!(error = %e, sent, remaining = pending.len(), "stopped posting saved reviews");
                if !persisted {
                    self.persist_queue(&pending);
                }
                return Err(e);
            }
            pending.remove(0);
            sent += 1;
            persisted = self.persist_queue(&pending);
        }

        info!(sent, "saved reviews posted");
        Ok(sent)
    }

    /// Rewrites the queue after a delivery, returning whether it stuck
    fn persist_queue(&self, pending: &[Review]) -> bool {
        match self.queue.save(pending) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, remaining = pending.len(), "failed to update pending review queue");
                false
            }
        }
    }
}
