//! Restaurant review backend API client
//!
//! This module defines the `RestaurantApi` seam the repository talks to and
//! the reqwest-backed `HttpApi` implementation of it.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::{Restaurant, Review};

/// Default backend location, the port the review server listens on
pub const DEFAULT_API_URL: &str = "http://localhost:1337";

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Remote operations the client needs from the backend
#[async_trait]
pub trait RestaurantApi: Send + Sync {
    /// `GET /restaurants`
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    /// `GET /reviews/?restaurant_id={id}`
    async fn fetch_reviews(&self, restaurant_id: u32) -> Result<Vec<Review>, ApiError>;

    /// `POST /reviews/`, returning the review as stored by the server
    async fn post_review(&self, review: &Review) -> Result<Review, ApiError>;

    /// `PUT /restaurants/{id}/?is_favorite={bool}`, returning the updated restaurant
    async fn update_favourite(
        &self,
        restaurant_id: u32,
        is_favorite: bool,
    ) -> Result<Restaurant, ApiError>;

    /// Whether the backend answers at all
    async fn is_reachable(&self) -> bool;
}

/// Client for the restaurant review backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the backend at `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Backend base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, check the status and decode the JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RestaurantApi for HttpApi {
    async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.url("/restaurants");
        tracing::info!(%url, "fetching restaurants");
        self.send_json(self.client.get(&url)).await
    }

    async fn fetch_reviews(&self, restaurant_id: u32) -> Result<Vec<Review>, ApiError> {
        let url = self.url("/reviews/");
        tracing::info!(%url, restaurant_id, "fetching reviews");
        self.send_json(
            self.client
                .get(&url)
                .query(&[("restaurant_id", restaurant_id)]),
        )
        .await
    }

    async fn post_review(&self, review: &Review) -> Result<Review, ApiError> {
        let url = self.url("/reviews/");
        tracing::info!(%url, restaurant_id = review.restaurant_id, "posting review");
        self.send_json(self.client.post(&url).json(review)).await
    }

    async fn update_favourite(
        &self,
        restaurant_id: u32,
        is_favorite: bool,
    ) -> Result<Restaurant, ApiError> {
        let url = self.url(&format!("/restaurants/{}/", restaurant_id));
        tracing::info!(%url, is_favorite, "updating favourite status");
        self.send_json(
            self.client
                .put(&url)
                .query(&[("is_favorite", is_favorite)]),
        )
        .await
    }

    async fn is_reachable(&self) -> bool {
        match self.client.head(&self.base_url).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "backend unreachable");
                false
            }
        }
    }
}
