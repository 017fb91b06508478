//! Application state management for Restoview
//!
//! This module contains the page controller: it loads restaurants through the
//! repository, tracks which view is shown, handles keyboard input, and runs
//! the review and favourite workflows including the offline fallback.

use crossterm::event::{KeyCode, KeyEvent};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cli::StartupConfig;
use crate::data::{self, Restaurant, RestaurantApi, Review};
use crate::refresh::RefreshMessage;
use crate::repository::Repository;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// List view showing the filtered restaurants
    RestaurantList,
    /// Detail view for a specific restaurant
    RestaurantDetail(u32),
    /// Review form on top of a restaurant's detail view
    ReviewForm(u32),
}

/// Work requested by a key press that needs the backend or the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show a restaurant's details and reviews
    OpenRestaurant(u32),
    /// Submit the review form
    SubmitReview,
    /// Flip the favourite flag of a restaurant
    ToggleFavourite(u32),
    /// Re-fetch restaurants from the backend
    Refresh,
    /// Post reviews saved while offline
    SyncPending,
}

/// Field of the review form that receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Name,
    Rating,
    Comments,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Name => DraftField::Rating,
            DraftField::Rating => DraftField::Comments,
            DraftField::Comments => DraftField::Name,
        }
    }
}

/// Reasons a review form cannot be submitted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Rating must be a number from 1 to 5, got '{0}'")]
    InvalidRating(String),
}

/// Contents of the review form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub name: String,
    pub rating: String,
    pub comments: String,
    pub focus: DraftField,
}

impl ReviewDraft {
    /// Validates the form into a local review for `restaurant_id`
    pub fn to_review(&self, restaurant_id: u32) -> Result<Review, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let rating = self
            .rating
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| FormError::InvalidRating(self.rating.clone()))?;

        Ok(Review::new_local(
            restaurant_id,
            name,
            rating,
            self.comments.trim(),
        ))
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            DraftField::Name => &mut self.name,
            DraftField::Rating => &mut self.rating,
            DraftField::Comments => &mut self.comments,
        }
    }
}

/// Main application struct managing state and data
pub struct App<A> {
    /// Current application state/view
    pub state: AppState,
    /// Index of the selected restaurant within the filtered list
    pub selected_index: usize,
    /// All known restaurants
    pub restaurants: Vec<Restaurant>,
    /// Distinct cuisines, for the filter
    pub cuisines: Vec<String>,
    /// Distinct neighborhoods, for the filter
    pub neighborhoods: Vec<String>,
    /// Active cuisine filter
    pub cuisine_filter: Option<String>,
    /// Active neighborhood filter
    pub neighborhood_filter: Option<String>,
    /// Restaurant shown in the detail view
    pub current: Option<Restaurant>,
    /// Reviews shown in the detail view, pending ones included
    pub reviews: Vec<Review>,
    /// Review form contents
    pub draft: ReviewDraft,
    /// Whether the backend is believed reachable
    pub online: bool,
    /// Whether the app was started with --offline
    pub offline_forced: bool,
    /// Reviews waiting to be posted, as last read from the queue
    pub queued: Vec<Review>,
    /// Last message for the status line
    pub status: Option<String>,
    /// Backend base URL, for image links
    pub api_url: String,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for restaurant detail view
    pub detail_scroll_offset: u16,
    /// Restaurant to open once loading finishes
    pending_restaurant: Option<u32>,
    /// Work queued by the last key press
    pending_action: Option<Action>,
    repository: Repository<A>,
}

impl<A> App<A> {
    /// Creates a new App over a repository, applying the startup configuration
    pub fn new(repository: Repository<A>, config: &StartupConfig) -> Self {
        let queued = repository.pending_reviews().unwrap_or_else(|e| {
            warn!(error = %e, "pending review queue unreadable");
            Vec::new()
        });
        Self {
            state: AppState::Loading,
            selected_index: 0,
            restaurants: Vec::new(),
            cuisines: Vec::new(),
            neighborhoods: Vec::new(),
            cuisine_filter: config.cuisine.clone(),
            neighborhood_filter: config.neighborhood.clone(),
            current: None,
            reviews: Vec::new(),
            draft: ReviewDraft::default(),
            online: !config.offline,
            offline_forced: config.offline,
            queued,
            status: None,
            api_url: config.api_url.clone(),
            should_quit: false,
            show_help: false,
            detail_scroll_offset: 0,
            pending_restaurant: config.restaurant_id,
            pending_action: None,
            repository,
        }
    }

    /// Replaces the restaurant list and the filter choices derived from it
    pub fn set_restaurants(&mut self, restaurants: Vec<Restaurant>) {
        self.cuisines = data::unique_cuisines(&restaurants);
        self.neighborhoods = data::unique_neighborhoods(&restaurants);
        self.restaurants = restaurants;
        let count = self.visible_restaurants().len();
        if self.selected_index >= count {
            self.selected_index = 0;
        }
    }

    /// Restaurants passing the active filters
    pub fn visible_restaurants(&self) -> Vec<&Restaurant> {
        data::filter_by_cuisine_and_neighborhood(
            &self.restaurants,
            self.cuisine_filter.as_deref(),
            self.neighborhood_filter.as_deref(),
        )
    }

    /// Currently selected restaurant in list view
    pub fn selected_restaurant(&self) -> Option<&Restaurant> {
        self.visible_restaurants().get(self.selected_index).copied()
    }

    /// Whether a shown review is still waiting in the queue
    pub fn is_queued(&self, review: &Review) -> bool {
        !review.is_synced() && self.queued.contains(review)
    }

    /// Takes the work requested by the last key press
    pub fn take_action(&mut self) -> Option<Action> {
        self.pending_action.take()
    }

    /// The data layer behind this app
    pub fn repository(&self) -> &Repository<A> {
        &self.repository
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` (outside the form): Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection or scroll
    /// - `Enter`: Open the selected restaurant / submit the form
    /// - `c`, `n`: Cycle cuisine / neighborhood filter
    /// - `f`: Toggle favourite of the selected or shown restaurant
    /// - `w`: Write a review
    /// - `r`: Refresh restaurants from the backend
    /// - `s`: Post saved reviews
    /// - `Esc`: Go back
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state.clone() {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::RestaurantList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(id) = self.selected_restaurant().map(|r| r.id) {
                        self.pending_action = Some(Action::OpenRestaurant(id));
                    }
                }
                KeyCode::Char('c') => {
                    self.cuisine_filter = cycle(&self.cuisines, self.cuisine_filter.take());
                    self.selected_index = 0;
                }
                KeyCode::Char('n') => {
                    self.neighborhood_filter =
                        cycle(&self.neighborhoods, self.neighborhood_filter.take());
                    self.selected_index = 0;
                }
                KeyCode::Char('f') => {
                    if let Some(id) = self.selected_restaurant().map(|r| r.id) {
                        self.pending_action = Some(Action::ToggleFavourite(id));
                    }
                }
                KeyCode::Char('r') => {
                    self.pending_action = Some(Action::Refresh);
                }
                KeyCode::Char('s') => {
                    self.pending_action = Some(Action::SyncPending);
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::RestaurantDetail(id) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.detail_scroll_offset = 0;
                    self.state = AppState::RestaurantList;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_add(1);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('f') => {
                    self.pending_action = Some(Action::ToggleFavourite(id));
                }
                KeyCode::Char('w') => {
                    self.state = AppState::ReviewForm(id);
                }
                KeyCode::Char('s') => {
                    self.pending_action = Some(Action::SyncPending);
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::ReviewForm(id) => match key_event.code {
                KeyCode::Esc => {
                    self.state = AppState::RestaurantDetail(id);
                }
                KeyCode::Tab => {
                    self.draft.focus = self.draft.focus.next();
                }
                KeyCode::Enter => {
                    self.pending_action = Some(Action::SubmitReview);
                }
                KeyCode::Backspace => {
                    self.draft.focused_mut().pop();
                }
                KeyCode::Char(c) => {
                    self.draft.focused_mut().push(c);
                }
                _ => {}
            },
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_restaurants().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_restaurants().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }
}

/// Next filter value: all -> first -> ... -> last -> all
fn cycle(values: &[String], current: Option<String>) -> Option<String> {
    match current {
        None => values.first().cloned(),
        Some(value) => values
            .iter()
            .position(|v| *v == value)
            .and_then(|i| values.get(i + 1))
            .cloned(),
    }
}

impl<A: RestaurantApi> App<A> {
    /// Loads the page: posts saved reviews, fetches restaurants, opens the requested one
    pub async fn load(&mut self) {
        if self.online {
            self.sync_pending().await;
        }

        match self.repository.fetch_restaurants().await {
            Ok(restaurants) => self.set_restaurants(restaurants),
            Err(e) => {
                error!(error = %e, "failed to load restaurants");
                self.status = Some(format!("Could not load restaurants: {}", e));
            }
        }

        self.state = AppState::RestaurantList;
        if let Some(id) = self.pending_restaurant.take() {
            self.open_restaurant(id).await;
        }
    }

    /// Runs an action requested by a key press
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::OpenRestaurant(id) => self.open_restaurant(id).await,
            Action::SubmitReview => self.submit_review().await,
            Action::ToggleFavourite(id) => self.toggle_favourite(id).await,
            Action::Refresh => self.refresh().await,
            Action::SyncPending => self.sync_pending().await,
        }
    }

    /// Shows a restaurant with its reviews, including ones still waiting to be posted
    pub async fn open_restaurant(&mut self, id: u32) {
        let restaurant = match self.repository.fetch_restaurant_by_id(id).await {
            Ok(restaurant) => restaurant,
            Err(e) => {
                error!(error = %e, "failed to open restaurant");
                self.status = Some(e.to_string());
                self.state = AppState::RestaurantList;
                return;
            }
        };

        let mut reviews = match self.repository.fetch_reviews_by_restaurant_id(id).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!(error = %e, restaurant_id = id, "failed to load reviews");
                self.status = Some(format!("Could not load reviews: {}", e));
                Vec::new()
            }
        };
        self.reload_queued();
        reviews.extend(
            self.queued
                .iter()
                .filter(|r| r.restaurant_id == id)
                .cloned(),
        );

        self.current = Some(restaurant);
        self.reviews = reviews;
        self.detail_scroll_offset = 0;
        self.state = AppState::RestaurantDetail(id);
    }

    /// Submits the review form
    ///
    /// The review is shown immediately. It is saved for later when offline,
    /// and also when posting fails, so nothing typed is lost.
    pub async fn submit_review(&mut self) {
        let AppState::ReviewForm(id) = self.state else {
            return;
        };

        let review = match self.draft.to_review(id) {
            Ok(review) => review,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        self.draft = ReviewDraft::default();
        self.reviews.push(review.clone());
        self.state = AppState::RestaurantDetail(id);

        if !self.online {
            self.save_for_later(&review);
            return;
        }

        match self.repository.post_and_cache_review(&review).await {
            Ok(stored) => {
                if let Some(shown) = self.reviews.iter_mut().rev().find(|r| **r == review) {
                    *shown = stored;
                }
                self.status = Some("Review posted".to_string());
            }
            Err(e) => {
                error!(error = %e, "failed to post review");
                self.save_for_later(&review);
            }
        }
    }

    fn save_for_later(&mut self, review: &Review) {
        match self.repository.save_review_for_later(review) {
            Ok(_) => {
                self.reload_queued();
                self.status =
                    Some("You are offline; the review will be posted when back online".to_string());
            }
            Err(e) => {
                error!(error = %e, "failed to save review for later");
                self.status = Some(format!("Could not save review: {}", e));
            }
        }
    }

    /// Flips the favourite flag of a restaurant
    ///
    /// The new flag is shown before the backend answers and put back if the
    /// update fails. Nothing is sent while offline.
    pub async fn toggle_favourite(&mut self, id: u32) {
        if !self.online {
            self.status =
                Some("You are offline; favourites can be changed when back online".to_string());
            return;
        }

        let shown = self
            .current
            .as_ref()
            .filter(|r| r.id == id)
            .or_else(|| self.restaurants.iter().find(|r| r.id == id));
        let Some(is_favorite) = shown.map(|r| !r.is_favorite) else {
            return;
        };
        self.set_favourite_flag(id, is_favorite);

        match self
            .repository
            .update_favourite_status(id, is_favorite)
            .await
        {
            Ok(_) => {
                self.status = Some(
                    if is_favorite {
                        "Added to favourites"
                    } else {
                        "Removed from favourites"
                    }
                    .to_string(),
                );
            }
            Err(e) => {
                error!(error = %e, restaurant_id = id, "failed to update favourite");
                self.set_favourite_flag(id, !is_favorite);
                self.status = Some(format!("Could not update favourite: {}", e));
            }
        }
    }

    fn set_favourite_flag(&mut self, id: u32, is_favorite: bool) {
        if let Some(current) = self.current.as_mut().filter(|r| r.id == id) {
            current.is_favorite = is_favorite;
        }
        if let Some(listed) = self.restaurants.iter_mut().find(|r| r.id == id) {
            listed.is_favorite = is_favorite;
        }
    }

    /// Re-fetches restaurants from the backend, keeping the current list on failure
    pub async fn refresh(&mut self) {
        match self.repository.fetch_and_cache_restaurants().await {
            Ok(restaurants) => {
                self.set_restaurants(restaurants);
                self.status = Some("Restaurants refreshed".to_string());
            }
            Err(e) => {
                warn!(error = %e, "refresh failed");
                self.status = Some(format!("Refresh failed: {}", e));
            }
        }
    }

    /// Posts reviews saved while offline
    pub async fn sync_pending(&mut self) {
        if self.offline_forced {
            return;
        }

        match self.repository.post_saved_reviews().await {
            Ok(0) => {}
            Ok(sent) => {
                info!(sent, "saved reviews delivered");
                self.status = Some(format!("Posted {} saved review(s)", sent));
            }
            Err(e) => {
                warn!(error = %e, "saved reviews not delivered");
                self.status = Some(format!("Saved reviews not posted yet: {}", e));
            }
        }
        self.reload_queued();
    }

    /// Re-reads the pending queue so the view knows which reviews are still queued
    fn reload_queued(&mut self) {
        match self.repository.pending_reviews() {
            Ok(queued) => self.queued = queued,
            Err(e) => warn!(error = %e, "pending review queue unreadable"),
        }
    }

    /// Applies a message from the connectivity monitor
    pub async fn handle_refresh(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::ConnectivityChanged { online } => self.set_online(online).await,
        }
    }

    /// Records connectivity, posting saved reviews when coming back online
    pub async fn set_online(&mut self, online: bool) {
        if self.offline_forced {
            return;
        }

        let was_online = self.online;
        self.online = online;
        if online && !was_online {
            info!("back online");
            self.sync_pending().await;
        } else if !online && was_online {
            info!("went offline");
            self.status = Some("Offline: showing cached data".to_string());
        }
    }
}
