//! Integration tests for the page controller
//!
//! Drives `App` through key presses and actions against an in-memory backend.

mod common;

use common::{config, repository, sample_restaurants, FakeApi};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use restoview::app::{Action, App, AppState};
use tempfile::TempDir;

fn press(app: &mut App<FakeApi>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

async fn loaded_app(api: &FakeApi, dir: &TempDir) -> App<FakeApi> {
    let mut app = App::new(repository(api.clone(), dir), &config(dir));
    app.load().await;
    app
}

#[tokio::test]
async fn test_load_shows_list_with_filter_choices() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());

    let app = loaded_app(&api, &dir).await;

    assert_eq!(app.state, AppState::RestaurantList);
    assert_eq!(app.visible_restaurants().len(), 4);
    assert_eq!(app.cuisines, vec!["Asian", "Pizza", "Mexican"]);
    assert_eq!(app.neighborhoods, vec!["Manhattan", "Brooklyn", "Queens"]);
}

#[tokio::test]
async fn test_load_failure_is_reported_in_status() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    api.set_offline(true);

    let app = loaded_app(&api, &dir).await;

    assert_eq!(app.state, AppState::RestaurantList);
    assert!(app.restaurants.is_empty());
    assert!(app
        .status
        .as_deref()
        .is_some_and(|s| s.starts_with("Could not load restaurants")));
}

#[tokio::test]
async fn test_filter_keys_cycle_through_values() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.cuisine_filter.as_deref(), Some("Asian"));
    assert_eq!(app.visible_restaurants().len(), 2);

    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.neighborhood_filter.as_deref(), Some("Brooklyn"));
    assert!(app.visible_restaurants().is_empty());

    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.cuisine_filter, None);
    assert_eq!(app.visible_restaurants().len(), 1);
}

#[tokio::test]
async fn test_selection_wraps_and_enter_opens_restaurant() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    press(&mut app, KeyCode::Up);
    assert_eq!(app.selected_index, 3);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected_index, 0);
    press(&mut app, KeyCode::Char('j'));

    press(&mut app, KeyCode::Enter);
    let action = app.take_action();
    assert_eq!(action, Some(Action::OpenRestaurant(2)));
    app.perform(Action::OpenRestaurant(2)).await;

    assert_eq!(app.state, AppState::RestaurantDetail(2));
    assert_eq!(app.current.as_ref().map(|r| r.name.as_str()), Some("Emily"));
    assert!(app.reviews.is_empty());

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state, AppState::RestaurantList);
}

#[tokio::test]
async fn test_startup_id_opens_restaurant_directly() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut startup = config(&dir);
    startup.restaurant_id = Some(3);
    let mut app = App::new(repository(api.clone(), &dir), &startup);

    app.load().await;

    assert_eq!(app.state, AppState::RestaurantDetail(3));
    assert_eq!(
        app.current.as_ref().map(|r| r.name.as_str()),
        Some("Kang Ho Dong Baekjeong")
    );
}

#[tokio::test]
async fn test_unknown_restaurant_returns_to_list() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    app.open_restaurant(42).await;

    assert_eq!(app.state, AppState::RestaurantList);
    assert_eq!(
        app.status.as_deref(),
        Some("Restaurant with ID 42 was not found")
    );
}

#[tokio::test]
async fn test_toggle_favourite_from_detail() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;
    app.open_restaurant(1).await;

    press(&mut app, KeyCode::Char('f'));
    let action = app.take_action().expect("f should request a toggle");
    app.perform(action).await;

    assert!(app.current.as_ref().is_some_and(|r| r.is_favorite));
    assert!(app.restaurants.iter().any(|r| r.id == 1 && r.is_favorite));
    assert_eq!(app.status.as_deref(), Some("Added to favourites"));
    assert_eq!(api.call_count("PUT /restaurants/1/?is_favorite=true"), 1);
}

#[tokio::test]
async fn test_toggle_favourite_reverts_on_failure() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;
    app.open_restaurant(1).await;
    api.set_offline(true);

    app.perform(Action::ToggleFavourite(1)).await;

    assert!(app.current.as_ref().is_some_and(|r| !r.is_favorite));
    assert!(app.restaurants.iter().all(|r| !r.is_favorite));
    assert!(app
        .status
        .as_deref()
        .is_some_and(|s| s.starts_with("Could not update favourite")));
}

#[tokio::test]
async fn test_toggle_favourite_from_list_uses_selection() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(app.take_action(), Some(Action::ToggleFavourite(2)));
}

#[tokio::test]
async fn test_online_submit_posts_and_shows_stored_review() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;
    app.open_restaurant(4).await;

    press(&mut app, KeyCode::Char('w'));
    for c in "Gus".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('4'));
    press(&mut app, KeyCode::Enter);
    let action = app.take_action().expect("Enter should request a submit");
    app.perform(action).await;

    assert_eq!(app.state, AppState::RestaurantDetail(4));
    assert_eq!(api.call_count("POST"), 1);
    let shown = app.reviews.last().expect("Posted review should be shown");
    assert_eq!(shown.id, Some(1));
    assert!(!app.is_queued(shown));
    assert!(app.queued.is_empty());
    assert_eq!(app.status.as_deref(), Some("Review posted"));
}

#[tokio::test]
async fn test_invalid_form_stays_open() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;
    app.open_restaurant(4).await;

    press(&mut app, KeyCode::Char('w'));
    press(&mut app, KeyCode::Enter);
    let action = app.take_action().expect("Enter should request a submit");
    app.perform(action).await;

    assert_eq!(app.state, AppState::ReviewForm(4));
    assert_eq!(app.status.as_deref(), Some("Please enter your name"));
    assert_eq!(api.call_count("POST"), 0);
}

#[tokio::test]
async fn test_help_overlay_intercepts_keys() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    press(&mut app, KeyCode::Char('?'));
    assert!(app.show_help);
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.show_help);
    assert!(!app.should_quit);

    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_refresh_key_refetches_restaurants() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut app = loaded_app(&api, &dir).await;

    press(&mut app, KeyCode::Char('r'));
    let action = app.take_action().expect("r should request a refresh");
    app.perform(action).await;

    assert_eq!(api.call_count("GET /restaurants"), 2);
    assert_eq!(app.status.as_deref(), Some("Restaurants refreshed"));
}

#[tokio::test]
async fn test_forced_offline_never_sends_favourite() {
    let dir = TempDir::new().unwrap();
    let api = FakeApi::with_restaurants(sample_restaurants());
    let mut startup = config(&dir);
    startup.offline = true;
    let mut app = App::new(repository(api.clone(), &dir), &startup);
    app.load().await;
    app.open_restaurant(1).await;

    press(&mut app, KeyCode::Char('f'));
    let action = app.take_action().expect("f should request a toggle");
    app.perform(action).await;

    assert_eq!(api.call_count("PUT"), 0);
    assert!(app.current.as_ref().is_some_and(|r| !r.is_favorite));
    assert!(!app.repository().store().restaurant(1).unwrap().unwrap().is_favorite);
    assert_eq!(
        app.status.as_deref(),
        Some("You are offline; favourites can be changed when back online")
    );
}
