//! Pure lookups and filters over a fetched restaurant collection

use chrono::Weekday;

use super::Restaurant;

/// Image shown for restaurants without a photograph
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/640x360";

/// Find a restaurant by its ID
///
/// # Example
///
/// ```
/// use restoview::data::{find_by_id, Restaurant};
///
/// let restaurants: Vec<Restaurant> = Vec::new();
/// assert!(find_by_id(&restaurants, 1).is_none());
/// ```
pub fn find_by_id(restaurants: &[Restaurant], id: u32) -> Option<&Restaurant> {
    restaurants.iter().find(|r| r.id == id)
}

/// Restaurants serving the given cuisine
pub fn filter_by_cuisine<'a>(restaurants: &'a [Restaurant], cuisine: &str) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| r.cuisine_type == cuisine)
        .collect()
}

/// Restaurants located in the given neighborhood
pub fn filter_by_neighborhood<'a>(
    restaurants: &'a [Restaurant],
    neighborhood: &str,
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| r.neighborhood == neighborhood)
        .collect()
}

/// Restaurants matching both filters, where `None` means "all"
pub fn filter_by_cuisine_and_neighborhood<'a>(
    restaurants: &'a [Restaurant],
    cuisine: Option<&str>,
    neighborhood: Option<&str>,
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| cuisine.map_or(true, |c| r.cuisine_type == c))
        .filter(|r| neighborhood.map_or(true, |n| r.neighborhood == n))
        .collect()
}

/// Distinct neighborhoods, in the order they first appear
pub fn unique_neighborhoods(restaurants: &[Restaurant]) -> Vec<String> {
    unique_by(restaurants, |r| &r.neighborhood)
}

/// Distinct cuisine types, in the order they first appear
pub fn unique_cuisines(restaurants: &[Restaurant]) -> Vec<String> {
    unique_by(restaurants, |r| &r.cuisine_type)
}

fn unique_by<F>(restaurants: &[Restaurant], field: F) -> Vec<String>
where
    F: Fn(&Restaurant) -> &String,
{
    let mut values: Vec<String> = Vec::new();
    for restaurant in restaurants {
        let value = field(restaurant);
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}

/// Image URL for a restaurant, served by the backend under `/img`
pub fn image_url_for_restaurant(base_url: &str, restaurant: &Restaurant) -> String {
    match &restaurant.photograph {
        Some(photo) => format!("{}/img/{}.jpg", base_url.trim_end_matches('/'), photo),
        None => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}

/// Operating hours ordered Monday through Sunday
///
/// Entries whose key is not a weekday name keep their relative order and
/// come last.
pub fn sorted_hours(restaurant: &Restaurant) -> Vec<(&str, &str)> {
    let mut hours: Vec<(&str, &str)> = restaurant
        .operating_hours
        .iter()
        .map(|(day, time)| (day.as_str(), time.as_str()))
        .collect();

    hours.sort_by_key(|(day, _)| {
        day.parse::<Weekday>()
            .map(|d| d.num_days_from_monday())
            .unwrap_or(u32::MAX)
    });
    hours
}
