//! Data model shared by the search client and the browse controller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseTagError;

const METERS_PER_MILE: f64 = 1609.0;

/// A point on the earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// A business returned by the search endpoint.
///
/// Only `id` is guaranteed; every other field may be missing from the
/// payload and the display helpers fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Stable, unique business identifier
    pub id: String,
    pub name: Option<String>,
    /// Average rating in `[0, 5]`
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    /// Distance from the search coordinate in meters
    #[serde(rename = "distance")]
    pub distance_meters: Option<f64>,
}

impl Restaurant {
    /// Create a restaurant with only its identity set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            rating: None,
            image_url: None,
            distance_meters: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Rating with one decimal place, `"0.0"` when absent.
    #[must_use]
    pub fn formatted_rating(&self) -> String {
        format!("{:.1}", self.rating.unwrap_or(0.0))
    }

    /// Distance in miles with one decimal place, `"0.0"` when absent.
    #[must_use]
    pub fn formatted_distance_miles(&self) -> String {
        self.distance_meters
            .map_or_else(|| "0.0".to_string(), |m| format!("{:.1}", m / METERS_PER_MILE))
    }

    /// Rating rounded to the nearest half star, clamped to `[0, 5]`.
    #[must_use]
    pub fn rating_step(&self) -> f64 {
        self.rating
            .map_or(0.0, |rating| ((rating * 2.0).round() / 2.0).clamp(0.0, 5.0))
    }
}

/// Result ordering supported by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Distance,
    Rating,
}

impl SortKey {
    pub const ALL: [Self; 2] = [Self::Distance, Self::Rating];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

/// Fixed set of category tags the browser can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestaurantCategory {
    Pizza,
    Burger,
    Ramen,
    Sushi,
    Vegetarian,
    Breakfast,
    Mexican,
    Chinese,
    Steakhouse,
    Seafood,
    Bar,
    Salad,
}

impl RestaurantCategory {
    pub const ALL: [Self; 12] = [
        Self::Pizza,
        Self::Burger,
        Self::Ramen,
        Self::Sushi,
        Self::Vegetarian,
        Self::Breakfast,
        Self::Mexican,
        Self::Chinese,
        Self::Steakhouse,
        Self::Seafood,
        Self::Bar,
        Self::Salad,
    ];

    /// Tag sent as the `categories` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Burger => "burger",
            Self::Ramen => "ramen",
            Self::Sushi => "sushi",
            Self::Vegetarian => "vegetarian",
            Self::Breakfast => "breakfast",
            Self::Mexican => "mexican",
            Self::Chinese => "chinese",
            Self::Steakhouse => "steakhouse",
            Self::Seafood => "seafood",
            Self::Bar => "bar",
            Self::Salad => "salad",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Pizza => "🍕",
            Self::Burger => "🍔",
            Self::Ramen => "🍜",
            Self::Sushi => "🍣",
            Self::Vegetarian => "🥦",
            Self::Breakfast => "🥞",
            Self::Mexican => "🌮",
            Self::Chinese => "🥡",
            Self::Steakhouse => "🥩",
            Self::Seafood => "🐟",
            Self::Bar => "🍻",
            Self::Salad => "🥗",
        }
    }
}

impl fmt::Display for RestaurantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestaurantCategory {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_decodes_with_missing_fields() {
        let restaurant: Restaurant = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(restaurant, Restaurant::new("abc"));
        assert_eq!(restaurant.display_name(), "Unknown");
        assert_eq!(restaurant.formatted_rating(), "0.0");
        assert_eq!(restaurant.formatted_distance_miles(), "0.0");
        assert_eq!(restaurant.rating_step(), 0.0);
    }

    #[test]
    fn test_restaurant_decodes_wire_names() {
        let restaurant: Restaurant = serde_json::from_str(
            r#"{
                "id": "golden-spoon",
                "name": "The Golden Spoon",
                "rating": 4.5,
                "image_url": "https://example.com/a.jpg",
                "distance": 3218.0,
                "review_count": 120
            }"#,
        )
        .unwrap();

        assert_eq!(restaurant.display_name(), "The Golden Spoon");
        assert_eq!(restaurant.image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(restaurant.distance_meters, Some(3218.0));
        assert_eq!(restaurant.formatted_distance_miles(), "2.0");
        assert_eq!(restaurant.formatted_rating(), "4.5");
    }

    #[test]
    fn test_rating_step_rounds_to_half_stars() {
        assert_eq!(Restaurant::new("a").with_rating(4.3).rating_step(), 4.5);
        assert_eq!(Restaurant::new("a").with_rating(4.2).rating_step(), 4.0);
        assert_eq!(Restaurant::new("a").with_rating(0.2).rating_step(), 0.0);
        assert_eq!(Restaurant::new("a").with_rating(7.0).rating_step(), 5.0);
    }

    #[test]
    fn test_sort_key_round_trip_through_str() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(" Rating ".parse::<SortKey>().unwrap(), SortKey::Rating);
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "steakhouse".parse::<RestaurantCategory>().unwrap(),
            RestaurantCategory::Steakhouse
        );
        let err = "tapas".parse::<RestaurantCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: 'tapas'");
    }

    #[test]
    fn test_category_wire_tags_are_unique() {
        let mut tags: Vec<_> = RestaurantCategory::ALL.iter().map(|c| c.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), RestaurantCategory::ALL.len());
    }
}
