use dishdeck_search::{Coordinate, Restaurant, RestaurantCategory, SortKey};
use serde::{Deserialize, Serialize};

use super::window::CardWindow;

/// Active sort and category selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub sort_key: Option<SortKey>,
    pub category: Option<RestaurantCategory>,
}

impl FilterState {
    pub fn new(sort_key: Option<SortKey>, category: Option<RestaurantCategory>) -> Self {
        Self { sort_key, category }
    }
}

/// Where the controller is in its fetch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowsePhase {
    #[default]
    Idle,
    Locating,
    Searching,
    Ready,
    /// The search succeeded but found nothing nearby
    Empty,
    Failed,
}

impl BrowsePhase {
    /// True once an attempt has finished, successfully or not.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Empty | Self::Failed)
    }
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BrowseSnapshot {
    pub phase: BrowsePhase,
    pub coordinate: Option<Coordinate>,
    pub filter: FilterState,
    pub restaurants: Vec<Restaurant>,
    pub position: usize,
    pub window: CardWindow,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub current_is_favorite: bool,
}

impl BrowseSnapshot {
    #[must_use]
    pub fn current(&self) -> Option<&Restaurant> {
        self.restaurants.get(self.position)
    }
}
