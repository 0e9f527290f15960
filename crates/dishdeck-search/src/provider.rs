use async_trait::async_trait;

use crate::{Coordinate, RestaurantCategory, SortKey, error::Result, model::Restaurant};

/// Number of restaurants requested per page.
pub const PAGE_SIZE: usize = 20;

/// A paginated source of nearby restaurants.
///
/// `offset` is the zero-based index into the remote ordering at which the page
/// starts; a page holds at most [`PAGE_SIZE`] entries.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch_results(
        &self,
        coordinate: Coordinate,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
        offset: usize,
    ) -> Result<Vec<Restaurant>>;
}
