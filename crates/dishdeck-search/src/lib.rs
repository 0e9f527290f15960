//! Business search for the dishdeck restaurant browser.
//!
//! This crate holds the data model shared across the workspace and the
//! [`SearchProvider`] abstraction the browse controller pages through. With the
//! default `yelp` feature it also provides [`YelpClient`], an HTTP implementation
//! backed by the Yelp Fusion `businesses/search` endpoint.
//!
//! ```rust,no_run
//! # #[cfg(feature = "yelp")]
//! # async fn demo() -> dishdeck_search::Result<()> {
//! use dishdeck_search::{Coordinate, SearchProvider, SortKey, YelpClient};
//!
//! // Reads YELP_API_KEY from the environment
//! let client = YelpClient::from_env()?;
//! let page = client
//!     .fetch_results(Coordinate::new(37.7749, -122.4194), Some(SortKey::Distance), None, 0)
//!     .await?;
//! println!("{} restaurants nearby", page.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod model;
mod provider;
#[cfg(feature = "yelp")]
mod yelp;

pub use config::{
    API_KEY_ENV, BASE_URL_ENV, ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT, REQUEST_TIMEOUT_ENV,
};
pub use error::{NetworkError, ParseTagError, Result, SearchDomainError, SearchError};
pub use model::{Coordinate, Restaurant, RestaurantCategory, SortKey};
pub use provider::{PAGE_SIZE, SearchProvider};
#[cfg(feature = "yelp")]
pub use yelp::{YelpClient, interpret_response};
