//! Dishdeck - Nearby Restaurant Card Stack
//!
//! Dishdeck is the core of a "swipe through restaurants near me" browser. It
//! locates the user, pages through a business search service and keeps a
//! position in the results that navigation inputs move back and forth. Pages are
//! prefetched before the user reaches the end of what is loaded, and every state
//! change is published as a [`BrowseSnapshot`] for a presentation layer to draw.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use dishdeck::search::{Coordinate, SortKey, YelpClient};
//! use dishdeck::{BrowseController, BrowseSession, FixedLocationProvider};
//!
//! # async fn demo() -> dishdeck::error::Result<()> {
//! let location = FixedLocationProvider::new(Coordinate::new(37.7749, -122.4194));
//! // Reads YELP_API_KEY from the environment
//! let search = YelpClient::from_env()?;
//!
//! let controller = BrowseController::builder(Arc::new(location), Arc::new(search)).build();
//! let (handle, _task) = BrowseSession::spawn(controller);
//!
//! handle.load_initial()?;
//! let snapshot = handle.wait_for(|s| s.phase.is_settled()).await?;
//! if let Some(restaurant) = snapshot.current() {
//!     println!("{} {}", restaurant.display_name(), restaurant.formatted_rating());
//! }
//!
//! handle.set_filter(Some(SortKey::Rating), None)?;
//! handle.advance()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Layout
//!
//! - [`location`]: one-shot location fetches with timeout and permission handling
//! - [`search`]: the business search data model and the Yelp client
//! - [`browse`]: the controller state machine, its errors and snapshots
//! - [`session`]: runs a controller on a background task behind cloneable handles
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod browse;
mod config;
pub mod error;
mod favorites;
pub mod location;
pub mod session;
#[cfg(test)]
mod testing;

pub use browse::{
    BrowseController, BrowseControllerBuilder, BrowseError, BrowsePhase, BrowseSnapshot,
    CardPhase, CardWindow, FilterState, Navigation,
};
pub use config::{BrowseConfig, BrowseConfigBuilder};
pub use dishdeck_search as search;
pub use error::DishdeckError;
pub use favorites::{FavoriteStore, InMemoryFavorites};
pub use location::{
    AuthorizationStatus, FeedLocationProvider, FixedLocationProvider, LocationError,
    LocationFeed, LocationFix, LocationProvider,
};
pub use session::{BrowseCommand, BrowseHandle, BrowseSession};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the library.
///
/// `RUST_LOG` takes precedence over `level` when set. Safe to call more than
/// once; only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use dishdeck::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), dishdeck::error::DishdeckError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), DishdeckError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))?;
        Ok(())
    })
}
