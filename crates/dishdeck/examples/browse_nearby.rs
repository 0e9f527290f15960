//! Browse the first few restaurants near a coordinate.
//!
//! ```sh
//! YELP_API_KEY=... cargo run --example browse_nearby -- 37.7749 -122.4194 sushi
//! ```
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dishdeck::search::{Coordinate, RestaurantCategory, SortKey, YelpClient};
use dishdeck::{BrowseConfig, BrowseController, BrowseSession, FixedLocationProvider};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<()> {
    dishdeck::init_logging(Level::INFO)?;

    let mut args = std::env::args().skip(1);
    let latitude: f64 = args.next().as_deref().unwrap_or("37.7749").parse()?;
    let longitude: f64 = args.next().as_deref().unwrap_or("-122.4194").parse()?;
    let category = args
        .next()
        .map(|raw| raw.parse::<RestaurantCategory>())
        .transpose()?;

    let search = YelpClient::from_env().context("YELP_API_KEY must be set")?;
    let location = FixedLocationProvider::new(Coordinate::new(latitude, longitude));
    let config = BrowseConfig::builder().cooldown(Duration::from_millis(50)).build();

    let controller = BrowseController::builder(Arc::new(location), Arc::new(search))
        .config(config)
        .build();
    let (handle, task) = BrowseSession::spawn(controller);

    handle.set_filter(Some(SortKey::Distance), category)?;
    let snapshot = handle.wait_for(|s| s.phase.is_settled() && !s.is_loading).await?;
    if let Some(message) = &snapshot.error_message {
        info!(reason = %message, "Nothing to browse");
        return Ok(());
    }

    for _ in 0..5 {
        let snapshot = handle.snapshot();
        if let Some(restaurant) = snapshot.current() {
            println!(
                "{:>3}. {} {} stars, {} mi",
                snapshot.position + 1,
                restaurant.display_name(),
                restaurant.formatted_rating(),
                restaurant.formatted_distance_miles()
            );
        }
        handle.advance()?;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    drop(handle);
    let controller = task.await?;
    info!(loaded = controller.restaurants().len(), "Done");
    Ok(())
}
