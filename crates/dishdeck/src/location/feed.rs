use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dishdeck_search::Coordinate;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::{AuthorizationStatus, LocationError, LocationFix, LocationProvider};
use crate::config::BrowseConfig;

#[derive(Debug, Clone, Copy, Default)]
struct FeedState {
    authorization: AuthorizationStatus,
    fix: Option<LocationFix>,
}

/// Shared sink that a platform location adapter reports into.
///
/// Clones share the same underlying state. Fixes older than the configured
/// maximum age are dropped on arrival and never replace the reported fix. The
/// stored fix keeps its timestamp and is checked for age again on every fetch.
#[derive(Debug, Clone)]
pub struct LocationFeed {
    state: Arc<watch::Sender<FeedState>>,
    max_fix_age: Duration,
    timeout: Duration,
}

impl LocationFeed {
    /// A feed with the default location timeout.
    pub fn new(max_fix_age: Duration) -> Self {
        Self::with_limits(max_fix_age, BrowseConfig::default().location_timeout)
    }

    pub fn from_config(config: &BrowseConfig) -> Self {
        Self::with_limits(config.max_fix_age, config.location_timeout)
    }

    fn with_limits(max_fix_age: Duration, timeout: Duration) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            state: Arc::new(state),
            max_fix_age,
            timeout,
        }
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        info!(?status, "Location authorization changed");
        self.state
            .send_modify(|state| state.authorization = status);
    }

    /// Offer a new fix. Returns whether it was accepted.
    pub fn report_fix(&self, fix: LocationFix) -> bool {
        if !fix.is_fresh(self.max_fix_age, Utc::now()) {
            debug!(timestamp = %fix.timestamp, "Discarding stale location fix");
            return false;
        }
        self.state.send_modify(|state| state.fix = Some(fix));
        true
    }

    #[must_use]
    pub fn authorization(&self) -> AuthorizationStatus {
        self.state.borrow().authorization
    }

    /// Coordinate of the last accepted fix, whatever its age now.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.latest_fix().map(|fix| fix.coordinate)
    }

    #[must_use]
    pub fn latest_fix(&self) -> Option<LocationFix> {
        self.state.borrow().fix
    }

    /// A provider that waits on this feed for the configured location timeout.
    pub fn provider(&self) -> FeedLocationProvider {
        self.provider_with_timeout(self.timeout)
    }

    /// A provider that waits on this feed for at most `timeout`.
    pub fn provider_with_timeout(&self, timeout: Duration) -> FeedLocationProvider {
        FeedLocationProvider {
            feed: self.clone(),
            timeout,
        }
    }

    fn fresh_coordinate(&self, state: &FeedState) -> Option<Coordinate> {
        state
            .fix
            .filter(|fix| fix.is_fresh(self.max_fix_age, Utc::now()))
            .map(|fix| fix.coordinate)
    }
}

/// [`LocationProvider`] that resolves once the feed holds a fresh fix.
///
/// Denied authorization fails immediately. An undetermined authorization keeps
/// waiting, since the platform is presumably prompting the user.
#[derive(Debug, Clone)]
pub struct FeedLocationProvider {
    feed: LocationFeed,
    timeout: Duration,
}

#[async_trait]
impl LocationProvider for FeedLocationProvider {
    #[instrument(name = "Fetch location", skip(self), level = "info")]
    async fn fetch_location(&self) -> Result<Coordinate, LocationError> {
        if self.feed.authorization() == AuthorizationStatus::Denied {
            return Err(LocationError::PermissionDenied);
        }

        let mut updates = self.feed.state.subscribe();
        let wait = updates.wait_for(|state| {
            state.authorization == AuthorizationStatus::Denied
                || self.feed.fresh_coordinate(state).is_some()
        });

        match tokio::time::timeout(self.timeout, wait).await {
            Ok(Ok(state)) if state.authorization == AuthorizationStatus::Denied => {
                Err(LocationError::PermissionDenied)
            }
            // The predicate only accepted a fix that was fresh
            Ok(Ok(state)) => match state.fix {
                Some(fix) => {
                    info!(coordinate = %fix.coordinate, "Location resolved");
                    Ok(fix.coordinate)
                }
                None => Err(LocationError::Unknown),
            },
            Ok(Err(_closed)) => Err(LocationError::Unknown),
            Err(_elapsed) => {
                warn!(timeout = ?self.timeout, "Location fetch timed out");
                Err(LocationError::Timeout)
            }
        }
    }
}
