//! Location acquisition.
//!
//! The browse controller only needs one thing from the platform: a recent
//! coordinate, or a clear statement that it will never get one. Platform
//! adapters push authorization changes and fixes into a [`LocationFeed`];
//! [`FeedLocationProvider`] turns that feed into a bounded, one-shot fetch.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dishdeck_search::Coordinate;
use thiserror::Error;

mod feed;
mod fixed;

pub use feed::{FeedLocationProvider, LocationFeed};
pub use fixed::FixedLocationProvider;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Timed out waiting for a location fix")]
    Timeout,
    #[error("Unknown location error")]
    Unknown,
    #[error("No nearby results")]
    NoNearbyResults,
    #[error("Location unknown")]
    LocationUnknown,
}

/// Authorization state reported by the platform location subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    /// The user has not answered the permission prompt yet
    #[default]
    NotDetermined,
    /// Denied by the user or restricted by policy
    Denied,
    Authorized,
}

/// A coordinate reported by the platform together with when it was measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    pub fn new(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }

    /// A fix measured right now.
    pub fn now(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Utc::now())
    }

    /// Whether the fix was measured no more than `max_age` before `now`.
    #[must_use]
    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        chrono::Duration::from_std(max_age).is_ok_and(|max_age| age <= max_age)
    }
}

/// A best-effort, single-shot source of the device coordinate.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn fetch_location(&self) -> Result<Coordinate, LocationError>;
}
