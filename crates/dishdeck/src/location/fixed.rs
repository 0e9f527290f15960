use async_trait::async_trait;
use dishdeck_search::Coordinate;

use super::{LocationError, LocationProvider};

/// Always reports the same coordinate. Useful where no geolocation exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocationProvider {
    coordinate: Coordinate,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn fetch_location(&self) -> Result<Coordinate, LocationError> {
        Ok(self.coordinate)
    }
}
