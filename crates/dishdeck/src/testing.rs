use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dishdeck_search::{
    Coordinate, PAGE_SIZE, Restaurant, RestaurantCategory, SearchDomainError, SearchProvider,
    SortKey,
};

use crate::browse::FilterState;
use crate::location::{LocationError, LocationProvider};

pub const SF: Coordinate = Coordinate::new(37.7749, -122.4194);

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub offset: usize,
    pub filter: FilterState,
}

/// Serves `total` restaurants with ids `r0..r{total}` in pages of [`PAGE_SIZE`].
#[derive(Debug, Default)]
pub struct PagedSearch {
    total: usize,
    latency: Duration,
    calls: Mutex<Vec<SearchCall>>,
    failure: Mutex<Option<SearchDomainError>>,
}

impl PagedSearch {
    pub fn new(total: usize) -> Arc<Self> {
        Self::with_latency(total, Duration::ZERO)
    }

    pub fn with_latency(total: usize, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            total,
            latency,
            ..Self::default()
        })
    }

    pub fn fail_with(&self, err: SearchDomainError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.calls().into_iter().map(|call| call.offset).collect()
    }
}

#[async_trait]
impl SearchProvider for PagedSearch {
    async fn fetch_results(
        &self,
        _coordinate: Coordinate,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
        offset: usize,
    ) -> dishdeck_search::Result<Vec<Restaurant>> {
        self.calls.lock().unwrap().push(SearchCall {
            offset,
            filter: FilterState::new(sort_key, category),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err.into());
        }
        let end = (offset + PAGE_SIZE).min(self.total);
        Ok((offset..end)
            .map(|i| Restaurant::new(format!("r{i}")).with_name(format!("Restaurant {i}")))
            .collect())
    }
}

#[derive(Debug)]
pub struct ScriptedLocation {
    result: Result<Coordinate, LocationError>,
    calls: AtomicUsize,
}

impl ScriptedLocation {
    pub fn at(coordinate: Coordinate) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(coordinate),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: LocationError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn fetch_location(&self) -> Result<Coordinate, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}
