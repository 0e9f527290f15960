use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use dishdeck_search::{
    Coordinate, PAGE_SIZE, Restaurant, RestaurantCategory, SearchError, SearchProvider, SortKey,
};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{BrowseError, BrowsePhase, BrowseSnapshot, CardWindow, FilterState};
use crate::{
    config::BrowseConfig,
    favorites::{FavoriteStore, InMemoryFavorites},
    location::{LocationError, LocationProvider},
};

/// Result of a navigation input.
///
/// A carried [`AppendRequest`] should be run and its outcome handed to
/// [`BrowseController::finish_append`]; dropping it cancels the prefetch.
#[derive(Debug)]
#[must_use]
pub enum Navigation {
    Moved {
        position: usize,
        /// Set when this move crossed the prefetch threshold
        prefetch: Option<AppendRequest>,
    },
    /// Ignored because it arrived within the cooldown of the last accepted move
    Debounced,
    /// The position is already at the end it moves towards. Advancing past the
    /// last card retries pagination, e.g. after a failed append.
    AtBoundary { prefetch: Option<AppendRequest> },
}

impl Navigation {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    pub fn into_prefetch(self) -> Option<AppendRequest> {
        match self {
            Self::Moved { prefetch, .. } | Self::AtBoundary { prefetch } => prefetch,
            Self::Debounced => None,
        }
    }
}

/// A page fetch that runs independently of the controller.
///
/// The request owns everything it needs, so it can be awaited on the side while
/// the controller keeps accepting navigation. The controller counts an append
/// as in flight only while the request or its [`AppendOutcome`] is alive, so
/// dropping either releases the slot for the next prefetch.
#[must_use = "dropping an append request cancels the prefetch"]
pub struct AppendRequest {
    search: Arc<dyn SearchProvider>,
    coordinate: Coordinate,
    filter: FilterState,
    offset: usize,
    generation: u64,
    ticket: Arc<()>,
}

impl fmt::Debug for AppendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendRequest")
            .field("coordinate", &self.coordinate)
            .field("filter", &self.filter)
            .field("offset", &self.offset)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl AppendRequest {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[instrument(
        name = "Append page",
        skip(self),
        fields(offset = self.offset, generation = self.generation),
        level = "debug"
    )]
    pub async fn run(self) -> AppendOutcome {
        let result = self
            .search
            .fetch_results(
                self.coordinate,
                self.filter.sort_key,
                self.filter.category,
                self.offset,
            )
            .await;
        AppendOutcome {
            generation: self.generation,
            offset: self.offset,
            result,
            ticket: self.ticket,
        }
    }
}

#[derive(Debug)]
#[must_use = "pass the outcome to BrowseController::finish_append"]
pub struct AppendOutcome {
    generation: u64,
    offset: usize,
    result: Result<Vec<Restaurant>, SearchError>,
    ticket: Arc<()>,
}

/// Stateful coordinator behind the card stack.
///
/// Owns the result list, the position in it and the active filter, and drives
/// the location and search providers. Every state change is published as a
/// [`BrowseSnapshot`] to subscribers.
pub struct BrowseController {
    location: Arc<dyn LocationProvider>,
    search: Arc<dyn SearchProvider>,
    favorites: Box<dyn FavoriteStore>,
    config: BrowseConfig,

    coordinate: Option<Coordinate>,
    filter: FilterState,
    restaurants: Vec<Restaurant>,
    ids: HashSet<String>,
    position: usize,
    phase: BrowsePhase,
    is_loading: bool,
    error_message: Option<String>,

    /// Number of remote results consumed so far; the next page starts here
    fetched: usize,
    /// The last page came back short, so there is nothing more to fetch
    exhausted: bool,
    /// Alive while the current append request or its outcome exists
    append_ticket: Weak<()>,
    /// Bumped whenever the result list is replaced
    generation: u64,
    last_navigation: Option<Instant>,

    snapshots: watch::Sender<BrowseSnapshot>,
}

impl BrowseController {
    pub fn builder(
        location: Arc<dyn LocationProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> BrowseControllerBuilder {
        BrowseControllerBuilder::new(location, search)
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseSnapshot> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> BrowseSnapshot {
        BrowseSnapshot {
            phase: self.phase,
            coordinate: self.coordinate,
            filter: self.filter,
            restaurants: self.restaurants.clone(),
            position: self.position,
            window: self.window(),
            is_loading: self.is_loading(),
            error_message: self.error_message.clone(),
            current_is_favorite: self
                .current()
                .is_some_and(|restaurant| self.favorites.is_favorite(&restaurant.id)),
        }
    }

    #[must_use]
    pub fn phase(&self) -> BrowsePhase {
        self.phase
    }

    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current(&self) -> Option<&Restaurant> {
        self.restaurants.get(self.position)
    }

    #[must_use]
    pub fn window(&self) -> CardWindow {
        CardWindow::around(self.position, self.restaurants.len())
    }

    #[must_use]
    pub fn filter(&self) -> FilterState {
        self.filter
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// True while the first page or an appended page is loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading || self.has_append_in_flight()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn has_append_in_flight(&self) -> bool {
        self.append_ticket.strong_count() > 0
    }

    /// Locate (once per session) and replace the result list with the first page.
    ///
    /// Never fails: errors end up in [`Self::error_message`] and
    /// [`BrowsePhase::Failed`]. Calling it again is the retry path.
    #[instrument(name = "Load restaurants", skip(self), fields(filter = ?self.filter), level = "info")]
    pub async fn load_initial(&mut self) {
        self.generation += 1;
        self.append_ticket = Weak::new();
        self.is_loading = true;
        self.error_message = None;
        self.publish();

        match self.fetch_first_page().await {
            Ok(page) => self.replace_results(page),
            Err(err) => {
                warn!(error = %err, "Fetch failed");
                self.clear_results();
                self.phase = BrowsePhase::Failed;
                self.error_message = Some(err.user_message());
            }
        }

        self.is_loading = false;
        self.publish();
    }

    /// Same as [`Self::load_initial`]; named for the user-facing retry action.
    pub async fn retry(&mut self) {
        self.load_initial().await;
    }

    /// Drop the cached coordinate and reload from a fresh location fix.
    pub async fn relocate(&mut self) {
        self.coordinate = None;
        self.load_initial().await;
    }

    /// Change sort and category. Returns `false` without fetching when the
    /// selection is unchanged.
    pub async fn set_filter(
        &mut self,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
    ) -> bool {
        let filter = FilterState::new(sort_key, category);
        if filter == self.filter {
            debug!(?filter, "Filter unchanged");
            return false;
        }

        info!(?filter, "Filter changed");
        self.filter = filter;
        self.clear_results();
        self.load_initial().await;
        true
    }

    pub fn advance(&mut self) -> Navigation {
        if self.position + 1 >= self.restaurants.len() {
            let prefetch = self.begin_append();
            if prefetch.is_some() {
                self.publish();
            }
            return Navigation::AtBoundary { prefetch };
        }
        if !self.accept_navigation() {
            return Navigation::Debounced;
        }

        self.position += 1;
        let prefetch = self.begin_append();
        self.publish();
        Navigation::Moved {
            position: self.position,
            prefetch,
        }
    }

    pub fn retreat(&mut self) -> Navigation {
        if self.position == 0 {
            return Navigation::AtBoundary { prefetch: None };
        }
        if !self.accept_navigation() {
            return Navigation::Debounced;
        }

        self.position -= 1;
        self.publish();
        Navigation::Moved {
            position: self.position,
            prefetch: None,
        }
    }

    /// Start fetching the next page if the position is within the prefetch
    /// threshold of the end of a loaded list and nothing else is loading.
    pub fn begin_append(&mut self) -> Option<AppendRequest> {
        if self.phase != BrowsePhase::Ready
            || self.is_loading
            || self.exhausted
            || self.has_append_in_flight()
        {
            return None;
        }
        if self.position + self.config.prefetch_threshold < self.restaurants.len() {
            return None;
        }
        let coordinate = self.coordinate?;

        let ticket = Arc::new(());
        self.append_ticket = Arc::downgrade(&ticket);
        info!(offset = self.fetched, "Prefetching next page");
        Some(AppendRequest {
            search: Arc::clone(&self.search),
            coordinate,
            filter: self.filter,
            offset: self.fetched,
            generation: self.generation,
            ticket,
        })
    }

    /// Apply a finished append. Pages from before the last list replacement
    /// are discarded.
    pub fn finish_append(&mut self, outcome: AppendOutcome) {
        let current = self
            .append_ticket
            .upgrade()
            .is_some_and(|ticket| Arc::ptr_eq(&ticket, &outcome.ticket));
        if outcome.generation != self.generation || !current {
            debug!(
                offset = outcome.offset,
                generation = outcome.generation,
                current_generation = self.generation,
                "Discarding page from a replaced result list"
            );
            return;
        }

        self.append_ticket = Weak::new();
        match outcome.result {
            Ok(page) => {
                self.fetched += page.len();
                self.exhausted = page.len() < PAGE_SIZE;
                let added = self.extend_unique(page);
                info!(
                    offset = outcome.offset,
                    added,
                    total = self.restaurants.len(),
                    "Appended page"
                );
            }
            Err(err) => {
                let err = BrowseError::from(err);
                warn!(offset = outcome.offset, error = %err, "Append failed");
                self.error_message = Some(err.user_message());
            }
        }
        self.publish();
    }

    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Flip the favorite flag of a restaurant and return the new value.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let favorite = self.favorites.toggle_favorite(id);
        debug!(id, favorite, "Favorite toggled");
        self.publish();
        favorite
    }

    pub fn clear_error(&mut self) {
        if self.error_message.take().is_some() {
            self.publish();
        }
    }

    async fn fetch_first_page(&mut self) -> Result<Vec<Restaurant>, BrowseError> {
        let coordinate = match self.coordinate {
            Some(coordinate) => coordinate,
            None => {
                self.phase = BrowsePhase::Locating;
                self.publish();
                let coordinate = self.location.fetch_location().await?;
                self.coordinate = Some(coordinate);
                coordinate
            }
        };

        self.phase = BrowsePhase::Searching;
        self.clear_results();
        self.publish();

        let page = self
            .search
            .fetch_results(coordinate, self.filter.sort_key, self.filter.category, 0)
            .await?;
        Ok(page)
    }

    fn replace_results(&mut self, page: Vec<Restaurant>) {
        self.clear_results();
        self.fetched = page.len();
        self.exhausted = page.len() < PAGE_SIZE;
        self.extend_unique(page);

        if self.restaurants.is_empty() {
            info!("No nearby restaurants");
            self.phase = BrowsePhase::Empty;
            self.error_message =
                Some(BrowseError::from(LocationError::NoNearbyResults).user_message());
        } else {
            info!(count = self.restaurants.len(), "Restaurants loaded");
            self.phase = BrowsePhase::Ready;
        }
    }

    fn clear_results(&mut self) {
        self.restaurants.clear();
        self.ids.clear();
        self.position = 0;
        self.fetched = 0;
        self.exhausted = false;
    }

    fn extend_unique(&mut self, page: Vec<Restaurant>) -> usize {
        let before = self.restaurants.len();
        for restaurant in page {
            if self.ids.insert(restaurant.id.clone()) {
                self.restaurants.push(restaurant);
            } else {
                debug!(id = %restaurant.id, "Dropping duplicate restaurant");
            }
        }
        self.restaurants.len() - before
    }

    fn accept_navigation(&mut self) -> bool {
        let now = Instant::now();
        if self
            .last_navigation
            .is_some_and(|last| now.duration_since(last) <= self.config.cooldown)
        {
            debug!("Navigation debounced");
            return false;
        }
        self.last_navigation = Some(now);
        true
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

/// Builder for [`BrowseController`].
pub struct BrowseControllerBuilder {
    location: Arc<dyn LocationProvider>,
    search: Arc<dyn SearchProvider>,
    favorites: Option<Box<dyn FavoriteStore>>,
    config: BrowseConfig,
    filter: FilterState,
}

impl BrowseControllerBuilder {
    pub fn new(location: Arc<dyn LocationProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            location,
            search,
            favorites: None,
            config: BrowseConfig::default(),
            filter: FilterState::default(),
        }
    }

    /// Store for favorite flags; defaults to [`InMemoryFavorites`]
    pub fn favorites(mut self, store: impl FavoriteStore + 'static) -> Self {
        self.favorites = Some(Box::new(store));
        self
    }

    pub fn config(mut self, config: BrowseConfig) -> Self {
        self.config = config;
        self
    }

    /// Filter used by the first load
    pub fn filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(self) -> BrowseController {
        let (snapshots, _) = watch::channel(BrowseSnapshot {
            filter: self.filter,
            ..BrowseSnapshot::default()
        });
        BrowseController {
            location: self.location,
            search: self.search,
            favorites: self
                .favorites
                .unwrap_or_else(|| Box::new(InMemoryFavorites::new())),
            config: self.config,
            coordinate: None,
            filter: self.filter,
            restaurants: Vec::new(),
            ids: HashSet::new(),
            position: 0,
            phase: BrowsePhase::Idle,
            is_loading: false,
            error_message: None,
            fetched: 0,
            exhausted: false,
            append_ticket: Weak::new(),
            generation: 0,
            last_navigation: None,
            snapshots,
        }
    }
}
