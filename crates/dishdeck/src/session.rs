//! Actor that owns a [`BrowseController`] on a background task.
//!
//! The controller itself is a plain `&mut self` state machine. A session runs it
//! on a tokio task, feeds it [`BrowseCommand`]s from any number of
//! [`BrowseHandle`]s and polls prefetch requests alongside the command queue, so
//! navigation stays responsive while the next page loads.

use dishdeck_search::{RestaurantCategory, SortKey};
use futures::FutureExt;
use futures::future::{BoxFuture, OptionFuture};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::browse::{
    AppendOutcome, AppendRequest, BrowseController, BrowseSnapshot, FilterState,
};
use crate::error::{DishdeckError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    LoadInitial,
    Retry,
    Relocate,
    SetFilter(FilterState),
    Advance,
    Retreat,
    ToggleFavorite(String),
    ClearError,
}

pub struct BrowseSession;

impl BrowseSession {
    /// Move `controller` onto a new task.
    ///
    /// The task ends once every handle is dropped and gives the controller back.
    /// Must be called from within a tokio runtime.
    pub fn spawn(controller: BrowseController) -> (BrowseHandle, JoinHandle<BrowseController>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let snapshots = controller.subscribe();
        let task = tokio::spawn(run(controller, receiver));
        (
            BrowseHandle {
                commands,
                snapshots,
            },
            task,
        )
    }
}

async fn run(
    mut controller: BrowseController,
    mut commands: mpsc::UnboundedReceiver<BrowseCommand>,
) -> BrowseController {
    info!("Browse session started");
    let mut append: Option<BoxFuture<'static, AppendOutcome>> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                debug!(?command, "Handling command");
                if let Some(request) = apply(&mut controller, command).await {
                    append = Some(request.run().boxed());
                }
                // A reload invalidates whatever page was still loading
                if !controller.has_append_in_flight() {
                    append = None;
                }
            }
            Some(outcome) = OptionFuture::from(append.as_mut()), if append.is_some() => {
                append = None;
                controller.finish_append(outcome);
            }
        }
    }

    info!("Browse session stopped");
    controller
}

async fn apply(controller: &mut BrowseController, command: BrowseCommand) -> Option<AppendRequest> {
    match command {
        BrowseCommand::LoadInitial => controller.load_initial().await,
        BrowseCommand::Retry => controller.retry().await,
        BrowseCommand::Relocate => controller.relocate().await,
        BrowseCommand::SetFilter(filter) => {
            controller.set_filter(filter.sort_key, filter.category).await;
        }
        BrowseCommand::Advance => return controller.advance().into_prefetch(),
        BrowseCommand::Retreat => return controller.retreat().into_prefetch(),
        BrowseCommand::ToggleFavorite(id) => {
            controller.toggle_favorite(&id);
        }
        BrowseCommand::ClearError => controller.clear_error(),
    }
    None
}

/// Cloneable front end of a running [`BrowseSession`].
#[derive(Debug, Clone)]
pub struct BrowseHandle {
    commands: mpsc::UnboundedSender<BrowseCommand>,
    snapshots: watch::Receiver<BrowseSnapshot>,
}

impl BrowseHandle {
    pub fn send(&self, command: BrowseCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| DishdeckError::SessionClosed)
    }

    pub fn load_initial(&self) -> Result<()> {
        self.send(BrowseCommand::LoadInitial)
    }

    pub fn retry(&self) -> Result<()> {
        self.send(BrowseCommand::Retry)
    }

    pub fn relocate(&self) -> Result<()> {
        self.send(BrowseCommand::Relocate)
    }

    pub fn set_filter(
        &self,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
    ) -> Result<()> {
        self.send(BrowseCommand::SetFilter(FilterState::new(sort_key, category)))
    }

    pub fn advance(&self) -> Result<()> {
        self.send(BrowseCommand::Advance)
    }

    pub fn retreat(&self) -> Result<()> {
        self.send(BrowseCommand::Retreat)
    }

    pub fn toggle_favorite(&self, id: impl Into<String>) -> Result<()> {
        self.send(BrowseCommand::ToggleFavorite(id.into()))
    }

    pub fn clear_error(&self) -> Result<()> {
        self.send(BrowseCommand::ClearError)
    }

    #[must_use]
    pub fn snapshot(&self) -> BrowseSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until the published state satisfies `predicate`, checking the
    /// current state first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&BrowseSnapshot) -> bool,
    ) -> Result<BrowseSnapshot> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| DishdeckError::SessionClosed)?;
        Ok(snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::testing::{PagedSearch, SF, ScriptedLocation};

    const PAST_COOLDOWN: Duration = Duration::from_millis(301);

    type Spawned = (BrowseHandle, JoinHandle<BrowseController>, Arc<PagedSearch>);

    fn spawn_session(total: usize, latency: Duration) -> Spawned {
        let search = PagedSearch::with_latency(total, latency);
        let controller =
            BrowseController::builder(ScriptedLocation::at(SF), search.clone()).build();
        let (handle, task) = BrowseSession::spawn(controller);
        (handle, task, search)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_loads_and_navigates() {
        let (handle, _task, _search) = spawn_session(100, Duration::ZERO);

        handle.load_initial().unwrap();
        let snapshot = handle.wait_for(|s| s.phase.is_settled()).await.unwrap();
        assert_eq!(snapshot.restaurants.len(), 20);

        handle.advance().unwrap();
        let snapshot = handle.wait_for(|s| s.position == 1).await.unwrap();
        assert_eq!(snapshot.current().map(|r| r.id.as_str()), Some("r1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_continues_while_page_loads() {
        let (handle, _task, search) = spawn_session(100, Duration::from_secs(2));

        handle.load_initial().unwrap();
        handle
            .wait_for(|s| s.phase.is_settled() && !s.is_loading)
            .await
            .unwrap();

        for expected in 1..=11 {
            handle.advance().unwrap();
            handle.wait_for(|s| s.position == expected).await.unwrap();
            tokio::time::sleep(PAST_COOLDOWN).await;
        }

        // The page requested at position 10 is still loading
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.restaurants.len(), 20);
        assert!(snapshot.is_loading);

        let snapshot = handle
            .wait_for(|s| s.restaurants.len() == 40)
            .await
            .unwrap();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.position, 11);
        assert_eq!(search.offsets(), vec![0, 20]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_closed_session() {
        let (handle, task, _search) = spawn_session(10, Duration::ZERO);
        task.abort();
        let _ = task.await;

        assert!(matches!(
            handle.advance(),
            Err(DishdeckError::SessionClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_returns_controller() {
        let (handle, task, _search) = spawn_session(10, Duration::ZERO);
        handle.load_initial().unwrap();
        handle.toggle_favorite("r0").unwrap();
        drop(handle);

        let controller = task.await.unwrap();
        assert_eq!(controller.restaurants().len(), 10);
        assert!(controller.is_favorite("r0"));
    }
}
