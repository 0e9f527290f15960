//! The card-stack browse state machine.

mod controller;
mod error;
mod state;
mod window;

pub use controller::{
    AppendOutcome, AppendRequest, BrowseController, BrowseControllerBuilder, Navigation,
};
pub use error::BrowseError;
pub use state::{BrowsePhase, BrowseSnapshot, FilterState};
pub use window::{CardPhase, CardWindow};
