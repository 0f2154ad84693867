//! Tray state machine: the state, the effects it asks for, and the pure
//! reducer that connects them.

mod reducer;
mod state;

pub use reducer::update;
pub use state::{PageRequest, TrayState};

use crate::action::Scope;
use crate::types::MediaKind;

/// Async work requested by the reducer, performed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a page. With `cancel_in_flight` the fetch scope is restarted
    /// first; load-more leaves the current scope alone.
    FetchPage {
        generation: u64,
        request: PageRequest,
        cancel_in_flight: bool,
    },
    /// Load category chips, superseding any category load in flight.
    FetchCategories { generation: u64, kind: MediaKind },
    Cancel(Scope),
}
