use std::sync::Arc;

use crate::inventory::InventoryStore;
use crate::sheets::OrderLog;
use crate::staging::StagingStore;

/// Application state holding the injected collaborators.
///
/// Everything behind a trait object so tests (and future durable backends)
/// can swap implementations without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub staging: Arc<dyn StagingStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub log: Arc<dyn OrderLog>,
}
