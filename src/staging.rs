//! In-process staging of customizations pending payment confirmation.
//!
//! Staged orders are keyed by a generated opaque id and live only for the
//! lifetime of the process. The webhook path consumes entries through
//! [`StagingStore::take`], a single atomic remove-and-return, so two
//! concurrent payment notifications for the same id cannot both finalize.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Customization, CustomizationDraft};

#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Validate and store a customization, returning its fresh opaque id.
    async fn stage(&self, draft: CustomizationDraft) -> Result<String>;

    /// Pure lookup, no side effect.
    async fn get(&self, id: &str) -> Result<Customization>;

    /// Atomically remove and return an entry. At most one caller can
    /// succeed per staged order.
    async fn take(&self, id: &str) -> Result<Customization>;

    /// Put an entry back under its original id after a failed finalize,
    /// so a retried webhook can attempt it again.
    async fn restore(&self, id: &str, customization: Customization);

    /// Idempotent delete; absent ids are a no-op.
    async fn remove(&self, id: &str);
}

/// Process-local staging store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStaging {
    orders: Mutex<HashMap<String, Customization>>,
}

impl MemoryStaging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StagingStore for MemoryStaging {
    async fn stage(&self, draft: CustomizationDraft) -> Result<String> {
        let customization = draft.validate()?;
        let id = Uuid::new_v4().to_string();
        self.orders.lock().await.insert(id.clone(), customization);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Customization> {
        self.orders
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Temp order not found".into()))
    }

    async fn take(&self, id: &str) -> Result<Customization> {
        self.orders
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| AppError::NotFound("Temp order not found".into()))
    }

    async fn restore(&self, id: &str, customization: Customization) {
        self.orders
            .lock()
            .await
            .insert(id.to_string(), customization);
    }

    async fn remove(&self, id: &str) {
        self.orders.lock().await.remove(id);
    }
}
