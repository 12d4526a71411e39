//! Inventory counters in the external Firebase Realtime Database.
//!
//! Counters live at `pens/<penId>` and `trinkets/<trinketId>/quantity`.
//! A decrement treats an absent counter as zero, so decrementing a key that
//! was never stocked yields -1 rather than an error. Each decrement is a
//! single-key compare-and-swap; there is no atomicity across counters.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Customization;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Decrement a counter by one, absent-as-zero, returning the new value.
    async fn decrement(&self, key: &str) -> Result<i64>;
}

pub fn pen_key(pen: &str) -> String {
    format!("pens/{}", pen)
}

pub fn trinket_key(trinket_id: &str) -> String {
    format!("trinkets/{}/quantity", trinket_id)
}

/// Decrement the pen counter and every trinket counter for one order.
///
/// Each counter is an independent read-modify-write; a failure partway
/// through leaves earlier decrements in place with no compensation.
pub async fn decrement_for_order(
    store: &dyn InventoryStore,
    customization: &Customization,
) -> Result<()> {
    store.decrement(&pen_key(&customization.pen)).await?;
    for trinket in &customization.trinkets {
        store.decrement(&trinket_key(&trinket.id)).await?;
    }
    Ok(())
}

/// Inventory store over the Firebase RTDB REST API, using ETag-conditional
/// writes as the per-key transaction primitive.
#[derive(Debug, Clone)]
pub struct FirebaseInventory {
    client: Client,
    base_url: String,
    auth: Option<String>,
}

impl FirebaseInventory {
    /// Firebase's own SDK retries transactions up to 25 times.
    const MAX_CAS_ATTEMPTS: u32 = 25;

    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.firebase_database_url.trim_end_matches('/').to_string(),
            auth: config.firebase_auth.clone(),
        }
    }

    fn key_url(&self, key: &str) -> String {
        match &self.auth {
            Some(auth) => format!("{}/{}.json?auth={}", self.base_url, key, auth),
            None => format!("{}/{}.json", self.base_url, key),
        }
    }
}

fn parse_counter(value: &serde_json::Value) -> i64 {
    // Null means the counter was never written; treat as zero.
    value.as_i64().unwrap_or(0)
}

#[async_trait]
impl InventoryStore for FirebaseInventory {
    async fn decrement(&self, key: &str) -> Result<i64> {
        let url = self.key_url(key);

        let response = self
            .client
            .get(&url)
            .header("X-Firebase-ETag", "true")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!(
                "inventory read failed for {}: {} {}",
                key, status, body
            )));
        }

        let mut etag = response
            .headers()
            .get("ETag")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                AppError::Collaborator(format!("inventory read for {} returned no ETag", key))
            })?;
        let mut current = parse_counter(&response.json::<serde_json::Value>().await?);

        for _ in 0..Self::MAX_CAS_ATTEMPTS {
            let next = current - 1;
            let response = self
                .client
                .put(&url)
                .header("if-match", &etag)
                .json(&next)
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => return Ok(next),
                // A concurrent writer won the race; the 412 response carries
                // the current value and a fresh ETag to retry against.
                StatusCode::PRECONDITION_FAILED => {
                    etag = response
                        .headers()
                        .get("ETag")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from)
                        .ok_or_else(|| {
                            AppError::Collaborator(format!(
                                "inventory conflict for {} returned no ETag",
                                key
                            ))
                        })?;
                    current = parse_counter(&response.json::<serde_json::Value>().await?);
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::Collaborator(format!(
                        "inventory write failed for {}: {} {}",
                        key, status, body
                    )));
                }
            }
        }

        Err(AppError::Collaborator(format!(
            "inventory decrement for {} gave up after {} contended attempts",
            key,
            Self::MAX_CAS_ATTEMPTS
        )))
    }
}
