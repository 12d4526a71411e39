//! Test utilities and fixtures for Penfolio integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};

pub use penfolio::error::AppError;
pub use penfolio::inventory::{pen_key, trinket_key, InventoryStore};
pub use penfolio::models::*;
pub use penfolio::sheets::OrderLog;
pub use penfolio::staging::{MemoryStaging, StagingStore};
pub use penfolio::state::AppState;

/// In-memory stand-in for the Firebase inventory store. Counters behave
/// like the real thing: absent keys read as zero before the decrement.
#[derive(Default)]
pub struct FakeInventory {
    counters: Mutex<HashMap<String, i64>>,
    failing: AtomicBool,
}

impl FakeInventory {
    pub fn set(&self, key: &str, value: i64) {
        self.counters.lock().unwrap().insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.counters.lock().unwrap().get(key).copied()
    }

    /// Make every subsequent decrement fail, simulating a store outage.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl InventoryStore for FakeInventory {
    async fn decrement(&self, key: &str) -> Result<i64, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Collaborator("inventory store unavailable".into()));
        }
        let mut counters = self.counters.lock().unwrap();
        let entry = counters.entry(key.to_string()).or_insert(0);
        *entry -= 1;
        Ok(*entry)
    }
}

/// In-memory stand-in for the spreadsheet log. Rows are captured as
/// `(pen, joined trinket labels)`.
#[derive(Default)]
pub struct FakeLog {
    rows: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl FakeLog {
    pub fn rows(&self) -> Vec<(String, String)> {
        self.rows.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderLog for FakeLog {
    async fn append(&self, pen: &str, trinkets: &[TrinketRef]) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Collaborator("sheet append failed".into()));
        }
        self.rows
            .lock()
            .unwrap()
            .push((pen.to_string(), joined_labels(trinkets)));
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub staging: Arc<MemoryStaging>,
    pub inventory: Arc<FakeInventory>,
    pub log: Arc<FakeLog>,
}

/// Build the full router, with the same CORS layer the server applies,
/// over fake collaborators.
pub fn test_app() -> TestApp {
    let staging = Arc::new(MemoryStaging::new());
    let inventory = Arc::new(FakeInventory::default());
    let log = Arc::new(FakeLog::default());

    let state = AppState {
        staging: staging.clone(),
        inventory: inventory.clone(),
        log: log.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = penfolio::handlers::router().layer(cors).with_state(state);

    TestApp { app, staging, inventory, log }
}

/// Send a JSON POST and return the response status and raw body.
pub async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

/// Send a GET and return the response status and raw body.
pub async fn get(app: &Router, path: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes)
}

pub fn json(bytes: &Bytes) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("response body was not JSON")
}

/// Stage a customization and return its tempOrderId.
pub async fn stage_order(app: &Router, body: serde_json::Value) -> String {
    let (status, bytes) = post_json(app, "/temp-save", body).await;
    assert_eq!(status, StatusCode::OK);
    json(&bytes)["tempOrderId"]
        .as_str()
        .expect("missing tempOrderId")
        .to_string()
}
