mod orders;
mod webhook;

pub use orders::*;
pub use webhook::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

async fn liveness() -> &'static str {
    "Pen inventory backend is live."
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/temp-save", post(temp_save))
        .route("/temp-order/{temp_order_id}", get(get_temp_order))
        .route("/log", post(log_order))
        .route("/payment-webhook", post(payment_webhook))
}
