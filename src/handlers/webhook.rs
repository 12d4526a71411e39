use axum::{extract::State, Json};

use crate::error::{AppError, Result};
use crate::inventory;
use crate::models::{Customization, WebhookRequest, WebhookResponse};
use crate::state::AppState;

/// The only payment status that triggers finalization.
pub const PAYMENT_SUCCESS: &str = "success";

/// POST /payment-webhook — finalize a staged order on successful payment.
///
/// The status check runs before the existence lookup, so a non-success
/// notification is rejected even for ids that were never staged. The staged
/// entry is consumed atomically up front; if a collaborator call then fails
/// it is put back, leaving the order retryable by the processor's own
/// webhook retry policy.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>> {
    tracing::info!(
        "Webhook received: tempOrderId={} paymentStatus={}",
        request.temp_order_id,
        request.payment_status
    );

    if request.payment_status != PAYMENT_SUCCESS {
        return Err(AppError::PaymentRejected);
    }

    let customization = state.staging.take(&request.temp_order_id).await?;

    if let Err(e) = finalize(&state, &customization).await {
        state
            .staging
            .restore(&request.temp_order_id, customization)
            .await;
        tracing::error!(
            "Finalization failed for tempOrderId {}: {}",
            request.temp_order_id,
            e
        );
        return Err(e);
    }

    Ok(Json(WebhookResponse {
        message: "Inventory updated and order logged.".to_string(),
    }))
}

/// Decrement inventory, then append the log row. Counters already
/// decremented are not compensated when a later step fails.
async fn finalize(state: &AppState, customization: &Customization) -> Result<()> {
    inventory::decrement_for_order(state.inventory.as_ref(), customization).await?;
    state
        .log
        .append(&customization.pen, &customization.trinkets)
        .await?;
    Ok(())
}
