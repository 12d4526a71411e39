use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::{Customization, CustomizationDraft, TempSaveResponse};
use crate::state::AppState;

/// POST /temp-save — stage a customization pending payment.
pub async fn temp_save(
    State(state): State<AppState>,
    Json(draft): Json<CustomizationDraft>,
) -> Result<Json<TempSaveResponse>> {
    let temp_order_id = state.staging.stage(draft).await?;

    tracing::info!("Saved customization for tempOrderId: {}", temp_order_id);

    Ok(Json(TempSaveResponse { temp_order_id }))
}

/// GET /temp-order/{temp_order_id} — retrieve a staged customization.
pub async fn get_temp_order(
    State(state): State<AppState>,
    Path(temp_order_id): Path<String>,
) -> Result<Json<Customization>> {
    let customization = state.staging.get(&temp_order_id).await?;
    Ok(Json(customization))
}

/// POST /log — append an order row directly, bypassing staging and
/// inventory. Used when finalization is driven externally.
pub async fn log_order(
    State(state): State<AppState>,
    Json(customization): Json<Customization>,
) -> Result<&'static str> {
    state
        .log
        .append(&customization.pen, &customization.trinkets)
        .await?;

    Ok("Logged")
}
