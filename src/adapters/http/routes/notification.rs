use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::json;

use crate::{
    adapters::http::{
        app_state::AppState,
        extract::{CsrfVerified, JsonBody},
    },
    app_error::AppResult,
    application::validators::require_id,
};

#[derive(Deserialize)]
struct MarkReadPayload {
    #[serde(default)]
    notification_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/mark-notification-read", post(mark_notification_read))
}

/// POST /api/mark-notification-read
async fn mark_notification_read(
    State(app_state): State<AppState>,
    _csrf: CsrfVerified,
    JsonBody(payload): JsonBody<MarkReadPayload>,
) -> AppResult<impl IntoResponse> {
    let notification_id = require_id("notification_id", payload.notification_id.as_deref())?;
    let notification = app_state
        .notification_use_cases
        .mark_read(notification_id)
        .await?;
    tracing::debug!(
        notification_id = %notification.id,
        recipient = %notification.user_id,
        "Notification marked read"
    );
    Ok(Json(json!({ "success": true })))
}
