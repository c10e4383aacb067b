use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{
        app_error_impl::{error_body, log_error, status_for},
        app_state::AppState,
        extract::{CsrfVerified, JsonBody},
    },
    app_error::{AppError, AppResult},
    application::{
        use_cases::moderation::{BanInfo, BannedUser},
        validators::{normalize_reason, require_id, validate_ban_hours},
    },
};

#[derive(Deserialize)]
struct UserIdPayload {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct UnbanPayload {
    #[serde(default)]
    admin_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct BanPayload {
    #[serde(default)]
    admin_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    duration_hours: Option<i64>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Serialize)]
struct BanStatusResponse {
    is_banned: bool,
}

#[derive(Serialize)]
struct BanInfoResponse {
    ban_info: Option<BanInfo>,
}

#[derive(Serialize)]
struct BannedUsersResponse {
    banned_users: Vec<BannedUser>,
}

#[derive(Serialize)]
struct ModerationActionResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    banned_until: Option<DateTime<Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-ban-status", post(check_ban_status))
        .route("/get-ban-info", post(get_ban_info))
        .route("/get-banned-users", post(get_banned_users))
        .route("/unban-user", post(unban_user))
        .route("/ban-user", post(ban_user))
}

/// POST /api/check-ban-status
/// Every response carries `is_banned`; failures default it to false and add `error`.
async fn check_ban_status(
    State(app_state): State<AppState>,
    payload: Result<JsonBody<UserIdPayload>, AppError>,
) -> Response {
    let result = async {
        let JsonBody(payload) = payload?;
        let user_id = require_id("user_id", payload.user_id.as_deref())?;
        app_state
            .moderation_use_cases
            .check_ban_status(user_id)
            .await
    }
    .await;

    match result {
        Ok(is_banned) => Json(BanStatusResponse { is_banned }).into_response(),
        Err(err) => {
            log_error(&err);
            let mut body = error_body(&err);
            body["is_banned"] = serde_json::Value::Bool(false);
            (status_for(&err), Json(body)).into_response()
        }
    }
}

/// POST /api/get-ban-info
async fn get_ban_info(
    State(app_state): State<AppState>,
    JsonBody(payload): JsonBody<UserIdPayload>,
) -> AppResult<impl IntoResponse> {
    let user_id = require_id("user_id", payload.user_id.as_deref())?;
    let ban_info = app_state.moderation_use_cases.get_ban_info(user_id).await?;
    Ok(Json(BanInfoResponse { ban_info }))
}

/// POST /api/get-banned-users
/// Takes no parameters; any body is ignored.
async fn get_banned_users(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let banned_users = app_state.moderation_use_cases.list_banned_users().await?;
    Ok(Json(BannedUsersResponse { banned_users }))
}

/// POST /api/unban-user
async fn unban_user(
    State(app_state): State<AppState>,
    _csrf: CsrfVerified,
    JsonBody(payload): JsonBody<UnbanPayload>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_id("admin_id", payload.admin_id.as_deref())?;
    let user_id = require_id("user_id", payload.user_id.as_deref())?;

    app_state
        .moderation_use_cases
        .unban_user(admin_id, user_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ModerationActionResponse {
            success: true,
            message: "User has been unbanned successfully",
            banned_until: None,
        }),
    ))
}

/// POST /api/ban-user
async fn ban_user(
    State(app_state): State<AppState>,
    _csrf: CsrfVerified,
    JsonBody(payload): JsonBody<BanPayload>,
) -> AppResult<impl IntoResponse> {
    let admin_id = require_id("admin_id", payload.admin_id.as_deref())?;
    let user_id = require_id("user_id", payload.user_id.as_deref())?;
    let hours = validate_ban_hours(payload.duration_hours)?;
    let reason = normalize_reason(payload.reason.as_deref())?;

    let banned_until = app_state
        .moderation_use_cases
        .ban_user(admin_id, user_id, hours, reason)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ModerationActionResponse {
            success: true,
            message: "User has been banned successfully",
            banned_until: Some(banned_until),
        }),
    ))
}
