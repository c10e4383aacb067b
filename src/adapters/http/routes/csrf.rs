use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::csrf::{self, CSRF_COOKIE},
};

#[derive(Serialize)]
struct CsrfTokenResponse {
    csrf_token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/csrf-token", post(issue_token))
}

/// POST /api/csrf-token
/// The client echoes the body value in the `x-csrf-token` header. Same-origin
/// browsers also carry the cookie, which must then match the header.
async fn issue_token(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let token = csrf::issue(&app_state.config.csrf_secret)?;

    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(app_state.config.csrf_token_ttl)
        .build();

    tracing::debug!("Issued CSRF token");
    Ok((jar.add(cookie), Json(CsrfTokenResponse { csrf_token: token })))
}
