//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppError,
    application::csrf::{self, CSRF_COOKIE, CSRF_HEADER},
};

/// JSON body whose rejections use the API's error shape (400 + `{"error"}`).
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::InvalidInput(rejection.body_text())),
        }
    }
}

/// Proof that the request carried a valid `x-csrf-token` header (and a
/// matching cookie, if it sent one). Required by every state-changing handler.
#[derive(Debug, Clone, Copy)]
pub struct CsrfVerified;

impl FromRequestParts<AppState> for CsrfVerified {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.csrf_enforce {
            return Ok(CsrfVerified);
        }

        let header = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok());
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(CSRF_COOKIE).map(|c| c.value().to_owned());

        csrf::verify_request(
            header,
            cookie.as_deref(),
            &state.config.csrf_secret,
            state.config.csrf_token_ttl,
        )?;
        Ok(CsrfVerified)
    }
}
