//! Anti-forgery tokens.
//!
//! The server issues tokens of the form `<nonce>.<issued_at>.<hmac>` and
//! checks them on every state-changing request: the `x-csrf-token` header
//! must carry a token whose signature and age verify. Cross-origin clients
//! never send the `csrf_token` cookie; when it is present it must equal the
//! header. [`CsrfTokenStore`] is the per-session holder used by form
//! clients; its presence check is a convenience only.

use std::collections::BTreeMap;

use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::app_error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Hidden form field carrying the token.
pub const CSRF_FIELD: &str = "csrf_token";

pub fn issue(secret: &SecretString) -> AppResult<String> {
    issue_at(secret, OffsetDateTime::now_utc().unix_timestamp())
}

fn issue_at(secret: &SecretString, issued_at: i64) -> AppResult<String> {
    let nonce = generate_nonce();
    let payload = format!("{nonce}.{issued_at}");
    let signature = sign(secret, &payload)?;
    Ok(format!("{payload}.{signature}"))
}

/// Checks the header token, and the cookie against it when one was sent.
pub fn verify_request(
    header: Option<&str>,
    cookie: Option<&str>,
    secret: &SecretString,
    ttl: Duration,
) -> AppResult<()> {
    let Some(header) = header else {
        return Err(AppError::CsrfRejected);
    };
    if let Some(cookie) = cookie {
        if !bool::from(header.as_bytes().ct_eq(cookie.as_bytes())) {
            return Err(AppError::CsrfRejected);
        }
    }
    verify_at(header, secret, ttl, OffsetDateTime::now_utc().unix_timestamp())
}

fn verify_at(token: &str, secret: &SecretString, ttl: Duration, now: i64) -> AppResult<()> {
    let mut parts = token.rsplitn(2, '.');
    let (Some(signature), Some(payload)) = (parts.next(), parts.next()) else {
        return Err(AppError::CsrfRejected);
    };
    let issued_at: i64 = payload
        .split_once('.')
        .and_then(|(_, ts)| ts.parse().ok())
        .ok_or(AppError::CsrfRejected)?;

    let signature = hex::decode(signature).map_err(|_| AppError::CsrfRejected)?;
    let mut mac = new_mac(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AppError::CsrfRejected)?;

    let age = now - issued_at;
    if age < 0 || age > ttl.whole_seconds() {
        return Err(AppError::CsrfRejected);
    }
    Ok(())
}

fn sign(secret: &SecretString, payload: &str) -> AppResult<String> {
    let mut mac = new_mac(secret)?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn new_mac(secret: &SecretString) -> AppResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ============================================================================
// Client-side token holder
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("Security token missing. Please refresh the page and try again.")]
    MissingToken,
}

/// Per-session holder for a server-issued CSRF token. Filled at login,
/// passed to the forms that need it and cleared on logout.
#[derive(Debug, Default)]
pub struct CsrfTokenStore {
    token: Option<String>,
}

impl CsrfTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the held token, fetching one from `source` (the issuing
    /// endpoint) when none is held yet.
    pub fn ensure_with(&mut self, source: impl FnOnce() -> String) -> &str {
        self.token.get_or_insert_with(source)
    }

    /// Replaces the held token, e.g. after re-issuing an expired one.
    pub fn set(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn current(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Adds the hidden token field to a form submission.
    pub fn attach(&self, fields: &mut BTreeMap<String, String>) -> Result<(), CsrfError> {
        let token = self.guard_submit()?;
        fields.insert(CSRF_FIELD.to_string(), token.to_string());
        Ok(())
    }

    /// Refuses a submission when no token is present.
    pub fn guard_submit(&self) -> Result<&str, CsrfError> {
        self.current().ok_or(CsrfError::MissingToken)
    }

    pub fn clear(&mut self) {
        self.token = None;
    }
}
