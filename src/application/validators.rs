use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

/// Longest ban a moderator may issue in one go (ten years).
pub const MAX_BAN_HOURS: i64 = 87_600;

const MAX_REASON_LEN: usize = 500;

/// Parses a required identifier field from a request body.
/// Missing, blank and non-UUID values are all rejected before any lookup.
pub fn require_id(field: &str, value: Option<&str>) -> AppResult<Uuid> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("{field} is malformed")))
}

pub fn validate_ban_hours(hours: Option<i64>) -> AppResult<i64> {
    match hours {
        Some(h) if (1..=MAX_BAN_HOURS).contains(&h) => Ok(h),
        Some(_) => Err(AppError::InvalidInput(format!(
            "duration_hours must be between 1 and {MAX_BAN_HOURS}"
        ))),
        None => Err(AppError::InvalidInput("duration_hours is required".into())),
    }
}

/// Trims the reason, drops it when blank, rejects overly long input.
pub fn normalize_reason(reason: Option<&str>) -> AppResult<Option<String>> {
    let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if reason.chars().count() > MAX_REASON_LEN {
        return Err(AppError::InvalidInput(format!(
            "reason must be at most {MAX_REASON_LEN} characters"
        )));
    }
    Ok(Some(reason.to_string()))
}
