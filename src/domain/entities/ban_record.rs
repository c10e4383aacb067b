use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reason shown when no explicit reason was recorded with the ban.
pub const DEFAULT_BAN_REASON: &str = "Violation of community guidelines";

/// Moderation log entry kept alongside the identity's ban timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct BanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason: Option<String>,
    pub banned_by: Option<Uuid>,
    pub banned_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Values written when a ban is issued or refreshed.
#[derive(Debug, Clone)]
pub struct NewBanRecord {
    pub user_id: Uuid,
    pub reason: Option<String>,
    pub banned_by: Uuid,
    pub banned_until: DateTime<Utc>,
}

impl BanRecord {
    pub fn reason_or_default(&self) -> &str {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_BAN_REASON)
    }
}
