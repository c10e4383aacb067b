use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user account as held by the managed auth store.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub banned_until: Option<DateTime<Utc>>,
}

impl Identity {
    /// Evaluates the ban predicate against `now`. Never cache the result.
    pub fn is_banned_at(&self, now: DateTime<Utc>) -> bool {
        is_banned(self.banned_until, now)
    }
}

/// A user is banned iff `banned_until` is set and strictly after `now`.
pub fn is_banned(banned_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(banned_until, Some(until) if until > now)
}
