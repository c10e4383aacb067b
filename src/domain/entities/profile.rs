use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::role::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Display name, or `None` when the username is unset or blank.
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
