use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Account role as stored on the profile row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, AsRefStr, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    User,
}

impl Role {
    /// Parses a stored role, treating anything unknown as a plain user.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|r| r.trim().parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Whether this role may ban and unban other accounts.
    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}
