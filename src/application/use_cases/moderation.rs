use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::{
    ban_record::{BanRecord, DEFAULT_BAN_REASON, NewBanRecord},
    identity::Identity,
    profile::Profile,
    role::Role,
};

/// Username reported for banned accounts without a usable profile.
pub const UNKNOWN_USERNAME: &str = "Unknown User";

/// Issuer reported when no administrator profile can be attributed.
pub const SYSTEM_ISSUER: &str = "System";

// ============================================================================
// Ports
// ============================================================================

/// Managed auth store holding the identities and their ban timestamps.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<Identity>>;
    async fn list_all(&self) -> AppResult<Vec<Identity>>;
    /// Sets `banned_until` to now plus `hours` and returns the updated identity.
    async fn set_ban(&self, user_id: Uuid, hours: i64) -> AppResult<Identity>;
    /// Clears `banned_until`. Clearing an unbanned or unknown identity succeeds.
    async fn clear_ban(&self, user_id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>>;
    /// The administrator profile with the oldest `created_at`.
    async fn earliest_admin(&self) -> AppResult<Option<Profile>>;
}

#[async_trait]
pub trait BanRecordRepo: Send + Sync {
    async fn get_ban(&self, user_id: Uuid) -> AppResult<Option<BanRecord>>;
    /// Inserts the record or refreshes the existing one for the same user.
    async fn upsert_ban(&self, ban: &NewBanRecord) -> AppResult<BanRecord>;
    /// Deleting a missing record succeeds.
    async fn delete_ban(&self, user_id: Uuid) -> AppResult<()>;
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BanIssuer {
    pub id: Option<Uuid>,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BanInfo {
    pub user_id: Uuid,
    pub banned_until: DateTime<Utc>,
    pub reason: String,
    pub banned_by: BanIssuer,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BannedUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: String,
    pub avatar_url: Option<String>,
    pub banned_until: DateTime<Utc>,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ModerationUseCases {
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileRepo>,
    bans: Arc<dyn BanRecordRepo>,
}

impl ModerationUseCases {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileRepo>,
        bans: Arc<dyn BanRecordRepo>,
    ) -> Self {
        Self {
            identities,
            profiles,
            bans,
        }
    }

    /// Whether the user is banned right now. Unknown users are `NotFound`.
    #[instrument(skip(self))]
    pub async fn check_ban_status(&self, user_id: Uuid) -> AppResult<bool> {
        let identity = self
            .identities
            .get_by_id(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;
        Ok(identity.is_banned_at(Utc::now()))
    }

    /// Extended ban metadata, `None` for unknown or unbanned users.
    #[instrument(skip(self))]
    pub async fn get_ban_info(&self, user_id: Uuid) -> AppResult<Option<BanInfo>> {
        let Some(identity) = self.identities.get_by_id(user_id).await? else {
            return Ok(None);
        };
        let Some(banned_until) = identity.banned_until.filter(|_| identity.is_banned_at(Utc::now()))
        else {
            return Ok(None);
        };

        let record = self.bans.get_ban(user_id).await?;
        let reason = record
            .as_ref()
            .map(|r| r.reason_or_default().to_string())
            .unwrap_or_else(|| DEFAULT_BAN_REASON.to_string());
        let banned_by = self
            .attribute_issuer(record.as_ref().and_then(|r| r.banned_by))
            .await;

        Ok(Some(BanInfo {
            user_id,
            banned_until,
            reason,
            banned_by,
        }))
    }

    /// Every currently banned user, enriched with profile display data.
    #[instrument(skip(self))]
    pub async fn list_banned_users(&self) -> AppResult<Vec<BannedUser>> {
        let now = Utc::now();
        let banned: Vec<Identity> = self
            .identities
            .list_all()
            .await?
            .into_iter()
            .filter(|identity| identity.is_banned_at(now))
            .collect();

        let lookups = banned.into_iter().map(|identity| async move {
            let profile = match self.profiles.get_profile(identity.id).await {
                Ok(profile) => profile,
                Err(err) => {
                    tracing::warn!(
                        user_id = %identity.id,
                        error = %err,
                        "Profile lookup failed, listing banned user with defaults"
                    );
                    None
                }
            };
            to_banned_user(identity, profile.as_ref())
        });

        let users: Vec<BannedUser> = join_all(lookups).await.into_iter().flatten().collect();
        tracing::debug!(count = users.len(), "Listed banned users");
        Ok(users)
    }

    /// Lifts an active ban. The identity timestamp is cleared before the ban
    /// record is removed, so a failure between the two steps leaves the record
    /// in place and the unban can simply be retried.
    #[instrument(skip(self))]
    pub async fn unban_user(&self, admin_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.require_moderator(admin_id).await?;

        self.profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        if self.bans.get_ban(user_id).await?.is_none() {
            return Err(AppError::NotBanned);
        }

        self.identities.clear_ban(user_id).await?;

        if let Err(err) = self.bans.delete_ban(user_id).await {
            tracing::error!(
                admin_id = %admin_id,
                user_id = %user_id,
                error = %err,
                "Identity unbanned but ban record removal failed; retry the unban"
            );
            return Err(err);
        }

        tracing::info!(admin_id = %admin_id, user_id = %user_id, "User unbanned");
        Ok(())
    }

    /// Bans a user for `hours`. The target must exist in the auth store; the
    /// ban record is then written first and the identity second. Both writes
    /// are idempotent so a retry converges.
    #[instrument(skip(self))]
    pub async fn ban_user(
        &self,
        admin_id: Uuid,
        user_id: Uuid,
        hours: i64,
        reason: Option<String>,
    ) -> AppResult<DateTime<Utc>> {
        let caller = self.require_moderator(admin_id).await?;

        if admin_id == user_id {
            return Err(AppError::InvalidInput("You cannot ban yourself".into()));
        }

        let target = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        if !outranks(caller.role, target.role) {
            return Err(AppError::Forbidden);
        }

        // Nothing is written for targets the auth store does not know.
        self.identities
            .get_by_id(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        let requested_until = Utc::now() + Duration::hours(hours);
        self.bans
            .upsert_ban(&NewBanRecord {
                user_id,
                reason,
                banned_by: admin_id,
                banned_until: requested_until,
            })
            .await?;

        let identity = match self.identities.set_ban(user_id, hours).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::error!(
                    admin_id = %admin_id,
                    user_id = %user_id,
                    error = %err,
                    "Ban record written but identity ban failed; retry the ban"
                );
                return Err(err);
            }
        };

        let banned_until = identity.banned_until.unwrap_or(requested_until);
        tracing::info!(
            admin_id = %admin_id,
            user_id = %user_id,
            banned_until = %banned_until,
            "User banned"
        );
        Ok(banned_until)
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn require_moderator(&self, admin_id: Uuid) -> AppResult<Profile> {
        match self.profiles.get_profile(admin_id).await? {
            Some(profile) if profile.role.can_moderate() => Ok(profile),
            _ => {
                tracing::warn!(admin_id = %admin_id, "Moderation attempt without privileges");
                Err(AppError::Forbidden)
            }
        }
    }

    /// Best-effort attribution: the recorded issuer, else the earliest
    /// administrator, else a synthetic "System" issuer.
    async fn attribute_issuer(&self, recorded: Option<Uuid>) -> BanIssuer {
        if let Some(issuer_id) = recorded {
            match self.profiles.get_profile(issuer_id).await {
                Ok(Some(profile)) => return issuer_from(&profile),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(issuer_id = %issuer_id, error = %err, "Issuer lookup failed")
                }
            }
        }

        match self.profiles.earliest_admin().await {
            Ok(Some(profile)) => issuer_from(&profile),
            Ok(None) => system_issuer(),
            Err(err) => {
                tracing::warn!(error = %err, "Admin lookup failed, attributing ban to System");
                system_issuer()
            }
        }
    }
}

/// Admins may ban anyone but other admins; moderators only plain users.
fn outranks(caller: Role, target: Role) -> bool {
    match (caller, target) {
        (_, Role::Admin) => false,
        (Role::Admin, _) => true,
        (Role::Moderator, Role::User) => true,
        _ => false,
    }
}

fn to_banned_user(identity: Identity, profile: Option<&Profile>) -> Option<BannedUser> {
    let banned_until = identity.banned_until?;
    Some(BannedUser {
        id: identity.id,
        email: identity.email,
        username: profile
            .and_then(Profile::display_name)
            .unwrap_or(UNKNOWN_USERNAME)
            .to_string(),
        avatar_url: profile.and_then(|p| p.avatar_url.clone()),
        banned_until,
    })
}

fn issuer_from(profile: &Profile) -> BanIssuer {
    BanIssuer {
        id: Some(profile.id),
        username: profile.display_name().unwrap_or(SYSTEM_ISSUER).to_string(),
        avatar_url: profile.avatar_url.clone(),
    }
}

fn system_issuer() -> BanIssuer {
    BanIssuer {
        id: None,
        username: SYSTEM_ISSUER.to_string(),
        avatar_url: None,
    }
}
