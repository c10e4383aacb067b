//! In-memory port implementations.
//!
//! `fail_reads` / `fail_writes` switch a mock into returning backend errors,
//! to exercise the partial-failure paths.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        moderation::{BanRecordRepo, IdentityStore, ProfileRepo},
        notification::NotificationRepo,
    },
    domain::entities::{
        ban_record::{BanRecord, NewBanRecord},
        identity::Identity,
        notification::Notification,
        profile::Profile,
        role::Role,
    },
};

fn check(flag: &AtomicBool, err: impl FnOnce() -> AppError) -> AppResult<()> {
    if flag.load(Ordering::SeqCst) {
        Err(err())
    } else {
        Ok(())
    }
}

fn upstream_down() -> AppError {
    AppError::Upstream("auth service unavailable".into())
}

fn database_down() -> AppError {
    AppError::Database("database unavailable".into())
}

// ============================================================================
// InMemoryIdentityStore
// ============================================================================

#[derive(Default)]
pub struct InMemoryIdentityStore {
    pub identities: Mutex<HashMap<Uuid, Identity>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identities(identities: Vec<Identity>) -> Self {
        let map = identities.into_iter().map(|i| (i.id, i)).collect();
        Self {
            identities: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Identity> {
        self.identities.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<Identity>> {
        check(&self.fail_reads, upstream_down)?;
        Ok(self.get(user_id))
    }

    async fn list_all(&self) -> AppResult<Vec<Identity>> {
        check(&self.fail_reads, upstream_down)?;
        Ok(self.identities.lock().unwrap().values().cloned().collect())
    }

    async fn set_ban(&self, user_id: Uuid, hours: i64) -> AppResult<Identity> {
        check(&self.fail_writes, upstream_down)?;
        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .get_mut(&user_id)
            .ok_or_else(AppError::user_not_found)?;
        identity.banned_until = Some(Utc::now() + Duration::hours(hours));
        Ok(identity.clone())
    }

    async fn clear_ban(&self, user_id: Uuid) -> AppResult<()> {
        check(&self.fail_writes, upstream_down)?;
        if let Some(identity) = self.identities.lock().unwrap().get_mut(&user_id) {
            identity.banned_until = None;
        }
        Ok(())
    }
}

// ============================================================================
// InMemoryProfileRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryProfileRepo {
    pub profiles: Mutex<HashMap<Uuid, Profile>>,
    fail_reads: AtomicBool,
}

impl InMemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let map = profiles.into_iter().map(|p| (p.id, p)).collect();
        Self {
            profiles: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileRepo for InMemoryProfileRepo {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        check(&self.fail_reads, database_down)?;
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn earliest_admin(&self) -> AppResult<Option<Profile>> {
        check(&self.fail_reads, database_down)?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.role == Role::Admin)
            // NULLS LAST, like the SQL query
            .min_by_key(|p| (p.created_at.is_none(), p.created_at))
            .cloned())
    }
}

// ============================================================================
// InMemoryBanRecordRepo
// ============================================================================

/// Keyed by user id, mirroring the unique constraint on `user_bans.user_id`.
#[derive(Default)]
pub struct InMemoryBanRecordRepo {
    pub records: Mutex<HashMap<Uuid, BanRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryBanRecordRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BanRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.user_id, r)).collect();
        Self {
            records: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn get(&self, user_id: Uuid) -> Option<BanRecord> {
        self.records.lock().unwrap().get(&user_id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BanRecordRepo for InMemoryBanRecordRepo {
    async fn get_ban(&self, user_id: Uuid) -> AppResult<Option<BanRecord>> {
        check(&self.fail_reads, database_down)?;
        Ok(self.get(user_id))
    }

    async fn upsert_ban(&self, ban: &NewBanRecord) -> AppResult<BanRecord> {
        check(&self.fail_writes, database_down)?;
        let mut records = self.records.lock().unwrap();
        let id = records
            .get(&ban.user_id)
            .map(|r| r.id)
            .unwrap_or_else(Uuid::new_v4);
        let record = BanRecord {
            id,
            user_id: ban.user_id,
            reason: ban.reason.clone(),
            banned_by: Some(ban.banned_by),
            banned_until: Some(ban.banned_until),
            created_at: Utc::now(),
        };
        records.insert(ban.user_id, record.clone());
        Ok(record)
    }

    async fn delete_ban(&self, user_id: Uuid) -> AppResult<()> {
        check(&self.fail_writes, database_down)?;
        self.records.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

// ============================================================================
// InMemoryNotificationRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryNotificationRepo {
    pub notifications: Mutex<HashMap<Uuid, Notification>>,
    fail_writes: AtomicBool,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        let map = notifications.into_iter().map(|n| (n.id, n)).collect();
        Self {
            notifications: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Notification> {
        self.notifications.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationRepo for InMemoryNotificationRepo {
    async fn mark_read(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        check(&self.fail_writes, database_down)?;
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .get_mut(&notification_id)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_profile, test_datetime};

    #[tokio::test]
    async fn earliest_admin_orders_by_created_at() {
        let older = create_test_profile(Uuid::new_v4(), |p| {
            p.role = Role::Admin;
            p.created_at = Some(test_datetime() - Duration::days(1));
        });
        let newer = create_test_profile(Uuid::new_v4(), |p| p.role = Role::Admin);
        let user = create_test_profile(Uuid::new_v4(), |p| {
            p.created_at = Some(test_datetime() - Duration::days(10));
        });
        let repo = InMemoryProfileRepo::with_profiles(vec![newer, user, older.clone()]);

        assert_eq!(repo.earliest_admin().await.unwrap(), Some(older));
    }

    #[tokio::test]
    async fn earliest_admin_ranks_missing_created_at_last() {
        let undated = create_test_profile(Uuid::new_v4(), |p| {
            p.role = Role::Admin;
            p.created_at = None;
        });
        let dated = create_test_profile(Uuid::new_v4(), |p| p.role = Role::Admin);
        let repo = InMemoryProfileRepo::with_profiles(vec![undated.clone(), dated.clone()]);

        assert_eq!(repo.earliest_admin().await.unwrap(), Some(dated));

        let repo = InMemoryProfileRepo::with_profiles(vec![undated.clone()]);
        assert_eq!(repo.earliest_admin().await.unwrap(), Some(undated));
    }

    #[tokio::test]
    async fn upsert_keeps_one_record_per_user() {
        let repo = InMemoryBanRecordRepo::new();
        let user_id = Uuid::new_v4();
        let ban = NewBanRecord {
            user_id,
            reason: Some("first".into()),
            banned_by: Uuid::new_v4(),
            banned_until: Utc::now() + Duration::hours(1),
        };
        let first = repo.upsert_ban(&ban).await.unwrap();
        let second = repo
            .upsert_ban(&NewBanRecord {
                reason: Some("second".into()),
                ..ban
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.records.lock().unwrap().len(), 1);
        assert_eq!(repo.get(user_id).unwrap().reason.as_deref(), Some("second"));
    }
}
