//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by in-memory mocks and
//! hands the mocks back so tests can assert on persisted state.

use std::{net::SocketAddr, sync::Arc};

use axum::http::{HeaderName, HeaderValue, header::COOKIE};
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        csrf::{self, CSRF_COOKIE, CSRF_HEADER},
        use_cases::{moderation::ModerationUseCases, notification::NotificationUseCases},
    },
    domain::entities::{
        ban_record::BanRecord, identity::Identity, notification::Notification, profile::Profile,
    },
    infra::config::AppConfig,
    test_utils::{
        InMemoryBanRecordRepo, InMemoryIdentityStore, InMemoryNotificationRepo,
        InMemoryProfileRepo,
    },
};

pub const TEST_CSRF_SECRET: &str = "test_csrf_secret";

/// Handles to the mocks behind a built `AppState`.
pub struct TestMocks {
    pub identities: Arc<InMemoryIdentityStore>,
    pub profiles: Arc<InMemoryProfileRepo>,
    pub bans: Arc<InMemoryBanRecordRepo>,
    pub notifications: Arc<InMemoryNotificationRepo>,
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let (app_state, mocks) = TestAppStateBuilder::new()
///     .with_identity(banned_identity(user_id, Duration::days(1)))
///     .with_profile(create_test_profile(admin_id, |p| p.role = Role::Admin))
///     .build_with_mocks();
/// ```
pub struct TestAppStateBuilder {
    identities: Vec<Identity>,
    profiles: Vec<Profile>,
    ban_records: Vec<BanRecord>,
    notifications: Vec<Notification>,
    csrf_enforce: bool,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            identities: vec![],
            profiles: vec![],
            ban_records: vec![],
            notifications: vec![],
            csrf_enforce: true,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_ban_record(mut self, record: BanRecord) -> Self {
        self.ban_records.push(record);
        self
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn with_csrf_enforced(mut self, enforce: bool) -> Self {
        self.csrf_enforce = enforce;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    pub fn build_with_mocks(self) -> (AppState, TestMocks) {
        let mocks = TestMocks {
            identities: Arc::new(InMemoryIdentityStore::with_identities(self.identities)),
            profiles: Arc::new(InMemoryProfileRepo::with_profiles(self.profiles)),
            bans: Arc::new(InMemoryBanRecordRepo::with_records(self.ban_records)),
            notifications: Arc::new(InMemoryNotificationRepo::with_notifications(
                self.notifications,
            )),
        };

        let moderation_use_cases = Arc::new(ModerationUseCases::new(
            mocks.identities.clone(),
            mocks.profiles.clone(),
            mocks.bans.clone(),
        ));
        let notification_use_cases =
            Arc::new(NotificationUseCases::new(mocks.notifications.clone()));

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            database_max_connections: 1,
            auth_admin_url: Url::parse("http://localhost:54321/").unwrap(),
            auth_service_key: SecretString::new("test_service_key".into()),
            csrf_secret: SecretString::new(TEST_CSRF_SECRET.into()),
            csrf_token_ttl: Duration::minutes(30),
            csrf_enforce: self.csrf_enforce,
            log_file: String::new(),
        });

        let app_state = AppState {
            config,
            moderation_use_cases,
            notification_use_cases,
        };
        (app_state, mocks)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid `x-csrf-token` header, as sent by cross-origin clients.
pub fn csrf_header() -> (HeaderName, HeaderValue) {
    let token = csrf::issue(&SecretString::new(TEST_CSRF_SECRET.into())).unwrap();
    (
        HeaderName::from_static(CSRF_HEADER),
        HeaderValue::from_str(&token).unwrap(),
    )
}

/// A same-origin pair: the `x-csrf-token` header and the matching `cookie`
/// header.
pub fn csrf_headers() -> [(HeaderName, HeaderValue); 2] {
    let token = csrf::issue(&SecretString::new(TEST_CSRF_SECRET.into())).unwrap();
    [
        (
            HeaderName::from_static(CSRF_HEADER),
            HeaderValue::from_str(&token).unwrap(),
        ),
        (
            COOKIE,
            HeaderValue::from_str(&format!("{CSRF_COOKIE}={token}")).unwrap(),
        ),
    ]
}
