use std::net::SocketAddr;

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Base URL of the managed auth service (e.g. "https://project.example.co/").
    pub auth_admin_url: Url,
    /// Service-role key for the auth admin API. Never log this.
    pub auth_service_key: SecretString,
    /// HMAC key for CSRF tokens.
    pub csrf_secret: SecretString,
    pub csrf_token_ttl: Duration,
    /// Disable only for local development.
    pub csrf_enforce: bool,
    pub log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let database_max_connections: u32 = get_env_default("DATABASE_MAX_CONNECTIONS", 5);
        let auth_admin_url = with_trailing_slash(get_env("AUTH_ADMIN_URL"));
        let auth_service_key = SecretString::new(get_env::<String>("AUTH_SERVICE_KEY").into());
        let csrf_secret = SecretString::new(get_env::<String>("CSRF_SECRET").into());
        let csrf_token_ttl_minutes: i64 = get_env_default("CSRF_TOKEN_TTL_MINUTES", 120);
        // Default to true - only switch off when no browser talks to this instance
        let csrf_enforce: bool = get_env_default("CSRF_ENFORCE", true);
        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Self {
            bind_addr,
            database_url,
            database_max_connections,
            auth_admin_url,
            auth_service_key,
            csrf_secret,
            csrf_token_ttl: Duration::minutes(csrf_token_ttl_minutes),
            csrf_enforce,
            log_file,
        }
    }
}

/// `Url::join` replaces the last path segment unless the base ends in '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
