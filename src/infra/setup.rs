use crate::{
    adapters::{auth_admin::AuthAdminClient, http::app_state::AppState},
    application::use_cases::{
        moderation::{BanRecordRepo, IdentityStore, ModerationUseCases, ProfileRepo},
        notification::{NotificationRepo, NotificationUseCases},
    },
    infra::{InfraError, config::AppConfig, postgres_persistence},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    let postgres_arc = Arc::new(
        postgres_persistence(&config.database_url, config.database_max_connections).await?,
    );

    let identities: Arc<dyn IdentityStore> = Arc::new(AuthAdminClient::new(
        config.auth_admin_url.clone(),
        config.auth_service_key.clone(),
    ));

    let moderation_use_cases = ModerationUseCases::new(
        identities,
        postgres_arc.clone() as Arc<dyn ProfileRepo>,
        postgres_arc.clone() as Arc<dyn BanRecordRepo>,
    );

    let notification_use_cases =
        NotificationUseCases::new(postgres_arc.clone() as Arc<dyn NotificationRepo>);

    Ok(AppState {
        config: Arc::new(config),
        moderation_use_cases: Arc::new(moderation_use_cases),
        notification_use_cases: Arc::new(notification_use_cases),
    })
}

pub fn init_tracing(log_file: &str) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "liveone_moderation=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let file = File::create(log_file).map_err(|source| InfraError::LogFile {
        path: log_file.to_string(),
        source,
    })?;
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
