use std::sync::Arc;

use crate::{
    application::use_cases::{moderation::ModerationUseCases, notification::NotificationUseCases},
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub moderation_use_cases: Arc<ModerationUseCases>,
    pub notification_use_cases: Arc<NotificationUseCases>,
}
