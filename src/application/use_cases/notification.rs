use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::notification::Notification;

#[async_trait]
pub trait NotificationRepo: Send + Sync {
    /// Sets `read = true` and returns the updated notification, `None` for
    /// unknown ids.
    async fn mark_read(&self, notification_id: Uuid) -> AppResult<Option<Notification>>;
}

#[derive(Clone)]
pub struct NotificationUseCases {
    repo: Arc<dyn NotificationRepo>,
}

impl NotificationUseCases {
    pub fn new(repo: Arc<dyn NotificationRepo>) -> Self {
        Self { repo }
    }

    /// Idempotent: marking an already read notification succeeds again.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, notification_id: Uuid) -> AppResult<Notification> {
        self.repo
            .mark_read(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))
    }
}
