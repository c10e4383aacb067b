use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::notification::NotificationRepo,
    domain::entities::notification::Notification,
};

fn row_to_notification(row: sqlx::postgres::PgRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        action_type: row.get("action_type"),
        action_id: row.get("action_id"),
        sender_id: row.get("sender_id"),
        sender_username: row.get("sender_username"),
        sender_avatar: row.get("sender_avatar"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl NotificationRepo for PostgresPersistence {
    async fn mark_read(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        let row = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1
            RETURNING id, user_id, message, action_type, action_id,
                      sender_id, sender_username, sender_avatar, read, created_at
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_notification))
    }
}
