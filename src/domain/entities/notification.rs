use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub action_type: Option<String>,
    pub action_id: Option<String>,
    pub sender_id: Option<Uuid>,
    pub sender_username: Option<String>,
    pub sender_avatar: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
