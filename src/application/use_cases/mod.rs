pub mod moderation;
pub mod notification;
