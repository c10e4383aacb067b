pub mod ban_record;
pub mod identity;
pub mod notification;
pub mod profile;
pub mod role;
