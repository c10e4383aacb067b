pub mod auth_admin;
pub mod http;
pub mod persistence;
