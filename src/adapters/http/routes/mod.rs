pub mod csrf;
pub mod moderation;
pub mod notification;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(moderation::router())
        .merge(notification::router())
        .merge(csrf::router())
}
