pub mod app_error;
pub mod csrf;
pub mod html;
pub mod use_cases;
pub mod validators;
