// Presentation layer - HTTP handlers and request parsing
pub mod app_state;
pub mod handlers;
pub mod request;
