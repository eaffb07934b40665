// Application layer - Use cases and the ports they depend on
pub mod dashboard_repository;
pub mod theme_service;
pub mod theme_source;
pub mod view_reloader;
