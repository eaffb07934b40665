// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod dashboard_xml;
pub mod fs_dashboard_repository;
pub mod http_response;
pub mod splunkd_reloader;
pub mod theme_metadata_file;
