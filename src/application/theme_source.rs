// Source of theme metadata
use crate::domain::theme::ThemeCatalog;
use async_trait::async_trait;

#[async_trait]
pub trait ThemeSource: Send + Sync {
    /// Load the current theme catalog. Never fails: an unreadable source
    /// yields an empty catalog.
    async fn load_catalog(&self) -> ThemeCatalog;
}
