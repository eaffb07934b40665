// Host view-cache invalidation
use async_trait::async_trait;

#[async_trait]
pub trait ViewReloader: Send + Sync {
    /// Ask the host to re-read the views of `app`, authenticated as the
    /// session that made the edit.
    async fn reload_views(&self, app: &str, session_token: &str) -> anyhow::Result<()>;
}
