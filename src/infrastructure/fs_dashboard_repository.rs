// File-system repository over the host's view directories
use crate::application::dashboard_repository::{
    DashboardKey, DashboardRepository, ViewLocation, ViewScope,
};
use crate::domain::dashboard::DashboardDocument;
use crate::infrastructure::dashboard_xml::{parse_dashboard, render_dashboard};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FsDashboardRepository {
    home: PathBuf,
}

impl FsDashboardRepository {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Path of `key` in `scope`, or `None` for a user scope without a user.
    ///
    /// ```text
    /// UserLocal    etc/users/<user>/<app>/local/data/ui/views/<name>.xml
    /// UserDefault  etc/users/<user>/<app>/data/ui/views/<name>.xml
    /// AppLocal     etc/apps/<app>/local/data/ui/views/<name>.xml
    /// AppDefault   etc/apps/<app>/default/data/ui/views/<name>.xml
    /// ```
    pub fn view_path(&self, key: &DashboardKey, scope: ViewScope) -> Option<PathBuf> {
        let etc = self.home.join("etc");
        let app_dir = match scope {
            ViewScope::UserLocal => etc
                .join("users")
                .join(key.user.as_deref()?)
                .join(&key.app)
                .join("local"),
            ViewScope::UserDefault => etc.join("users").join(key.user.as_deref()?).join(&key.app),
            ViewScope::AppLocal => etc.join("apps").join(&key.app).join("local"),
            ViewScope::AppDefault => etc.join("apps").join(&key.app).join("default"),
        };

        Some(
            app_dir
                .join("data")
                .join("ui")
                .join("views")
                .join(format!("{}.xml", key.name)),
        )
    }
}

#[async_trait]
impl DashboardRepository for FsDashboardRepository {
    async fn locate(&self, key: &DashboardKey) -> Result<Option<ViewLocation>> {
        for scope in ViewScope::SEARCH_ORDER {
            let Some(path) = self.view_path(key, scope) else {
                continue;
            };
            let exists = tokio::fs::try_exists(&path)
                .await
                .with_context(|| format!("Failed to probe {}", path.display()))?;
            tracing::debug!(path = %path.display(), exists, "Probed dashboard location");
            if exists {
                return Ok(Some(ViewLocation { scope, path }));
            }
        }
        Ok(None)
    }

    async fn load(&self, location: &ViewLocation) -> Result<DashboardDocument> {
        let source = tokio::fs::read_to_string(location.path())
            .await
            .with_context(|| format!("Failed to read {}", location.path().display()))?;

        parse_dashboard(&source)
            .with_context(|| format!("Failed to parse {}", location.path().display()))
    }

    async fn save(
        &self,
        key: &DashboardKey,
        found_in: ViewScope,
        document: &DashboardDocument,
    ) -> Result<PathBuf> {
        let target = self
            .view_path(key, found_in.local_override())
            .context("User-scoped dashboard without a session user")?;

        if let Some(dir) = target.parent() {
            create_dir(dir).await?;
        }
        tokio::fs::write(&target, render_dashboard(document))
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        Ok(target)
    }
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))
}
