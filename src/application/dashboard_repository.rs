// Repository trait for dashboard definition access
use crate::domain::dashboard::DashboardDocument;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Which of the host's view directories a dashboard file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    UserLocal,
    UserDefault,
    AppLocal,
    AppDefault,
}

impl ViewScope {
    /// Probe order: private overrides first, shipped defaults last.
    pub const SEARCH_ORDER: [ViewScope; 4] = [
        ViewScope::UserLocal,
        ViewScope::UserDefault,
        ViewScope::AppLocal,
        ViewScope::AppDefault,
    ];

    pub fn is_user(self) -> bool {
        matches!(self, ViewScope::UserLocal | ViewScope::UserDefault)
    }

    /// Scope that edits of a dashboard found here are written to.
    pub fn local_override(self) -> ViewScope {
        if self.is_user() {
            ViewScope::UserLocal
        } else {
            ViewScope::AppLocal
        }
    }
}

/// Identifies one dashboard: its view name, owning app and requesting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardKey {
    pub name: String,
    pub app: String,
    pub user: Option<String>,
}

impl DashboardKey {
    pub fn new(name: impl Into<String>, app: impl Into<String>, user: Option<String>) -> Self {
        Self {
            name: name.into(),
            app: app.into(),
            user: user.filter(|u| !u.is_empty()),
        }
    }
}

/// A dashboard file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLocation {
    pub scope: ViewScope,
    pub path: PathBuf,
}

impl ViewLocation {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Find the first existing file for `key`, in `ViewScope::SEARCH_ORDER`.
    async fn locate(&self, key: &DashboardKey) -> anyhow::Result<Option<ViewLocation>>;

    /// Read and parse a located dashboard.
    async fn load(&self, location: &ViewLocation) -> anyhow::Result<DashboardDocument>;

    /// Write `document` to the local override of `found_in`, creating
    /// directories as needed. Returns the written path.
    async fn save(
        &self,
        key: &DashboardKey,
        found_in: ViewScope,
        document: &DashboardDocument,
    ) -> anyhow::Result<PathBuf>;
}
