// Theme service - Use cases for applying and removing dashboard themes
use crate::application::dashboard_repository::{DashboardKey, DashboardRepository, ViewLocation};
use crate::application::theme_source::ThemeSource;
use crate::application::view_reloader::ViewReloader;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("{0}")]
    MissingParameters(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidName { field: &'static str, value: String },

    #[error("Dashboard {0} not found")]
    DashboardNotFound(String),

    #[error("No theme found on this dashboard")]
    NoThemeApplied,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Who is asking: the session user and the token used for the reload call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<String>,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTheme {
    pub dashboard: String,
    pub theme_id: String,
    pub dashboard_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedTheme {
    pub dashboard: String,
}

#[derive(Clone)]
pub struct ThemeService {
    repository: Arc<dyn DashboardRepository>,
    themes: Arc<dyn ThemeSource>,
    reloader: Arc<dyn ViewReloader>,
    theme_app: String,
    default_source_app: String,
}

impl ThemeService {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        themes: Arc<dyn ThemeSource>,
        reloader: Arc<dyn ViewReloader>,
        theme_app: String,
        default_source_app: String,
    ) -> Self {
        Self {
            repository,
            themes,
            reloader,
            theme_app,
            default_source_app,
        }
    }

    pub async fn apply(
        &self,
        dashboard: &str,
        theme_id: &str,
        source_app: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<AppliedTheme, ThemeError> {
        let dashboard = dashboard.trim();
        let theme_id = theme_id.trim();
        if dashboard.is_empty() || theme_id.is_empty() {
            return Err(ThemeError::MissingParameters(
                "Missing required parameters: dashboard and theme_id",
            ));
        }

        let key = self.dashboard_key(dashboard, source_app, ctx)?;
        let mut catalog = self.themes.load_catalog().await;
        let mode = catalog.mode_for(theme_id).to_string();
        // an unlisted theme still counts as a marker so re-applying replaces it
        catalog.register(theme_id, &mode);

        let location = self.locate(&key).await?;
        let mut document = self.repository.load(&location).await?;

        let replaced = document.strip_theme_rows(&catalog);
        document.set_theme_mode(&mode);
        document.append_theme_row(theme_id, &self.theme_app);
        tracing::debug!(
            dashboard = %key.name,
            markers = document.theme_row_count(&catalog),
            "Edited dashboard"
        );

        let dashboard_path = self.repository.save(&key, location.scope, &document).await?;
        tracing::info!(
            dashboard = %key.name,
            app = %key.app,
            theme = theme_id,
            mode = %mode,
            replaced,
            path = %dashboard_path.display(),
            "Applied theme"
        );

        self.refresh_views(&key.app, ctx).await;

        Ok(AppliedTheme {
            dashboard: key.name,
            theme_id: theme_id.to_string(),
            dashboard_path,
        })
    }

    pub async fn remove(
        &self,
        dashboard: &str,
        source_app: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<RemovedTheme, ThemeError> {
        let dashboard = dashboard.trim();
        if dashboard.is_empty() {
            return Err(ThemeError::MissingParameters(
                "Missing required parameter: dashboard",
            ));
        }

        let key = self.dashboard_key(dashboard, source_app, ctx)?;
        let location = self.locate(&key).await?;
        let mut document = self.repository.load(&location).await?;
        let catalog = self.themes.load_catalog().await;

        let rows_removed = document.strip_theme_rows(&catalog);
        if rows_removed == 0 {
            return Err(ThemeError::NoThemeApplied);
        }
        document.reset_theme_mode();

        let dashboard_path = self.repository.save(&key, location.scope, &document).await?;
        tracing::info!(
            dashboard = %key.name,
            app = %key.app,
            rows_removed,
            path = %dashboard_path.display(),
            "Removed theme"
        );

        self.refresh_views(&key.app, ctx).await;

        Ok(RemovedTheme {
            dashboard: key.name,
        })
    }

    fn dashboard_key(
        &self,
        dashboard: &str,
        source_app: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<DashboardKey, ThemeError> {
        let app = source_app
            .map(str::trim)
            .filter(|app| !app.is_empty())
            .unwrap_or(self.default_source_app.as_str());

        check_path_segment("dashboard", dashboard)?;
        check_path_segment("source_app", app)?;
        if let Some(user) = ctx.user.as_deref().filter(|u| !u.is_empty()) {
            check_path_segment("user", user)?;
        }

        Ok(DashboardKey::new(dashboard, app, ctx.user.clone()))
    }

    async fn locate(&self, key: &DashboardKey) -> Result<ViewLocation, ThemeError> {
        self.repository
            .locate(key)
            .await?
            .ok_or_else(|| ThemeError::DashboardNotFound(key.name.clone()))
    }

    /// Best effort: the edit has already been written, so a failed reload
    /// only means the host serves a stale view until its next refresh.
    async fn refresh_views(&self, app: &str, ctx: &RequestContext) {
        let Some(token) = ctx.auth_token.as_deref().filter(|t| !t.is_empty()) else {
            tracing::debug!(app, "No session token, skipping view reload");
            return;
        };

        if let Err(e) = self.reloader.reload_views(app, token).await {
            tracing::warn!(app, "View reload failed: {:#}", e);
        }
    }
}

/// Names end up as directory or file names under the host home.
fn check_path_segment(field: &'static str, value: &str) -> Result<(), ThemeError> {
    let invalid = value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ThemeError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
