// Theme metadata loaded from the theme app's static assets
use crate::application::theme_source::ThemeSource;
use crate::domain::theme::ThemeCatalog;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct ThemesMetadata {
    #[serde(default)]
    themes: Vec<ThemeEntry>,
}

#[derive(Debug, Deserialize)]
struct ThemeEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

/// Reads `themes_metadata.json` on every call so edits to the file apply
/// without a restart.
#[derive(Debug, Clone)]
pub struct ThemeMetadataFile {
    path: PathBuf,
}

impl ThemeMetadataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<ThemeCatalog> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let metadata: ThemesMetadata = serde_json::from_slice(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok(ThemeCatalog::from_entries(metadata.themes.into_iter().filter_map(
            |entry| entry.id.map(|id| (id, entry.mode)),
        )))
    }
}

#[async_trait]
impl ThemeSource for ThemeMetadataFile {
    async fn load_catalog(&self) -> ThemeCatalog {
        match self.read().await {
            Ok(catalog) if catalog.is_empty() => {
                tracing::warn!(path = %self.path.display(), "Theme metadata lists no themes");
                catalog
            }
            Ok(catalog) => {
                tracing::debug!(themes = catalog.len(), "Loaded theme metadata");
                catalog
            }
            Err(e) => {
                tracing::warn!("Theme metadata unavailable, using empty catalog: {:#}", e);
                ThemeCatalog::new()
            }
        }
    }
}
