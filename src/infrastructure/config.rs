use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SPLUNK_HOME: &str = "/Applications/Splunk";
const DEFAULT_SPLUNKD_URI: &str = "https://localhost:8089";
const THEME_APP: &str = "dashboard_theme_manager";

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeManagerConfig {
    pub server: ServerSettings,
    pub splunk: SplunkSettings,
    pub themes: ThemeSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SplunkSettings {
    pub home: PathBuf,
    pub management_uri: String,
    pub reload_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeSettings {
    /// App that ships the theme panels and their metadata.
    pub app: String,
    /// Owner app assumed when a request carries no `source_app`.
    pub default_source_app: String,
    #[serde(default)]
    pub metadata_file: Option<PathBuf>,
}

impl ThemeManagerConfig {
    pub fn metadata_path(&self) -> PathBuf {
        self.themes.metadata_file.clone().unwrap_or_else(|| {
            self.splunk
                .home
                .join("etc")
                .join("apps")
                .join(&self.themes.app)
                .join("appserver")
                .join("static")
                .join("themes_metadata.json")
        })
    }

    pub fn reload_timeout(&self) -> Duration {
        Duration::from_secs(self.splunk.reload_timeout_secs)
    }
}

/// Load settings from `config/theme_manager.*` (optional) and
/// `THEME_MANAGER__SECTION__KEY` environment variables. `SPLUNK_HOME` and
/// `SPLUNKD_URI` seed the defaults, as they do for other host scripts.
pub fn load_theme_manager_config() -> anyhow::Result<ThemeManagerConfig> {
    let splunk_home =
        std::env::var("SPLUNK_HOME").unwrap_or_else(|_| DEFAULT_SPLUNK_HOME.to_string());
    let splunkd_uri =
        std::env::var("SPLUNKD_URI").unwrap_or_else(|_| DEFAULT_SPLUNKD_URI.to_string());

    let settings = defaults(&splunk_home, &splunkd_uri)?
        .add_source(config::File::with_name("config/theme_manager").required(false))
        .add_source(
            config::Environment::with_prefix("THEME_MANAGER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn defaults(
    splunk_home: &str,
    splunkd_uri: &str,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.listen_addr", "0.0.0.0:8080")?
        .set_default("splunk.home", splunk_home)?
        .set_default("splunk.management_uri", splunkd_uri)?
        .set_default("splunk.reload_timeout_secs", 5i64)?
        .set_default("themes.app", THEME_APP)?
        .set_default("themes.default_source_app", THEME_APP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use std::path::Path;

    #[test]
    fn test_defaults_only() {
        let config: ThemeManagerConfig = defaults("/opt/splunk", "https://127.0.0.1:8089")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.splunk.management_uri, "https://127.0.0.1:8089");
        assert_eq!(config.reload_timeout(), Duration::from_secs(5));
        assert_eq!(config.themes.default_source_app, "dashboard_theme_manager");
        assert_eq!(
            config.metadata_path(),
            Path::new("/opt/splunk/etc/apps/dashboard_theme_manager/appserver/static/themes_metadata.json")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [server]
            listen_addr = "127.0.0.1:9000"

            [splunk]
            reload_timeout_secs = 2

            [themes]
            default_source_app = "search"
            metadata_file = "/tmp/themes.json"
        "#;
        let config: ThemeManagerConfig = defaults("/opt/splunk", "https://127.0.0.1:8089")
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.splunk.home, Path::new("/opt/splunk"));
        assert_eq!(config.reload_timeout(), Duration::from_secs(2));
        assert_eq!(config.themes.app, "dashboard_theme_manager");
        assert_eq!(config.themes.default_source_app, "search");
        assert_eq!(config.metadata_path(), Path::new("/tmp/themes.json"));
    }
}
