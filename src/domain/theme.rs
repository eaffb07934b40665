// Theme catalog domain model
use std::collections::HashMap;

/// Mode used when a theme is unknown or a dashboard carries no `theme` attribute.
pub const DEFAULT_THEME_MODE: &str = "dark";

/// Known theme identifiers and the display mode each one switches the dashboard to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeCatalog {
    modes: HashMap<String, String>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(id, mode)` pairs. Modes are lower-cased and a
    /// missing mode falls back to dark; blank ids are skipped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let modes = entries
            .into_iter()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, mode)| {
                let mode = mode
                    .map(|m| m.to_lowercase())
                    .unwrap_or_else(|| DEFAULT_THEME_MODE.to_string());
                (id, mode)
            })
            .collect();
        Self { modes }
    }

    /// Adds `id` with `mode` unless the catalog already knows it.
    pub fn register(&mut self, id: &str, mode: &str) {
        self.modes
            .entry(id.to_string())
            .or_insert_with(|| mode.to_string());
    }

    pub fn is_theme(&self, id: &str) -> bool {
        self.modes.contains_key(id)
    }

    pub fn mode_for(&self, id: &str) -> &str {
        self.modes
            .get(id)
            .map(String::as_str)
            .unwrap_or(DEFAULT_THEME_MODE)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, mode: Option<&str>) -> (String, Option<String>) {
        (id.to_string(), mode.map(str::to_string))
    }

    #[test]
    fn test_mode_lookup_lowercases_and_defaults() {
        let catalog = ThemeCatalog::from_entries([
            entry("neon_grid", Some("Light")),
            entry("midnight", None),
            entry("", Some("light")),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.mode_for("neon_grid"), "light");
        assert_eq!(catalog.mode_for("midnight"), "dark");
        assert_eq!(catalog.mode_for("unknown"), "dark");
        assert!(catalog.is_theme("midnight"));
        assert!(!catalog.is_theme(""));
    }

    #[test]
    fn test_register_keeps_known_modes() {
        let mut catalog = ThemeCatalog::from_entries([entry("paper", Some("light"))]);
        catalog.register("paper", "dark");
        catalog.register("custom", "dark");

        assert_eq!(catalog.mode_for("paper"), "light");
        assert!(catalog.is_theme("custom"));
    }

    #[test]
    fn test_empty_catalog_knows_no_themes() {
        let catalog = ThemeCatalog::new();
        assert!(catalog.is_empty());
        assert!(!catalog.is_theme("midnight"));
        assert_eq!(catalog.mode_for("midnight"), DEFAULT_THEME_MODE);
    }
}
