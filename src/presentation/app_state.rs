// Application state for HTTP handlers
use crate::application::theme_service::ThemeService;

#[derive(Clone)]
pub struct AppState {
    pub theme_service: ThemeService,
}
