// HTTP request handlers
use crate::infrastructure::http_response::ResponseEnvelope;
use crate::presentation::app_state::AppState;
use crate::presentation::request::RequestEnvelope;
use anyhow::Context;
use axum::{extract::State, http::StatusCode};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Apply or remove a dashboard theme, driven by the host's request envelope.
pub async fn theme_request(State(state): State<Arc<AppState>>, body: String) -> ResponseEnvelope {
    dispatch(&state, &body).await
}

pub async fn dispatch(state: &AppState, body: &str) -> ResponseEnvelope {
    let envelope: RequestEnvelope = match serde_json::from_str(body)
        .context("Request envelope is not valid JSON")
    {
        Ok(envelope) => envelope,
        Err(e) => return ResponseEnvelope::internal_error(&e),
    };

    if envelope.method != "POST" {
        return ResponseEnvelope::failure(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed. Use POST.",
        );
    }

    let form = envelope.form();
    let ctx = envelope.context();
    let dashboard = form.trimmed("dashboard");
    let source_app = form.get("source_app");
    let service = &state.theme_service;

    match form.trimmed("action") {
        "remove" => match service.remove(dashboard, source_app, &ctx).await {
            Ok(removed) => ResponseEnvelope::success(json!({
                "success": true,
                "message": format!("Theme removed from dashboard {}", removed.dashboard),
            })),
            Err(e) => e.into(),
        },
        _ => {
            let theme_id = form.trimmed("theme_id");
            match service.apply(dashboard, theme_id, source_app, &ctx).await {
                Ok(applied) => ResponseEnvelope::success(json!({
                    "success": true,
                    "message": format!(
                        "Theme {} applied to dashboard {}",
                        applied.theme_id, applied.dashboard
                    ),
                    "dashboard_path": applied.dashboard_path.display().to_string(),
                })),
                Err(e) => e.into(),
            }
        }
    }
}
