// Response envelope for the host's REST handler protocol
use crate::application::theme_service::ThemeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// `{status, headers, payload}`, with the JSON body carried as a string in
/// `payload` the way the host expects it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub payload: String,
}

impl ResponseEnvelope {
    pub fn json(status: StatusCode, body: Value) -> Self {
        let headers = BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self {
            status: status.as_u16(),
            headers,
            payload: body.to_string(),
        }
    }

    pub fn success(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn failure(status: StatusCode, error: impl std::fmt::Display) -> Self {
        Self::json(
            status,
            json!({
                "success": false,
                "error": error.to_string(),
            }),
        )
    }

    /// 500 carrying the full error chain as a diagnostic trace.
    pub fn internal_error(error: &anyhow::Error) -> Self {
        Self::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "success": false,
                "error": format!("{:#}", error),
                "traceback": format!("{:?}", error),
            }),
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The payload parsed back into JSON.
    #[cfg(test)]
    pub fn body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.payload)
    }
}

impl From<ThemeError> for ResponseEnvelope {
    fn from(error: ThemeError) -> Self {
        let status = match &error {
            ThemeError::MissingParameters(_) | ThemeError::InvalidName { .. } => {
                StatusCode::BAD_REQUEST
            }
            ThemeError::DashboardNotFound(_) | ThemeError::NoThemeApplied => StatusCode::NOT_FOUND,
            ThemeError::Internal(inner) => {
                tracing::error!("Theme request failed: {:?}", inner);
                return Self::internal_error(inner);
            }
        };
        Self::failure(status, error)
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ThemeError::MissingParameters("Missing required parameter: dashboard"), 400),
            (ThemeError::DashboardNotFound("foo".to_string()), 404),
            (ThemeError::NoThemeApplied, 404),
            (anyhow::anyhow!("disk full").into(), 500),
        ];

        for (error, status) in cases {
            let message = error.to_string();
            let envelope = ResponseEnvelope::from(error);
            assert_eq!(envelope.status, status);
            assert_eq!(envelope.headers["Content-Type"], "application/json");

            let body = envelope.body().unwrap();
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], message);
        }
    }

    #[test]
    fn test_internal_error_carries_trace() {
        let error = anyhow::anyhow!("permission denied").context("Failed to write foo.xml");
        let body = ResponseEnvelope::internal_error(&error).body().unwrap();

        assert_eq!(body["error"], "Failed to write foo.xml: permission denied");
        let trace = body["traceback"].as_str().unwrap();
        assert!(trace.contains("Caused by"));
        assert!(trace.contains("permission denied"));
    }
}
