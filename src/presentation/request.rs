// Inbound request envelope and form payload parsing
use crate::application::theme_service::RequestContext;
use serde::Deserialize;
use std::collections::HashMap;

/// JSON envelope forwarded by the host for each REST call.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub session: Session,
}

#[derive(Debug, Default, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub authtoken: Option<String>,
}

fn default_method() -> String {
    "POST".to_string()
}

impl RequestEnvelope {
    pub fn form(&self) -> FormParams {
        FormParams::parse(self.payload.as_deref().unwrap_or_default())
    }

    pub fn context(&self) -> RequestContext {
        RequestContext {
            user: self.session.user.clone(),
            auth_token: self.session.authtoken.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormParams(HashMap<String, String>);

impl FormParams {
    /// Decode an `application/x-www-form-urlencoded` body. Pieces without `=`
    /// are ignored and a repeated key keeps its last value.
    pub fn parse(body: &str) -> Self {
        let params = body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (decode_component(key), decode_component(value)))
            .collect();
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed value, or an empty string when the key is absent.
    pub fn trimmed(&self, key: &str) -> &str {
        self.get(key).map(str::trim).unwrap_or_default()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_decoding() {
        let form = FormParams::parse(
            "action=+remove+&dashboard=ops%20overview&theme_id=a%2Bb&flag&source_app=search&source_app=my+app",
        );

        assert_eq!(form.trimmed("action"), "remove");
        assert_eq!(form.get("dashboard"), Some("ops overview"));
        assert_eq!(form.get("theme_id"), Some("a+b"));
        assert_eq!(form.get("flag"), None);
        assert_eq!(form.get("source_app"), Some("my app"));
        assert_eq!(form.trimmed("missing"), "");
    }

    #[test]
    fn test_value_may_contain_equals_and_bad_utf8() {
        let form = FormParams::parse("q=a=b&x=%FF");
        assert_eq!(form.get("q"), Some("a=b"));
        assert_eq!(form.get("x"), Some("\u{FFFD}"));
        assert_eq!(FormParams::parse(""), FormParams::default());
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: RequestEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.method, "POST");
        assert_eq!(envelope.form(), FormParams::default());
        assert!(envelope.context().user.is_none());

        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{"method": "GET", "payload": null, "session": {"user": "admin", "authtoken": "t0k"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.method, "GET");
        let ctx = envelope.context();
        assert_eq!(ctx.user.as_deref(), Some("admin"));
        assert_eq!(ctx.auth_token.as_deref(), Some("t0k"));
    }
}
