// View cache reload through the splunkd management API
use crate::application::view_reloader::ViewReloader;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SplunkdReloader {
    base_uri: String,
    client: reqwest::Client,
}

impl SplunkdReloader {
    /// The management port serves a self-signed certificate, so certificate
    /// verification is off for this client.
    pub fn new(base_uri: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .context("Failed to build splunkd HTTP client")?;

        Ok(Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn reload_url(&self, app: &str) -> String {
        format!(
            "{}/servicesNS/nobody/{}/data/ui/views/_reload",
            self.base_uri,
            urlencoding::encode(app)
        )
    }
}

#[async_trait]
impl ViewReloader for SplunkdReloader {
    async fn reload_views(&self, app: &str, session_token: &str) -> Result<()> {
        let url = self.reload_url(app);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Splunk {}", session_token))
            .send()
            .await
            .context("Failed to send view reload request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("View reload failed with status {}: {}", status, body);
        }

        tracing::debug!(app, "Reloaded views");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accepts one connection, answers with `status_line`, returns the raw request.
    async fn one_shot_server(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_reload_url() {
        let reloader = SplunkdReloader::new("https://localhost:8089/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            reloader.reload_url("my app"),
            "https://localhost:8089/servicesNS/nobody/my%20app/data/ui/views/_reload"
        );
    }

    #[tokio::test]
    async fn test_reload_sends_session_token() {
        let (uri, server) = one_shot_server("200 OK").await;
        let reloader = SplunkdReloader::new(&uri, Duration::from_secs(5)).unwrap();

        reloader.reload_views("search", "abc123").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /servicesNS/nobody/search/data/ui/views/_reload "));
        assert!(request.to_lowercase().contains("authorization: splunk abc123"));
    }

    #[tokio::test]
    async fn test_reload_reports_error_status() {
        let (uri, server) = one_shot_server("401 Unauthorized").await;
        let reloader = SplunkdReloader::new(&uri, Duration::from_secs(5)).unwrap();

        let err = reloader.reload_views("search", "expired").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        server.await.unwrap();
    }
}
