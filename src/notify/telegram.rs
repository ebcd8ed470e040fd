use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};
use url::Url;

use super::DeliveryError;
use crate::config::Credentials;
use crate::models::{DeliveryReceipt, RenderedMessage};
use crate::utils::truncate_for_log;

/// Legacy Markdown: `*bold*`, `_italic_`.
pub const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: Url,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_base: Url) -> Self {
        Self {
            client,
            api_base,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, token: &str) -> Result<Url, DeliveryError> {
        // Url::join would drop a path prefix on api_base without a trailing slash
        let base = self.api_base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/bot{token}/sendMessage"))
            .map_err(|_| DeliveryError::Transport("could not build sendMessage URL".to_string()))
    }

    /// Post `message` to the chat in `creds`.
    ///
    /// One attempt only; the caller decides what a failure means for the run.
    #[instrument(level = "info", skip_all, fields(chat_id = %creds.chat_id, chars = message.as_str().chars().count()))]
    pub async fn send(
        &self,
        message: &RenderedMessage,
        creds: &Credentials,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let t0 = Instant::now();
        let url = self.endpoint(&creds.token)?;
        let form = [
            ("chat_id", creds.chat_id.as_str()),
            ("text", message.as_str()),
            ("parse_mode", PARSE_MODE),
        ];

        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;
        let envelope = serde_json::from_str::<ApiEnvelope>(&body);

        if !status.is_success() {
            let description = envelope
                .ok()
                .and_then(|env| env.description)
                .unwrap_or_else(|| truncate_for_log(&body, 200));
            error!(status = status.as_u16(), %description, "Telegram rejected the request");
            return Err(DeliveryError::HttpStatus {
                status: status.as_u16(),
                description,
            });
        }

        let envelope = envelope.map_err(|e| {
            error!(error = %e, body = %truncate_for_log(&body, 200), "Unparsable Telegram response");
            DeliveryError::InvalidResponse(e.to_string())
        })?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            error!(%description, "Telegram answered ok=false");
            return Err(DeliveryError::Rejected(description));
        }

        let payload = envelope.result.unwrap_or(serde_json::Value::Null);
        let message_id = payload.get("message_id").and_then(|v| v.as_i64());
        info!(
            ?message_id,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Message delivered"
        );

        Ok(DeliveryReceipt {
            message_id,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::build_client;
    use crate::test_support::{refused_url, serve_once};

    fn creds() -> Credentials {
        Credentials {
            token: "123:abc".to_string(),
            chat_id: "-100".to_string(),
        }
    }

    fn notifier(base: &str) -> TelegramNotifier {
        TelegramNotifier::new(build_client().unwrap(), Url::parse(base).unwrap())
    }

    #[tokio::test]
    async fn test_send_posts_form_and_returns_receipt() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"ok":true,"result":{"message_id":77,"chat":{"id":-100}}}"#,
        )
        .await;

        let message = RenderedMessage::new("📊 *Market Mood*".to_string());
        let receipt = notifier(&base).send(&message, &creds()).await.unwrap();
        assert_eq!(receipt.message_id, Some(77));
        assert_eq!(receipt.payload["chat"]["id"], -100);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/sendMessage "));
        assert!(request.to_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.contains("chat_id=-100"));
        assert!(request.contains("parse_mode=Markdown"));
        assert!(request.contains("text=%F0%9F%93%8A+*Market+Mood*"));
    }

    #[tokio::test]
    async fn test_send_maps_http_error_with_description() {
        let (base, _server) = serve_once(
            "400 Bad Request",
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .await;

        let err = notifier(&base)
            .send(&RenderedMessage::new("hi".to_string()), &creds())
            .await
            .unwrap_err();
        match err {
            DeliveryError::HttpStatus { status, description } => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_maps_ok_false_to_rejected() {
        let (base, _server) = serve_once("200 OK", r#"{"ok":false,"description":"flood"}"#).await;

        let err = notifier(&base)
            .send(&RenderedMessage::new("hi".to_string()), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected(ref d) if d == "flood"));
    }

    #[tokio::test]
    async fn test_send_maps_garbage_body_to_invalid_response() {
        let (base, _server) = serve_once("200 OK", "<html>proxy</html>").await;

        let err = notifier(&base)
            .send(&RenderedMessage::new("hi".to_string()), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_token() {
        let base = refused_url().await;

        let err = notifier(&base)
            .send(&RenderedMessage::new("hi".to_string()), &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
        assert!(!err.to_string().contains("123:abc"));
    }
}
