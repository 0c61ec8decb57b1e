use super::SummarizerBackend;
use crate::SummarizeError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const API_VERSION: &str = "2022-12-06";

/// Cohere `/v1/summarize` client.
///
/// The API key is only checked when a request is about to be made, so a
/// server can start without one and still serve everything else.
pub struct Cohere {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    length: &'static str,
    format: &'static str,
    model: &'static str,
    extractiveness: &'static str,
}

impl<'a> SummarizeRequest<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            length: "medium",
            format: "paragraph",
            model: "command",
            extractiveness: "auto",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: Option<String>,
}

impl Cohere {
    fn endpoint(&self) -> String {
        format!("{}/v1/summarize", self.base_url.trim_end_matches('/'))
    }

    fn upstream(&self, detail: impl Into<String>) -> SummarizeError {
        SummarizeError::Upstream {
            backend: self.name().to_string(),
            detail: detail.into(),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> SummarizeError {
        if e.is_timeout() {
            SummarizeError::Timeout {
                backend: self.name().to_string(),
            }
        } else {
            self.upstream(e.to_string())
        }
    }
}

impl SummarizerBackend for Cohere {
    fn name(&self) -> &str {
        "Cohere"
    }

    fn summarize<'a>(
        &'a self,
        text: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, SummarizeError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| SummarizeError::MissingApiKey {
                    backend: self.name().to_string(),
                })?;

            let resp = client
                .post(self.endpoint())
                .bearer_auth(api_key)
                .header("Cohere-Version", API_VERSION)
                .json(&SummarizeRequest::new(text))
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(status = %status, "summarizer returned an error");
                tracing::debug!(status = %status, body = %body, "summarizer error body");
                return Err(self.upstream(format!("HTTP {}", status)));
            }

            let data: SummarizeResponse = resp.json().await.map_err(|e| {
                if e.is_timeout() {
                    SummarizeError::Timeout {
                        backend: self.name().to_string(),
                    }
                } else {
                    self.upstream(format!("invalid response body: {}", e))
                }
            })?;

            Ok(data.summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Seen {
        auth: Option<String>,
        version: Option<String>,
        body: Option<serde_json::Value>,
    }

    /// Serve `reply` on `/v1/summarize` from an ephemeral local port.
    async fn fake_upstream(
        status: StatusCode,
        reply: serde_json::Value,
        delay: Option<Duration>,
    ) -> (String, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let seen_handler = seen.clone();
        let app = axum::Router::new().route(
            "/v1/summarize",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let seen = seen_handler.clone();
                let reply = reply.clone();
                async move {
                    {
                        let mut s = seen.lock().unwrap();
                        s.auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        s.version = headers
                            .get("cohere-version")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        s.body = Some(body);
                    }
                    if let Some(d) = delay {
                        tokio::time::sleep(d).await;
                    }
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn cohere(base_url: String) -> Cohere {
        Cohere {
            api_key: Some("test-key".into()),
            base_url,
        }
    }

    #[tokio::test]
    async fn sends_fixed_request_shape() {
        let (url, seen) = fake_upstream(
            StatusCode::OK,
            serde_json::json!({ "id": "x", "summary": "Short." }),
            None,
        )
        .await;
        let client = reqwest::Client::new();

        let summary = cohere(url)
            .summarize("hello world", &client, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(summary.as_deref(), Some("Short."));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.auth.as_deref(), Some("Bearer test-key"));
        assert_eq!(seen.version.as_deref(), Some(API_VERSION));
        assert_eq!(
            seen.body.as_ref().unwrap(),
            &serde_json::json!({
                "text": "hello world",
                "length": "medium",
                "format": "paragraph",
                "model": "command",
                "extractiveness": "auto",
            })
        );
    }

    #[tokio::test]
    async fn missing_summary_field_is_none() {
        let (url, _) = fake_upstream(StatusCode::OK, serde_json::json!({ "id": "x" }), None).await;
        let client = reqwest::Client::new();
        let summary = cohere(url)
            .summarize("text", &client, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(summary.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_generic_upstream_error() {
        let (url, _) = fake_upstream(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({ "message": "invalid api token" }),
            None,
        )
        .await;
        let client = reqwest::Client::new();
        let err = cohere(url)
            .summarize("text", &client, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::Upstream { .. }));
        assert_eq!(err.to_string(), "Cohere API error");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let (url, seen) = fake_upstream(StatusCode::OK, serde_json::json!({}), None).await;
        let client = reqwest::Client::new();
        let backend = Cohere {
            api_key: None,
            base_url: url,
        };
        let err = backend
            .summarize("text", &client, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::MissingApiKey { .. }));
        assert!(seen.lock().unwrap().body.is_none());
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let (url, _) = fake_upstream(
            StatusCode::OK,
            serde_json::json!({ "summary": "late" }),
            Some(Duration::from_secs(2)),
        )
        .await;
        let client = reqwest::Client::new();
        let err = cohere(url)
            .summarize("text", &client, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::Timeout { .. }));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let backend = cohere("https://api.cohere.ai/".into());
        assert_eq!(backend.endpoint(), "https://api.cohere.ai/v1/summarize");
    }
}
