//! Mock summarization backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::SummarizerBackend;
use crate::SummarizeError;

/// A configurable mock response for [`MockSummarizer`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Answer with this summary.
    Summary(String),
    /// Answer successfully but without a summary field.
    NoSummary,
    /// Behave as if no API key were configured.
    MissingApiKey,
    /// Simulate a non-success HTTP status from the service.
    HttpError(u16),
    /// Never answer within the timeout.
    Timeout,
}

/// A hand-rolled mock implementing [`SummarizerBackend`] for tests.
///
/// Records every text it was asked to summarize so tests can check what the
/// pipeline actually forwarded.
pub struct MockSummarizer {
    response: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockSummarizer {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a mock that always answers `summary`.
    pub fn echoing(summary: &str) -> Self {
        Self::new(MockResponse::Summary(summary.to_string()))
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `summarize()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl SummarizerBackend for MockSummarizer {
    fn name(&self) -> &str {
        "Mock"
    }

    fn summarize<'a>(
        &'a self,
        text: &'a str,
        _client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, SummarizeError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(text.to_string());
        }
        let response = self.response.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Summary(s) => Ok(Some(s)),
                MockResponse::NoSummary => Ok(None),
                MockResponse::MissingApiKey => Err(SummarizeError::MissingApiKey {
                    backend: self.name().to_string(),
                }),
                MockResponse::HttpError(code) => Err(SummarizeError::Upstream {
                    backend: self.name().to_string(),
                    detail: format!("HTTP {}", code),
                }),
                MockResponse::Timeout => {
                    tokio::time::sleep(timeout).await;
                    Err(SummarizeError::Timeout {
                        backend: self.name().to_string(),
                    })
                }
            }
        })
    }
}
