//! Summarization backend trait and implementations.

pub mod cohere;
pub mod mock;

pub use cohere::Cohere;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::SummarizeError;

/// A service that turns text into a summary.
///
/// `Ok(None)` means the service answered successfully but without a summary;
/// the pipeline decides what to do with that.
pub trait SummarizerBackend: Send + Sync {
    /// Display name, used in error messages and logs (e.g. "Cohere").
    fn name(&self) -> &str;

    /// Summarize `text` with a single request bounded by `timeout`.
    fn summarize<'a>(
        &'a self,
        text: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, SummarizeError>> + Send + 'a>>;
}
