//! Text-to-summary stage of the request pipeline.
//!
//! Runs after extraction: rejects empty text, truncates to
//! [`MAX_INPUT_CHARS`], makes exactly one summarizer call and applies the
//! missing-summary fallback. Nothing is retried.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::summarizer::SummarizerBackend;
use crate::{FALLBACK_SUMMARY, MAX_INPUT_CHARS, SummarizeError, SummaryResult, truncate_chars};

/// Summarize extracted document text.
///
/// Fails with [`SummarizeError::EmptyText`] before touching the network when
/// `text` is empty or whitespace-only. The outbound call is bounded by
/// `timeout` and abandoned as soon as `cancel` fires.
pub async fn summarize_text(
    text: &str,
    backend: &dyn SummarizerBackend,
    client: &reqwest::Client,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<SummaryResult, SummarizeError> {
    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyText);
    }

    let input_chars = text.chars().count();
    let (input, truncated) = truncate_chars(text, MAX_INPUT_CHARS);
    if truncated {
        tracing::info!(
            input_chars,
            kept = MAX_INPUT_CHARS,
            "extracted text truncated before summarization"
        );
    }

    let started = std::time::Instant::now();
    let answer = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SummarizeError::Cancelled),
        answer = backend.summarize(input, client, timeout) => answer?,
    };
    tracing::debug!(
        backend = backend.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "summarizer answered"
    );

    let (summary, fallback) = match answer {
        Some(s) if !s.is_empty() => (s, false),
        _ => {
            tracing::warn!(
                backend = backend.name(),
                "summarizer returned no summary, using fallback"
            );
            (FALLBACK_SUMMARY.to_string(), true)
        }
    };

    Ok(SummaryResult {
        summary,
        input_chars,
        truncated,
        fallback,
    })
}
