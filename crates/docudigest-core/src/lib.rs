use std::time::Duration;
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod pipeline;
pub mod summarizer;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use pipeline::summarize_text;
pub use summarizer::{Cohere, SummarizerBackend};

/// Number of characters of extracted text forwarded to the summarizer.
/// Anything past this boundary is dropped.
pub const MAX_INPUT_CHARS: usize = 4000;

/// Returned in place of a summary when the service answers without one.
pub const FALLBACK_SUMMARY: &str = "No summary returned.";

/// Default base URL of the summarization service.
pub const DEFAULT_SUMMARIZER_URL: &str = "https://api.cohere.ai";

/// The document formats the extraction pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Derive the kind from a filename's extension (text after the last `.`,
    /// compared case-insensitively).
    ///
    /// Returns `None` for names without a dot and for any other extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// The outcome of one summarization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub summary: String,
    /// Characters of extracted text before truncation.
    pub input_chars: usize,
    /// The extracted text was longer than [`MAX_INPUT_CHARS`].
    pub truncated: bool,
    /// The service returned no summary and [`FALLBACK_SUMMARY`] was used.
    pub fallback: bool,
}

/// Errors raised between "text is extracted" and "summary is ready".
///
/// The `Display` text of each variant is the message shown to users.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("No text extracted from file.")]
    EmptyText,
    #[error("{backend} API key is not set in environment variables.")]
    MissingApiKey { backend: String },
    #[error("{backend} API error")]
    Upstream { backend: String, detail: String },
    #[error("{backend} API request timed out.")]
    Timeout { backend: String },
    #[error("Request cancelled.")]
    Cancelled,
}

impl SummarizeError {
    /// Whether the caller (rather than the server or upstream) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SummarizeError::EmptyText)
    }
}

/// Cut `text` to its first `max_chars` characters.
///
/// Returns the (possibly borrowed) prefix and whether anything was dropped.
/// Characters are Unicode scalar values, so the cut never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Runtime configuration for the summarization side of the pipeline.
#[derive(Clone)]
pub struct Config {
    pub cohere_api_key: Option<String>,
    pub summarizer_base_url: String,
    pub summarizer_timeout_secs: u64,
    pub max_upload_mb: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("cohere_api_key", &self.cohere_api_key.as_ref().map(|_| "***"))
            .field("summarizer_base_url", &self.summarizer_base_url)
            .field("summarizer_timeout_secs", &self.summarizer_timeout_secs)
            .field("max_upload_mb", &self.max_upload_mb)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cohere_api_key: None,
            summarizer_base_url: DEFAULT_SUMMARIZER_URL.to_string(),
            summarizer_timeout_secs: 60,
            max_upload_mb: 10,
        }
    }
}

impl Config {
    /// Build a config from the on-disk file, falling back to defaults for
    /// anything the file leaves unset.
    pub fn from_file(file: &config_file::ConfigFile) -> Self {
        let defaults = Config::default();
        Self {
            cohere_api_key: file
                .api_keys
                .as_ref()
                .and_then(|a| a.cohere_api_key.clone())
                .filter(|k| !k.is_empty()),
            summarizer_base_url: file
                .summarizer
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .unwrap_or(defaults.summarizer_base_url),
            summarizer_timeout_secs: file
                .summarizer
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .unwrap_or(defaults.summarizer_timeout_secs),
            max_upload_mb: file
                .server
                .as_ref()
                .and_then(|s| s.max_upload_mb)
                .unwrap_or(defaults.max_upload_mb),
        }
    }

    pub fn summarizer_timeout(&self) -> Duration {
        Duration::from_secs(self.summarizer_timeout_secs)
    }

    /// Upload size limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }

    /// The summarization backend described by this config.
    pub fn summarizer(&self) -> Cohere {
        Cohere {
            api_key: self.cohere_api_key.clone(),
            base_url: self.summarizer_base_url.clone(),
        }
    }
}
