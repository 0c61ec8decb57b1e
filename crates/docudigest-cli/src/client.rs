use std::path::{Path, PathBuf};

use docudigest_core::DocumentKind;
use serde::Deserialize;

pub const NOT_ALLOWED: &str = "Only PDF, DOCX, or TXT files are allowed.";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected server error. Please try again.";
pub const SUMMARIZE_FAILED: &str = "Failed to summarize";

#[derive(Deserialize)]
struct SummaryBody {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Terminal counterpart of the browser upload page.
///
/// Holds the same view state (selected file, error, loading flag, summary)
/// and applies the same selection and response-handling rules.
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
    pub selected: Option<PathBuf>,
    pub error: Option<String>,
    pub loading: bool,
    pub summary: Option<String>,
}

impl UploadClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/summarize", server.trim_end_matches('/')),
            selected: None,
            error: None,
            loading: false,
            summary: None,
        }
    }

    /// Select `path` for upload. Returns whether it was accepted.
    ///
    /// A rejected file clears the selection and sets the error; an existing
    /// summary is left alone.
    pub fn select_file(&mut self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if DocumentKind::from_filename(&name).is_none() {
            self.selected = None;
            self.error = Some(NOT_ALLOWED.to_string());
            return false;
        }
        if !path.is_file() {
            self.selected = None;
            self.error = Some(format!("File not found: {}", path.display()));
            return false;
        }

        self.selected = Some(path.to_path_buf());
        self.error = None;
        true
    }

    /// Upload the selected file and record the outcome.
    ///
    /// Does nothing without a selection. `loading` is cleared on every path.
    pub async fn submit(&mut self) {
        let Some(path) = self.selected.clone() else {
            return;
        };

        self.loading = true;
        self.error = None;
        self.summary = None;

        match self.send(&path).await {
            Ok(summary) => self.summary = Some(summary),
            Err(message) => self.error = Some(message),
        }

        self.loading = false;
    }

    async fn send(&self, path: &Path) -> Result<String, String> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let part = reqwest::multipart::Part::bytes(data).file_name(filename);
        let form = reqwest::multipart::Form::new().part("files", part);

        let resp = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, endpoint = %self.endpoint, "upload failed");
                format!("{}: {}", SUMMARIZE_FAILED, e)
            })?;

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            tracing::debug!(status = status.as_u16(), "non-JSON response");
            return Err(UNEXPECTED_RESPONSE.to_string());
        }

        if !status.is_success() {
            let body: Option<ErrorBody> = resp.json().await.ok();
            return Err(body
                .and_then(|b| b.error)
                .unwrap_or_else(|| SUMMARIZE_FAILED.to_string()));
        }

        let body: SummaryBody = resp
            .json()
            .await
            .map_err(|_| SUMMARIZE_FAILED.to_string())?;
        Ok(body.summary.unwrap_or_default())
    }
}
