use std::sync::Arc;

use docudigest_core::{Config, PdfBackend, SummarizerBackend};
use docudigest_ingest::DocumentKind;
use tokio_util::sync::CancellationToken;

/// Shared application state accessible from all handlers.
///
/// Read-only after startup; requests never share anything mutable.
pub struct AppState {
    pub config: Config,
    pub summarizer: Arc<dyn SummarizerBackend>,
    pub pdf_backend: Arc<dyn PdfBackend>,
    pub client: reqwest::Client,
    /// Cancelled on graceful shutdown.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, shutdown: CancellationToken) -> Self {
        let summarizer = Arc::new(config.summarizer());
        Self {
            config,
            summarizer,
            pdf_backend: Arc::new(DefaultPdf),
            client: reqwest::Client::new(),
            shutdown,
        }
    }
}

/// Routes PDFs through the ingest crate's compiled-in backend.
struct DefaultPdf;

impl PdfBackend for DefaultPdf {
    fn extract_text(
        &self,
        path: &std::path::Path,
    ) -> Result<String, docudigest_core::BackendError> {
        docudigest_ingest::extract_text(path, DocumentKind::Pdf).map_err(|e| match e {
            docudigest_ingest::IngestError::Pdf(inner) => inner,
            other => docudigest_core::BackendError::ExtractionError(other.to_string()),
        })
    }
}
