use std::path::Path;

use thiserror::Error;

pub mod docx;
pub mod txt;

// Re-export domain types for convenience
pub use docudigest_core::{BackendError, DocumentKind, PdfBackend};
pub use docx::DocxError;

/// Extraction failures.
///
/// The `Display` text of each variant is the message shown to users; the
/// underlying cause is available through `source()` for logging.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to parse PDF file.")]
    Pdf(#[source] BackendError),
    #[error("Failed to parse DOCX file.")]
    Docx(#[source] DocxError),
    #[error("Failed to read TXT file.")]
    Txt(#[source] std::io::Error),
    #[error("Unsupported file type")]
    Unsupported { extension: Option<String> },
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of docudigest-ingest)")]
    NoPdfSupport,
}

impl IngestError {
    /// Whether the caller (rather than the server) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestError::Unsupported { .. })
    }
}

/// Extract plain text from a document whose kind is already known.
///
/// Dispatches to the matching reader:
/// - `Pdf` → PDF backend (requires `pdf` feature)
/// - `Docx` → raw paragraph text of `word/document.xml`
/// - `Txt` → UTF-8 decode
pub fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, IngestError> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(path)?,
        DocumentKind::Docx => docx::extract_text_from_docx(path).map_err(IngestError::Docx)?,
        DocumentKind::Txt => txt::read_text_file(path).map_err(IngestError::Txt)?,
    };
    tracing::debug!(
        path = %path.display(),
        kind = %kind,
        chars = text.chars().count(),
        "extraction complete"
    );
    Ok(text)
}

/// Extract plain text from a document, deriving its kind from the file name.
///
/// Returns the derived kind alongside the text.
pub fn extract_text_from_path(path: &Path) -> Result<(DocumentKind, String), IngestError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let kind = DocumentKind::from_filename(&name).ok_or_else(|| IngestError::Unsupported {
        extension: name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()),
    })?;
    Ok((kind, extract_text(path, kind)?))
}

/// Same as [`extract_text`] with a caller-supplied PDF backend.
pub fn extract_text_with_backend(
    path: &Path,
    kind: DocumentKind,
    pdf_backend: &dyn PdfBackend,
) -> Result<String, IngestError> {
    match kind {
        DocumentKind::Pdf => pdf_backend.extract_text(path).map_err(IngestError::Pdf),
        _ => extract_text(path, kind),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    let backend = docudigest_pdf::PdfExtractBackend::new();
    backend.extract_text(path).map_err(IngestError::Pdf)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
