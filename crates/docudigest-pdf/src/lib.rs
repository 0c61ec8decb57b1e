use std::path::Path;

use docudigest_core::{BackendError, PdfBackend};

/// [`PdfBackend`] built on the pure-Rust `pdf-extract` crate.
///
/// This crate isolates the PDF parser so that non-PDF code paths do not
/// transitively depend on it.
///
/// Typographic ligatures (ﬁ, ﬂ, ...) are expanded after extraction.
#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PdfExtractBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let bytes = std::fs::read(path)?;
        if !bytes.starts_with(b"%PDF-") {
            return Err(BackendError::OpenError("missing %PDF- header".into()));
        }

        // pdf-extract panics on some malformed inputs instead of erroring.
        let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "parser panicked".to_string());
                BackendError::ExtractionError(msg)
            })?
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            chars = extracted.chars().count(),
            "extracted PDF text"
        );

        Ok(expand_ligatures(&extracted))
    }
}

/// Replace Unicode ligature code points with their letter sequences.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligatures_expanded() {
        assert_eq!(expand_ligatures("e\u{FB03}cient \u{FB02}ow"), "efficient flow");
        assert_eq!(expand_ligatures("plain"), "plain");
    }

    #[test]
    fn non_pdf_bytes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"just some text pretending to be a PDF").unwrap();

        let err = PdfExtractBackend::new().extract_text(&path).unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)));
    }

    #[test]
    fn truncated_pdf_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog").unwrap();

        assert!(PdfExtractBackend::new().extract_text(&path).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PdfExtractBackend::new()
            .extract_text(Path::new("/nonexistent/file.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
