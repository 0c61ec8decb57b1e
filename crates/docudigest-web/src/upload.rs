use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use docudigest_ingest::DocumentKind;

/// Name of the form field carrying the document.
pub const FILE_FIELD: &str = "files";

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Document kind derived from the client-supplied filename.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_filename(&self.filename)
    }

    /// Lowercased text after the last `.`, if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }

    /// Write the upload into `dir` and return the path.
    ///
    /// The client filename is never used as a path component; only a
    /// recognized extension is carried over so the saved name is predictable.
    pub async fn persist(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let name = match self.kind() {
            Some(kind) => format!("upload.{}", kind.extension()),
            None => "upload".to_string(),
        };
        let path = dir.join(name);
        tokio::fs::write(&path, &self.data).await?;
        Ok(path)
    }
}

/// Pull the first file out of a multipart upload.
///
/// Only parts named [`FILE_FIELD`] with a non-empty filename count; any
/// further files and unknown fields are read and discarded. Returns `None`
/// when no such part exists.
pub async fn parse_multipart(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, MultipartError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let is_file = field.name() == Some(FILE_FIELD)
            && field.file_name().is_some_and(|n| !n.is_empty());

        if is_file && file.is_none() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?.to_vec();
            tracing::debug!(filename = %filename, bytes = data.len(), "received upload");
            file = Some(UploadedFile { filename, data });
        } else {
            // Ignore extra files and unknown fields
            field.bytes().await?;
        }
    }

    Ok(file)
}
