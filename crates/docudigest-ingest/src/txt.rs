use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a plain-text file as UTF-8.
///
/// A leading byte-order mark is dropped. Invalid sequences are replaced with
/// U+FFFD instead of failing, so only I/O errors are reported.
pub fn read_text_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                valid_up_to = e.valid_up_to(),
                "text file is not valid UTF-8, decoding lossily"
            );
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        std::fs::write(&path, b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "hello");
    }

    #[test]
    fn bom_only_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        std::fs::write(&path, UTF8_BOM).unwrap();
        assert!(read_text_file(&path).unwrap().trim().is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xE9 au lait").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "caf\u{FFFD} au lait");
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(read_text_file(Path::new("/nonexistent/notes.txt")).is_err());
    }
}
