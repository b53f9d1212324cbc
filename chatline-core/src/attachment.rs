//! Inline encoding of local files for image attachments

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::warn;

/// Read a file and encode its bytes as strict (padded) base64.
///
/// Returns `None` when the file does not exist or cannot be read; the
/// problem is logged rather than raised.
pub fn encode_file_as_base64<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    if !path.is_file() {
        warn!("File not found: <{}>", path.display());
        return None;
    }

    match std::fs::read(path) {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(e) => {
            warn!("Failed to read <{}>: {}", path.display(), e);
            None
        }
    }
}

/// Encode a file as a `data:` URI suitable for an `image_url` content part
pub fn image_data_uri<P: AsRef<Path>>(path: P) -> Option<String> {
    encode_file_as_base64(path).map(|data| format!("data:image/png;base64,{}", data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_encode_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pixel.png");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(encode_file_as_base64(&path).as_deref(), Some("aGVsbG8="));
        assert_eq!(
            image_data_uri(&path).as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
    }

    #[test]
    fn test_encode_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(encode_file_as_base64(temp_dir.path().join("nope.png")).is_none());
        assert!(image_data_uri(temp_dir.path().join("nope.png")).is_none());
    }

    #[test]
    fn test_encode_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(encode_file_as_base64(temp_dir.path()).is_none());
    }
}
