use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tracing::debug;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Turns uploaded images into data-URIs stored inline on the profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageService;

impl ImageService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `data:<mime>;base64,<payload>`. The mime comes from `content_type` when
    /// given, else it is guessed from `file_name`.
    #[must_use]
    pub fn encode_data_uri(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> String {
        let mime = content_type
            .filter(|ct| !ct.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                file_name.and_then(|name| mime_guess::from_path(name).first_raw().map(str::to_string))
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        debug!(mime = %mime, size = bytes.len(), "Encoding image upload");
        format!("data:{mime};base64,{}", STANDARD.encode(bytes))
    }

    /// Reads a local file and encodes it, guessing the mime from its name.
    pub async fn encode_file(&self, path: &Path) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read image {}: {e}", path.display()))?;
        let name = path.file_name().and_then(|n| n.to_str());
        Ok(self.encode_data_uri(&bytes, None, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_wins() {
        let uri = ImageService::new().encode_data_uri(b"abc", Some("image/png"), Some("x.jpg"));
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_mime_guessed_from_name() {
        let uri = ImageService::new().encode_data_uri(b"abc", None, Some("photo.jpg"));
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let uri = ImageService::new().encode_data_uri(&[], None, None);
        assert_eq!(uri, "data:application/octet-stream;base64,");
    }

    #[tokio::test]
    async fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.png");
        tokio::fs::write(&path, [1u8, 2, 3]).await.unwrap();

        let uri = ImageService::new().encode_file(&path).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,AQID");
    }
}
