use crate::error::{ImageGenError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum ImageData {
    Memory(Vec<u8>),
    /// Read when the image is encoded.
    File(PathBuf),
}

/// A user-supplied image with its declared MIME type and byte size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub data: ImageData,
}

impl SourceImage {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            data: ImageData::Memory(bytes),
        }
    }

    /// Stats the file and guesses its MIME type from the extension. Contents
    /// are not read until encoding.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            ImageGenError::Encoding(format!("cannot stat {}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
            data: ImageData::File(path.to_path_buf()),
        })
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.data {
            ImageData::Memory(bytes) => Ok(bytes.clone()),
            ImageData::File(path) => tokio::fs::read(path).await.map_err(|e| {
                ImageGenError::Encoding(format!("failed to read {}: {}", path.display(), e))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_path_guesses_mime_and_size() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[1, 2, 3, 4, 5]).unwrap();

        let image = SourceImage::from_path(file.path()).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size, 5);
        assert!(image.name.ends_with(".png"));
        assert_eq!(image.read_bytes().await.unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = SourceImage::from_path("/definitely/not/here.jpg")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "Encoding");
    }

    #[tokio::test]
    async fn test_read_after_file_removed() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let image = SourceImage::from_path(file.path()).await.unwrap();
        drop(file);

        let err = image.read_bytes().await.unwrap_err();
        assert!(matches!(err, ImageGenError::Encoding(_)));
    }
}
