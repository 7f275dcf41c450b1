use crate::{
    error::{ImageGenError, Result},
    media::source::SourceImage,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encodes the image as `data:<mime>;base64,<payload>` using the declared
/// MIME type. Pixel data is passed through untouched.
pub async fn encode(source: &SourceImage) -> Result<String> {
    let bytes = source.read_bytes().await?;
    let uri = format!("data:{};base64,{}", source.mime_type, STANDARD.encode(&bytes));

    log::debug!(
        "Encoded {} ({} bytes) into a {}KB data URI",
        source.name,
        bytes.len(),
        uri.len() / 1024
    );

    Ok(uri)
}

pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageGenError::Encoding("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageGenError::Encoding("data URI has no payload".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageGenError::Encoding("data URI is not base64 encoded".into()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| ImageGenError::Encoding(e.to_string()))?;

    Ok((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10x10 RGB PNG.
    const PNG_10X10: &str = "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAIAAAACUFjqAAAAEklEQVR4nGP438CAB+GTG8HSAP+MlZ2RrjBvAAAAAElFTkSuQmCC";

    #[tokio::test]
    async fn test_png_survives_encoding() {
        let original = STANDARD.decode(PNG_10X10).unwrap();
        let image = SourceImage::from_bytes("tiny.png", "image/png", original.clone());

        let uri = encode(&image).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let (mime, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, original);
    }

    #[tokio::test]
    async fn test_declared_mime_is_preserved() {
        let image = SourceImage::from_bytes("photo.bin", "image/webp", vec![0xde, 0xad]);
        let uri = encode(&image).await.unwrap();
        assert_eq!(uri, "data:image/webp;base64,3q0=");
    }

    #[test]
    fn test_decode_rejects_malformed_uris() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png,rawtext").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }
}
