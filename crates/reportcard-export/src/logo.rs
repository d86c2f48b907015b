//! Logo and raster decoding.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, ImageFormat};
use reportcard_core::models::record::Logo;

use crate::error::ExportError;

/// A decoded image split into the planes a PDF image XObject wants.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB samples, row major.
    pub rgb: Vec<u8>,
    /// 8-bit alpha samples when the source has transparency.
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let alpha = image.color().has_alpha().then(|| {
            image
                .to_rgba8()
                .pixels()
                .map(|p| p.0[3])
                .collect::<Vec<u8>>()
        });
        Self {
            width,
            height,
            rgb: image.to_rgb8().into_raw(),
            alpha,
        }
    }

    /// Height over width.
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width.max(1) as f32
    }
}

/// Raw bytes of a logo, decoding `data:` URIs.
pub fn logo_bytes(logo: &Logo) -> Result<Vec<u8>, ExportError> {
    match logo {
        Logo::DataUri(uri) => decode_data_uri(uri),
        Logo::File(path) => std::fs::read(path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        }),
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ExportError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::Logo("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::Logo("data URI has no payload".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(ExportError::Logo(format!(
            "unsupported data URI encoding '{header}'"
        )));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| ExportError::Logo(e.to_string()))
}

/// Decode PNG or JPEG bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ExportError> {
    if bytes.is_empty() {
        return Err(ExportError::Image("empty image".to_string()));
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Decode a logo into PDF-ready planes.
pub fn load_logo(logo: &Logo) -> Result<RasterImage, ExportError> {
    let image = decode_image(&logo_bytes(logo)?)?;
    Ok(RasterImage::from_dynamic(&image))
}

/// Re-encode a logo as PNG, whatever its source format.
pub fn logo_png(logo: &Logo) -> Result<Vec<u8>, ExportError> {
    let image = decode_image(&logo_bytes(logo)?)?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_requires_base64() {
        let err = decode_data_uri("data:image/png,plain").unwrap_err();
        assert!(matches!(err, ExportError::Logo(_)));
    }

    #[test]
    fn data_uri_payload_is_decoded() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn garbage_does_not_decode_as_image() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(ExportError::Image(_))
        ));
    }
}
