//! Raster ingress/egress and JSON helpers.
//!
//! - `decode_payload`: base64 text (optionally a data URL) to a [`RasterImage`].
//! - `decode_bytes` / `load_raster`: encoded bytes or a file to a raster.
//! - `encode_image`: a frame to PNG or JPEG bytes.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RasterImage;
use crate::error::{AnalysisError, AnalysisResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Interchange format for an encoded frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Png,
    Jpeg { quality: u8 },
}

impl FrameFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Remove a `data:<mime>;base64,` style marker and any embedded whitespace.
pub fn strip_payload_marker(payload: &str) -> String {
    let body = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };
    body.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Decode a base64 payload, optionally prefixed with a data-URL marker.
pub fn decode_payload(payload: &str) -> AnalysisResult<RasterImage> {
    let body = strip_payload_marker(payload);
    if body.is_empty() {
        return Err(AnalysisError::invalid_image("empty payload"));
    }
    let bytes = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| AnalysisError::invalid_image(format!("base64 decode: {e}")))?;
    decode_bytes(&bytes)
}

/// Decode an encoded raster in any supported format.
pub fn decode_bytes(bytes: &[u8]) -> AnalysisResult<RasterImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::invalid_image(format!("raster decode: {e}")))?;
    let raster = RasterImage::from_dynamic(img);
    if raster.area() == 0 {
        return Err(AnalysisError::invalid_image("decoded raster has zero area"));
    }
    Ok(raster)
}

/// Load a raster from disk.
pub fn load_raster(path: &Path) -> AnalysisResult<RasterImage> {
    let bytes = fs::read(path)
        .map_err(|e| AnalysisError::io(format!("Failed to open {}: {e}", path.display())))?;
    decode_bytes(&bytes)
}

/// Encode a frame to bytes in the requested format.
pub fn encode_image(img: &DynamicImage, format: FrameFormat) -> AnalysisResult<Vec<u8>> {
    let mut buf = Vec::new();
    let written = match format {
        FrameFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        FrameFormat::Jpeg { quality } => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
        }
    };
    written.map_err(|e| AnalysisError::encode(format!("{}: {e}", format.extension())))?;
    Ok(buf)
}

/// Base64 (standard alphabet, padded) of encoded bytes.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> AnalysisResult<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        AnalysisError::io(format!("Failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)
        .map_err(|e| AnalysisError::io(format!("Failed to write JSON {}: {e}", path.display())))
}

/// Write raw bytes to `path`, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> AnalysisResult<()> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes)
        .map_err(|e| AnalysisError::io(format!("Failed to write {}: {e}", path.display())))
}

fn ensure_parent_dir(path: &Path) -> AnalysisResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                AnalysisError::io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn png_payload() -> String {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(6, 4, Luma([200])));
        to_base64(&encode_image(&img, FrameFormat::Png).unwrap())
    }

    #[test]
    fn data_url_marker_is_stripped() {
        assert_eq!(strip_payload_marker("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_payload_marker("QU\nJD "), "QUJD");
    }

    #[test]
    fn payload_with_and_without_marker_decodes_identically() {
        let plain = png_payload();
        let marked = format!("data:image/png;base64,{plain}");
        let a = decode_payload(&plain).unwrap();
        let b = decode_payload(&marked).unwrap();
        assert_eq!(a, b);
        assert_eq!((a.width(), a.height()), (6, 4));
    }

    #[test]
    fn garbage_payload_is_invalid_image() {
        let err = decode_payload("data:image/png;base64,!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
        let err = decode_payload(&to_base64(b"plain text, not a raster")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
        assert!(matches!(
            decode_payload("   ").unwrap_err(),
            AnalysisError::InvalidImage(_)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_raster(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)), "{err}");
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn jpeg_frames_carry_jpeg_magic() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([10])));
        let bytes = encode_image(&img, FrameFormat::Jpeg { quality: 90 }).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
