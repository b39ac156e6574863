//! Asset loader – resolves logo and line-item photo sources into embeddable
//! JPEG bytes plus pixel dimensions.
//!
//! Accepted sources:
//! - `data:<mime>;base64,...` URIs
//! - `http://` / `https://` URLs (blocking fetch via ureq)
//! - anything else is treated as a local file path
//!
//! Per-item loads fan out in parallel and join before layout starts, since
//! layout needs final pixel dimensions to flow text around photos. Failures
//! here are soft: the caller logs and renders without the image.

use std::collections::HashMap;
use std::io::Read;

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use image::imageops::FilterType;
use rayon::prelude::*;

use crate::model::LineItem;

/// Sources wider than this are proportionally downsampled before encoding,
/// to bound memory and output file size.
pub const MAX_SOURCE_WIDTH_PX: u32 = 800;

/// Quality for the JPEG re-encode of every accepted source.
pub const JPEG_QUALITY: u8 = 85;

/// Cap on fetched/raw image payloads (guards against a runaway remote body).
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("http fetch failed: {0}")]
    Fetch(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid data URI: {0}")]
    DataUri(String),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// A decoded, downscaled, re-encoded image ready for PDF embedding. Cached
/// per line item for the duration of one render, never persisted.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// JPEG-encoded bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Resolve one image source end to end.
pub fn load_image(source: &str) -> Result<LoadedImage, ImageLoadError> {
    let raw = fetch_bytes(source)?;
    let mut img = image::load_from_memory(&raw)?;

    if img.width() > MAX_SOURCE_WIDTH_PX {
        log::debug!(
            "Downscaling image ({} px wide) from {source}",
            img.width()
        );
        img = img.resize(MAX_SOURCE_WIDTH_PX, u32::MAX, FilterType::Triangle);
    }

    // JPEG carries no alpha channel; flatten whatever the source was.
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width(), rgb.height());

    let mut bytes = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;

    Ok(LoadedImage {
        bytes,
        width,
        height,
    })
}

/// Load photos for all line items concurrently. A failed load drops out of
/// the map with a warning; the item renders in text-only mode.
pub fn load_item_images(items: &[LineItem]) -> HashMap<String, LoadedImage> {
    items
        .par_iter()
        .filter_map(|item| {
            let url = item.image_url.as_deref()?;
            match load_image(url) {
                Ok(img) => Some((item.id.clone(), img)),
                Err(e) => {
                    log::warn!("Skipping photo for item '{}' — {e}", item.name);
                    None
                }
            }
        })
        .collect()
}

fn fetch_bytes(source: &str) -> Result<Vec<u8>, ImageLoadError> {
    if source.starts_with("data:") {
        return decode_data_uri(source);
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .call()
            .map_err(|e| ImageLoadError::Fetch(e.to_string()))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES)
            .read_to_end(&mut bytes)?;
        return Ok(bytes);
    }
    Ok(std::fs::read(source)?)
}

/// Parse a `data:<mime>;base64,<data>` URI and return the raw decoded bytes.
fn decode_data_uri(src: &str) -> Result<Vec<u8>, ImageLoadError> {
    let rest = &src["data:".len()..];
    let comma_pos = rest.find(',').ok_or_else(|| {
        ImageLoadError::DataUri("missing `,` separator between header and data".to_string())
    })?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err(ImageLoadError::DataUri(
            "only base64-encoded data URIs are supported".to_string(),
        ));
    }
    Ok(BASE64_STD.decode(rest[comma_pos + 1..].trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageMode;

    /// Build a tiny in-memory PNG and wrap it in a data URI.
    fn png_data_uri(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .unwrap();
        format!("data:image/png;base64,{}", BASE64_STD.encode(&png))
    }

    fn item_with_url(id: &str, url: Option<String>) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: String::new(),
            price: 1000.0,
            features: vec![],
            specs: vec![],
            image_url: url,
            image_mode: ImageMode::Wide,
            addons: vec![],
        }
    }

    #[test]
    fn data_uri_round_trip() {
        let loaded = load_image(&png_data_uri(12, 8)).unwrap();
        assert_eq!((loaded.width, loaded.height), (12, 8));
        // JPEG magic
        assert_eq!(&loaded.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn oversized_source_is_downscaled() {
        let loaded = load_image(&png_data_uri(1600, 400)).unwrap();
        assert_eq!(loaded.width, MAX_SOURCE_WIDTH_PX);
        assert_eq!(loaded.height, 200);
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        let err = load_image("data:image/png,rawdata").unwrap_err();
        assert!(matches!(err, ImageLoadError::DataUri(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_image("/no/such/image.png").unwrap_err();
        assert!(matches!(err, ImageLoadError::Io(_)));
    }

    #[test]
    fn item_fan_out_skips_failures() {
        let items = vec![
            item_with_url("a", Some(png_data_uri(10, 10))),
            item_with_url("b", Some("/no/such/photo.jpg".to_string())),
            item_with_url("c", None),
        ];
        let map = load_item_images(&items);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("a"));
    }
}
