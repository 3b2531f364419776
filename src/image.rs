//! # Image Payload Decoding and Placement
//!
//! Meal photos arrive as data URIs or raw base64. JPEG bytes pass through to
//! the PDF untouched (DCTDecode is native); PNG is decoded to RGB pixels with
//! a separate alpha channel for SMask transparency.
//!
//! Two failure shapes, handled differently by the composer: a payload with
//! nothing decodable behind it (`payload_bytes` → `None`) gets the placeholder
//! figure, while real bytes that are not a supported raster format
//! (`decode_image` → `Err`) abort the render.

use std::io::Cursor;

/// A decoded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// Pixel data in the form the PDF serializer consumes directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes — embedded with DCTDecode.
    Jpeg { data: Vec<u8>, grayscale: bool },
    /// Decoded RGB pixels + optional alpha channel for an SMask.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// Resolve an encoded payload to raw bytes.
///
/// Accepts `data:<mime>;base64,<data>` URIs and bare base64 strings. Returns
/// `None` when there is nothing decodable — a data URI without a base64
/// marker or comma, or base64 that does not parse. That is the recoverable
/// "no photo" case, not an error.
pub fn payload_bytes(payload: &str) -> Option<Vec<u8>> {
    if let Some(rest) = payload.strip_prefix("data:") {
        let (meta, b64_data) = rest.split_once(',')?;
        if !meta.to_ascii_lowercase().contains(";base64") {
            return None;
        }
        return base64_decode(b64_data.trim());
    }
    base64_decode(payload)
}

fn base64_decode(input: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(input).ok()
}

/// Detect the raster format from magic bytes and decode accordingly.
pub fn decode_image(data: &[u8]) -> Result<LoadedImage, String> {
    if data.len() < 4 {
        return Err("image data too short".to_string());
    }
    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err("unsupported image format (expected JPEG or PNG)".to_string())
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47]
}

/// JPEG: read dimensions and component count without decoding pixels; the
/// raw bytes are embedded as-is.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("JPEG format detection error: {}", e))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| format!("failed to read JPEG dimensions: {}", e))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            grayscale: jpeg_is_grayscale(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG segments for the SOF marker and read the component count.
/// One component means DeviceGray; anything else is treated as RGB.
fn jpeg_is_grayscale(data: &[u8]) -> bool {
    let mut i = 2; // skip SOI
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof {
            return i + 9 < data.len() && data[i + 9] == 1;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    false
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<LoadedImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("PNG format detection error: {}", e))?;
    let img = reader
        .decode()
        .map_err(|e| format!("failed to decode PNG: {}", e))?;

    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: has_transparency.then_some(alpha),
        },
        width_px: width,
        height_px: height,
    })
}

// ─── Placement ──────────────────────────────────────────────────

/// An axis-aligned box in page points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fit an image of intrinsic pixel size into `bounds`, preserving aspect
/// ratio and centering on both axes. Never scales past native resolution —
/// a tiny photo sits centered at its own size instead of blowing up.
pub fn fit_rect(intrinsic_w: f64, intrinsic_h: f64, bounds: Rect) -> Rect {
    let scale = (bounds.width / intrinsic_w)
        .min(bounds.height / intrinsic_h)
        .min(1.0);
    let width = intrinsic_w * scale;
    let height = intrinsic_h * scale;
    Rect {
        x: bounds.x + (bounds.width - width) / 2.0,
        y: bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba(rgba));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 1, 1, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_payload_bytes_data_uri() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let bytes = payload_bytes(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_payload_bytes_rejects_non_base64_uri() {
        assert!(payload_bytes("data:image/png;base64").is_none());
        assert!(payload_bytes("data:image/svg+xml,<svg/>").is_none());
        assert!(payload_bytes("!!not base64!!").is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_format() {
        assert!(decode_image(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
        assert!(decode_image(&[0x00]).is_err());
    }

    #[test]
    fn test_decode_opaque_png() {
        let loaded = decode_image(&png_bytes([255, 0, 0, 255])).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (1, 1));
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert!(alpha.is_none(), "fully opaque should carry no alpha");
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let loaded = decode_image(&png_bytes([0, 255, 0, 128])).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { alpha, .. } => {
                assert_eq!(alpha.as_ref().unwrap(), &[128]);
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_decode_jpeg_passthrough() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = decode_image(&buf).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (2, 2));
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, grayscale } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert!(!grayscale);
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn test_fit_wide_image_letterboxes() {
        let bounds = Rect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 };
        let placed = fit_rect(200.0, 100.0, bounds);
        assert!((placed.width - 100.0).abs() < 1e-9);
        assert!((placed.height - 50.0).abs() < 1e-9);
        assert!((placed.y - 25.0).abs() < 1e-9, "centered vertically");
    }

    #[test]
    fn test_fit_never_upscales() {
        let bounds = Rect { x: 10.0, y: 10.0, width: 100.0, height: 100.0 };
        let placed = fit_rect(20.0, 10.0, bounds);
        assert_eq!((placed.width, placed.height), (20.0, 10.0));
        assert!((placed.x - 50.0).abs() < 1e-9);
        assert!((placed.y - 55.0).abs() < 1e-9);
    }
}
