//! Surface import/export.
//!
//! Exports the surface as PNG, optionally base64 or data-URI wrapped, and
//! imports base64 payloads or data URIs like `data:image/png;base64,iVBORw0KGgo...`.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::Surface;

/// Encode the surface as PNG bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(surface: &Surface) -> RenderResult<Vec<u8>> {
    let img = RgbaImage::from_raw(surface.width(), surface.height(), surface.as_raw().to_vec())
        .ok_or_else(|| RenderError::ImageEncode("Surface buffer size mismatch".to_string()))?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| RenderError::ImageEncode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode the surface as base64 PNG.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export_png_base64(surface: &Surface) -> RenderResult<String> {
    let png = encode_png(surface)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}

/// Encode the surface as a `data:image/png;base64,` URI.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export_data_uri(surface: &Surface) -> RenderResult<String> {
    Ok(format!("data:image/png;base64,{}", export_png_base64(surface)?))
}

/// Decode a base64 payload or base64 data URI into an RGBA image.
///
/// # Errors
///
/// Returns [`RenderError::ImageDecode`] if the payload is not valid base64
/// or does not contain a decodable image.
pub fn decode_base64_image(payload: &str) -> RenderResult<RgbaImage> {
    let (declared, encoded) = strip_data_uri(payload)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| RenderError::ImageDecode(format!("Failed to decode base64: {e}")))?;

    // The bytes decide the decoder; a data URI's MIME type is only a label.
    let format = image::guess_format(&bytes)
        .map_err(|e| RenderError::ImageDecode(format!("Unrecognised image data: {e}")))?;
    if declared.is_some_and(|d| d != format) {
        tracing::warn!("Data URI declares {declared:?} but payload is {format:?}");
    }

    let img = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| RenderError::ImageDecode(format!("{format:?} payload: {e}")))?;
    Ok(img.to_rgba8())
}

/// Decode `payload` and draw it over the whole surface.
///
/// The image is resampled to the surface size and composited over the
/// background, replacing all prior content. On error the surface is untouched.
///
/// # Errors
///
/// Returns [`RenderError::ImageDecode`] if the payload cannot be decoded.
pub fn import_base64(surface: &mut Surface, payload: &str) -> RenderResult<()> {
    let decoded = decode_base64_image(payload)?;
    let (width, height) = (surface.width(), surface.height());

    let img = if decoded.dimensions() == (width, height) {
        decoded
    } else {
        tracing::debug!(
            "Resampling imported {}x{} image to {}x{}",
            decoded.width(),
            decoded.height(),
            width,
            height
        );
        image::imageops::resize(
            &decoded,
            width,
            height,
            image::imageops::FilterType::Triangle,
        )
    };

    surface.clear();
    let background = surface.background().channels();
    for (dst, src) in surface
        .pixels_mut()
        .chunks_exact_mut(4)
        .zip(img.as_raw().chunks_exact(4))
    {
        let alpha = u16::from(src[3]);
        for c in 0..3 {
            let blended = u16::from(src[c]) * alpha + u16::from(background[c]) * (255 - alpha);
            #[allow(clippy::cast_possible_truncation)]
            {
                dst[c] = ((blended + 127) / 255) as u8;
            }
        }
        dst[3] = 255;
    }
    Ok(())
}

/// Split a data URI into its declared image format and base64 body.
///
/// Bare base64 passes through with no declared format.
fn strip_data_uri(payload: &str) -> RenderResult<(Option<ImageFormat>, &str)> {
    let Some(rest) = payload.trim_start().strip_prefix("data:") else {
        return Ok((None, payload));
    };

    let comma = rest
        .find(',')
        .ok_or_else(|| RenderError::ImageDecode("Invalid data URI: missing comma".to_string()))?;
    let metadata = &rest[..comma];
    if !metadata.contains(";base64") {
        return Err(RenderError::ImageDecode(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    let mime = metadata.split(';').next().unwrap_or_default();
    let declared = ImageFormat::from_mime_type(mime.to_lowercase());
    if declared.is_none() {
        tracing::warn!("Importing data URI with unrecognised MIME type {mime:?}");
    }
    Ok((declared, &rest[comma + 1..]))
}

#[cfg(test)]
mod tests {
    use stroke_core::Rgb;

    use super::*;

    // 1x1 opaque red PNG.
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_data_uri_declares_format() {
        let uri = format!("data:IMAGE/PNG;base64,{RED_PIXEL_PNG}");
        let (declared, body) = strip_data_uri(&uri).unwrap();
        assert_eq!(declared, Some(ImageFormat::Png));
        assert_eq!(body, RED_PIXEL_PNG);

        let (declared, body) = strip_data_uri(RED_PIXEL_PNG).unwrap();
        assert_eq!(declared, None);
        assert_eq!(body, RED_PIXEL_PNG);

        let (declared, _) = strip_data_uri("data:text/plain;base64,aGk=").unwrap();
        assert_eq!(declared, None);
    }

    #[test]
    fn test_payload_bytes_override_declared_mime() {
        let img = decode_base64_image(&format!("data:image/jpeg;base64,{RED_PIXEL_PNG}")).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_unrecognised_bytes_rejected() {
        // "hello world" has no image signature.
        let err = decode_base64_image("aGVsbG8gd29ybGQ=").unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode(ref m) if m.starts_with("Unrecognised")));
    }

    #[test]
    fn test_export_is_png() {
        let surface = Surface::new(5, 4, Rgb::WHITE).unwrap();
        let png = encode_png(&surface).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let uri = export_data_uri(&surface).unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_export_import_preserves_pixels() {
        let mut source = Surface::new(6, 6, Rgb::WHITE).unwrap();
        source.fill_rect(1, 2, 3, 2, Rgb::new(12, 34, 56), 1.0);
        let payload = export_png_base64(&source).unwrap();

        let mut target = Surface::new(6, 6, Rgb::BLACK).unwrap();
        import_base64(&mut target, &payload).unwrap();
        assert_eq!(target.as_raw(), source.as_raw());
    }

    #[test]
    fn test_import_data_uri_scales_to_extent() {
        let mut surface = Surface::new(3, 2, Rgb::WHITE).unwrap();
        import_base64(&mut surface, &format!("data:image/png;base64,{RED_PIXEL_PNG}")).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(surface.pixel(x, y), Some([255, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn test_malformed_payload_leaves_surface_untouched() {
        let mut surface = Surface::new(4, 4, Rgb::WHITE).unwrap();
        surface.fill_rect(0, 0, 2, 2, Rgb::BLACK, 1.0);
        let before = surface.clone();

        for payload in [
            "!!! not base64 !!!",
            "aGVsbG8gd29ybGQ=",
            "data:image/png;base64",
            "data:image/png,abc",
        ] {
            let err = import_base64(&mut surface, payload).unwrap_err();
            assert!(matches!(err, RenderError::ImageDecode(_)), "{payload}: {err}");
            assert_eq!(surface, before);
        }
    }
}
