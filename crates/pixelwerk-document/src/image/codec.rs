// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec — decode JPEG/PNG bytes into `PixelBuffer`s and encode them back
// to PNG or JPEG using the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use pixelwerk_core::error::{PixelwerkError, Result};
use pixelwerk_core::{OutputFormat, PixelBuffer};
use tracing::{debug, instrument};

/// Decodes encoded image bytes into RGBA8 pixel buffers.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Reject anything that is not an `image/*` MIME type.
    pub fn check_mime(mime_type: &str) -> Result<()> {
        if mime_type.trim().to_ascii_lowercase().starts_with("image/") {
            Ok(())
        } else {
            Err(PixelwerkError::UnsupportedType(mime_type.to_string()))
        }
    }

    /// Decode raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
        let img = image::load_from_memory(data)
            .map_err(|err| PixelwerkError::Decode(err.to_string()))?;
        debug!(width = img.width(), height = img.height(), "Image decoded");
        from_rgba_image(img.into_rgba8())
    }

    /// Read and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn decode_file(path: impl AsRef<std::path::Path>) -> Result<PixelBuffer> {
        let img = image::open(path.as_ref()).map_err(|err| {
            PixelwerkError::Decode(format!("{}: {}", path.as_ref().display(), err))
        })?;
        from_rgba_image(img.into_rgba8())
    }
}

/// Encodes pixel buffers as PNG or JPEG.
pub struct Encoder;

impl Encoder {
    /// Encode `buffer` in `format`. `quality` is a `0.0..=1.0` fraction and
    /// only affects JPEG output.
    #[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
    pub fn encode(buffer: &PixelBuffer, format: OutputFormat, quality: f32) -> Result<Vec<u8>> {
        let rgba = to_rgba_image(buffer)?;
        let bytes = match format {
            OutputFormat::Png => encode_png(rgba)?,
            OutputFormat::Jpeg => encode_jpeg(rgba, jpeg_quality_percent(quality)?)?,
        };
        debug!(?format, bytes = bytes.len(), "Image encoded");
        Ok(bytes)
    }
}

/// Map a `0.0..=1.0` quality fraction to the JPEG encoder's 1-100 scale.
pub fn jpeg_quality_percent(quality: f32) -> Result<u8> {
    if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
        return Err(PixelwerkError::Encode(format!(
            "JPEG quality must be between 0.0 and 1.0, got {quality}"
        )));
    }
    Ok(((quality * 100.0).round() as u8).clamp(1, 100))
}

/// Wrap a decoded `RgbaImage` without copying its pixels.
pub fn from_rgba_image(img: RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = img.dimensions();
    PixelBuffer::new(width, height, img.into_raw())
}

/// Copy a `PixelBuffer` into an `RgbaImage`.
pub fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_raw().to_vec()).ok_or_else(
        || PixelwerkError::Geometry("pixel buffer does not match its dimensions".into()),
    )
}

fn encode_png(rgba: RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| PixelwerkError::Encode(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

fn encode_jpeg(rgba: RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| PixelwerkError::Encode(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let mut data = Vec::new();
        for i in 0..12u8 {
            data.extend_from_slice(&[i * 20, 255 - i * 20, 128, 255]);
        }
        PixelBuffer::new(4, 3, data).unwrap()
    }

    #[test]
    fn png_preserves_pixels() {
        let buf = sample();
        let png = Encoder::encode(&buf, OutputFormat::Png, 1.0).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = ImageDecoder::decode(&png).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn jpeg_output_keeps_dimensions() {
        let buf = sample();
        let jpeg = Encoder::encode(&buf, OutputFormat::Jpeg, 0.8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = ImageDecoder::decode(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageDecoder::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PixelwerkError::Decode(_)));
    }

    #[test]
    fn mime_intake() {
        assert!(ImageDecoder::check_mime("image/png").is_ok());
        assert!(ImageDecoder::check_mime("IMAGE/JPEG").is_ok());
        assert!(matches!(
            ImageDecoder::check_mime("application/pdf"),
            Err(PixelwerkError::UnsupportedType(_))
        ));
    }

    #[test]
    fn quality_fraction_maps_to_percent() {
        assert_eq!(jpeg_quality_percent(0.92).unwrap(), 92);
        assert_eq!(jpeg_quality_percent(0.0).unwrap(), 1);
        assert_eq!(jpeg_quality_percent(1.0).unwrap(), 100);
        assert!(jpeg_quality_percent(1.5).is_err());
        assert!(jpeg_quality_percent(f32::NAN).is_err());
    }
}
