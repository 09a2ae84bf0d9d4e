// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhance job — decode one image, run the 2x enhancer, and encode the result
// under an `<name>_enhanced.<ext>` file name.

use pixelwerk_core::config::EnhanceSettings;
use pixelwerk_core::error::Result;
use pixelwerk_core::{OutputFormat, PixelBuffer};
use tracing::{info, instrument};

use super::assemble::SourceImage;
use crate::image::codec::{self, Encoder, ImageDecoder};
use crate::image::enhance::Enhancer;

/// An encoded enhancement ready to be saved.
#[derive(Debug, Clone)]
pub struct EnhancedFile {
    pub file_name: String,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Decode → enhance → encode for a single image.
#[derive(Debug, Clone)]
pub struct EnhanceJob {
    enhancer: Enhancer,
    format: OutputFormat,
    jpeg_quality: f32,
}

impl EnhanceJob {
    pub fn new(format: OutputFormat, jpeg_quality: f32) -> Self {
        Self {
            enhancer: Enhancer::default(),
            format,
            jpeg_quality,
        }
    }

    pub fn from_settings(settings: &EnhanceSettings) -> Self {
        Self::new(settings.format, settings.jpeg_quality)
    }

    pub fn with_enhancer(mut self, enhancer: Enhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    /// Enhance `source` and encode it in the configured format.
    #[instrument(skip_all, fields(name = %source.name, format = ?self.format))]
    pub fn run(&self, source: &SourceImage) -> Result<EnhancedFile> {
        ImageDecoder::check_mime(&source.mime_type)?;
        if self.format == OutputFormat::Jpeg {
            // Reject a bad quality before doing the expensive part.
            codec::jpeg_quality_percent(self.jpeg_quality)?;
        }

        let input = ImageDecoder::decode(&source.bytes)?;
        let enhanced = self.enhancer.enhance(&input)?;
        drop(input);

        self.encode(&source.name, enhanced)
    }

    /// Encode an already enhanced buffer.
    pub fn encode(&self, name: &str, enhanced: PixelBuffer) -> Result<EnhancedFile> {
        let bytes = Encoder::encode(&enhanced, self.format, self.jpeg_quality)?;
        let file_name = enhanced_file_name(name, self.format);
        info!(
            file_name,
            width = enhanced.width(),
            height = enhanced.height(),
            bytes = bytes.len(),
            "Enhanced image ready"
        );
        Ok(EnhancedFile {
            file_name,
            format: self.format,
            width: enhanced.width(),
            height: enhanced.height(),
            bytes,
        })
    }
}

/// `photo.final.jpg` → `photo_enhanced.png` (everything from the first dot
/// is dropped).
pub fn enhanced_file_name(name: &str, format: OutputFormat) -> String {
    let base = std::path::Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = base.split('.').next().unwrap_or_default();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{stem}_enhanced.{}", format.extension())
}
