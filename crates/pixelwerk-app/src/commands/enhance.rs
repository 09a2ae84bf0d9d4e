// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pixelwerk enhance` — upscale one image 2x and save it as PNG or JPEG.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use pixelwerk_core::OutputFormat;
use pixelwerk_core::config::EnhanceSettings;
use pixelwerk_document::{DirectorySaver, EnhanceJob, FileSaver, SourceImage};
use tracing::info;

#[derive(Debug, Args)]
pub struct EnhanceCommand {
    /// Image to enhance (JPEG or PNG)
    pub input: PathBuf,

    /// Output format: png or jpeg
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// JPEG quality between 0.0 and 1.0
    #[arg(short, long)]
    pub quality: Option<f32>,

    /// Directory to write the result into (defaults to the input's directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

impl EnhanceCommand {
    pub fn execute(self, defaults: &EnhanceSettings) -> Result<()> {
        let settings = EnhanceSettings {
            format: self.format.unwrap_or(defaults.format),
            jpeg_quality: self.quality.unwrap_or(defaults.jpeg_quality),
        };

        let source = SourceImage::from_path(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        info!(name = %source.name, bytes = source.bytes.len(), "Enhancing");

        let enhanced = EnhanceJob::from_settings(&settings).run(&source)?;

        let out_dir = self.out_dir.unwrap_or_else(|| {
            self.input
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
        });
        let path = DirectorySaver::new(out_dir).save(&enhanced.bytes, &enhanced.file_name)?;

        println!(
            "{} ({}x{}, {})",
            path.display(),
            enhanced.width,
            enhanced.height,
            enhanced.format.mime_type()
        );
        Ok(())
    }
}
