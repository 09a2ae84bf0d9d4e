// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `pixelwerk pdf` — lay out one or more images in a single PDF.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use pixelwerk_core::config::PdfSettings;
use pixelwerk_core::{FailurePolicy, LayoutMode, OrientationPolicy, PageSizePolicy};
use pixelwerk_document::{DirectorySaver, FileSaver, PdfAssembler, SourceImage};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct PdfCommand {
    /// Images to include, in page order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Page size: auto, a3, a4, a5, letter, legal, tabloid, or <W>x<H> in mm
    #[arg(short = 's', long)]
    pub page_size: Option<PageSizePolicy>,

    /// Orientation: auto, portrait or landscape
    #[arg(long)]
    pub orientation: Option<OrientationPolicy>,

    /// Margin on every side, in millimetres
    #[arg(short, long)]
    pub margin: Option<f64>,

    /// Layout: one-per-page or all-in-one
    #[arg(short, long)]
    pub layout: Option<LayoutMode>,

    /// Pause between pages, in milliseconds
    #[arg(long)]
    pub pacing_ms: Option<u64>,

    /// Leave unreadable images out instead of stopping
    #[arg(long)]
    pub skip_bad: bool,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Output file (defaults to the configured name in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl PdfCommand {
    pub async fn execute(self, defaults: &PdfSettings) -> Result<()> {
        let settings = PdfSettings {
            page_size: self.page_size.unwrap_or(defaults.page_size),
            orientation: self.orientation.unwrap_or(defaults.orientation),
            margin_mm: self.margin.unwrap_or(defaults.margin_mm),
            layout: self.layout.unwrap_or(defaults.layout),
            pacing_ms: self.pacing_ms.unwrap_or(defaults.pacing_ms),
            on_failure: if self.skip_bad {
                FailurePolicy::SkipFile
            } else {
                defaults.on_failure
            },
            title: self.title.unwrap_or_else(|| defaults.title.clone()),
            output_name: defaults.output_name.clone(),
        };

        let sources = self
            .inputs
            .iter()
            .map(|path| {
                SourceImage::from_path(path)
                    .with_context(|| format!("failed to read {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let assembler = PdfAssembler::from_settings(&settings)?;

        // Ctrl-C stops the batch before the next image.
        let cancel = assembler.cancel_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; stopping after the current image");
                cancel.cancel();
            }
        });

        let report = assembler.assemble(sources).await?;

        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(&settings.output_name));
        let file_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| settings.output_name.clone());
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let path = DirectorySaver::new(dir).save(&report.pdf_bytes, &file_name)?;

        info!(pages = report.pages, images = report.placed.len(), "Conversion complete");
        for name in &report.skipped {
            eprintln!("skipped unreadable image: {name}");
        }
        println!(
            "{} ({} page(s), {} image(s))",
            path.display(),
            report.pages,
            report.placed.len()
        );
        Ok(())
    }
}
