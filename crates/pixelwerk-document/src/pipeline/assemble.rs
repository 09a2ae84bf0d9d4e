// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image-to-PDF assembly — decode each image, plan its placement, and draw it,
// one file at a time and strictly in order.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pixelwerk_core::config::PdfSettings;
use pixelwerk_core::error::{PixelwerkError, Result};
use pixelwerk_core::{FailurePolicy, PlacedImage, mime_from_extension};
use tracing::{debug, info, instrument, warn};

use crate::image::codec::ImageDecoder;
use crate::layout::{LayoutPlanner, LayoutSession};
use crate::pdf::writer::PdfWriter;

/// One input file: its name, declared MIME type, and encoded bytes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file, inferring its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = path
            .extension()
            .and_then(|ext| mime_from_extension(&ext.to_string_lossy()))
            .unwrap_or("application/octet-stream");
        Ok(Self::new(name, mime_type, bytes))
    }
}

/// Keep only `image/*` inputs. Fails if nothing is left.
pub fn filter_images(sources: Vec<SourceImage>) -> Result<Vec<SourceImage>> {
    let offered = sources.len();
    let (images, rejected): (Vec<_>, Vec<_>) = sources
        .into_iter()
        .partition(|s| ImageDecoder::check_mime(&s.mime_type).is_ok());

    for source in &rejected {
        warn!(name = %source.name, mime = %source.mime_type, "Ignoring non-image file");
    }
    if images.is_empty() {
        return Err(PixelwerkError::UnsupportedType(format!(
            "none of the {offered} file(s) offered is an image"
        )));
    }
    Ok(images)
}

/// Cooperative cancellation flag, checked before each file is processed.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PixelwerkError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Progress through a batch: `current` files of `total` handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.current * 100 + self.total / 2) / self.total).min(100) as u8
    }
}

/// Outcome of a finished assembly.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub pdf_bytes: Vec<u8>,
    pub pages: usize,
    /// Placements in insertion order.
    pub placed: Vec<PlacedImage>,
    /// Names of files left out under [`FailurePolicy::SkipFile`].
    pub skipped: Vec<String>,
}

type ProgressFn = Box<dyn Fn(Progress) + Send + Sync>;

/// Runs the sequential decode → plan → draw loop over a batch of images.
pub struct PdfAssembler {
    planner: LayoutPlanner,
    title: String,
    pacing: Duration,
    on_failure: FailurePolicy,
    cancel: CancelHandle,
    progress: Option<ProgressFn>,
}

impl PdfAssembler {
    pub fn new(planner: LayoutPlanner) -> Self {
        Self {
            planner,
            title: "Images".into(),
            pacing: Duration::ZERO,
            on_failure: FailurePolicy::AbortBatch,
            cancel: CancelHandle::new(),
            progress: None,
        }
    }

    pub fn from_settings(settings: &PdfSettings) -> Result<Self> {
        Ok(Self::new(LayoutPlanner::from_settings(settings)?)
            .with_title(settings.title.clone())
            .with_pacing(Duration::from_millis(settings.pacing_ms))
            .with_failure_policy(settings.on_failure))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Pause between files. Has no effect on the output.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// A handle that cancels this assembler's batches.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Build a PDF from `sources`, in order.
    ///
    /// Non-image inputs are dropped at intake. Cancellation is checked before
    /// every file; a cancelled batch yields [`PixelwerkError::Cancelled`] and
    /// no document.
    #[instrument(skip_all, fields(files = sources.len(), mode = ?self.planner.mode()))]
    pub async fn assemble(&self, sources: Vec<SourceImage>) -> Result<AssemblyReport> {
        let sources = filter_images(sources)?;
        let total = sources.len();
        info!(total, "Starting PDF assembly");

        let mut session: Option<LayoutSession> = None;
        let mut writer: Option<PdfWriter> = None;
        let mut skipped = Vec::new();

        for (index, source) in sources.into_iter().enumerate() {
            self.cancel.check()?;

            let buffer = match ImageDecoder::decode(&source.bytes) {
                Ok(buffer) => buffer,
                Err(err) => {
                    let err = with_file_name(err, &source.name);
                    match self.on_failure {
                        FailurePolicy::AbortBatch => return Err(err),
                        FailurePolicy::SkipFile => {
                            warn!(name = %source.name, error = %err, "Skipping unreadable image");
                            skipped.push(source.name);
                            self.report(index + 1, total);
                            continue;
                        }
                    }
                }
            };

            let (width, height) = buffer.dimensions();
            let placed = self.planner.place(&mut session, width, height)?;

            let page = session
                .as_ref()
                .map(|s| *s.page())
                .ok_or_else(|| PixelwerkError::Pdf("layout session was not started".into()))?;
            let pdf = writer.get_or_insert_with(|| PdfWriter::new(page, &self.title));
            while pdf.current_page() < placed.page_index {
                pdf.add_page();
            }
            pdf.add_image(&buffer, &placed)?;

            debug!(name = %source.name, page = placed.page_index, "Image added");
            self.report(index + 1, total);

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let (Some(writer), Some(session)) = (writer, session) else {
            return Err(PixelwerkError::Decode(format!(
                "none of the {total} image(s) could be decoded"
            )));
        };

        let pages = writer.page_count();
        let pdf_bytes = writer.finish();
        info!(
            pages,
            bytes = pdf_bytes.len(),
            skipped = skipped.len(),
            "PDF assembly complete"
        );

        Ok(AssemblyReport {
            pdf_bytes,
            pages,
            placed: session.placements().to_vec(),
            skipped,
        })
    }

    fn report(&self, current: usize, total: usize) {
        let progress = Progress { current, total };
        info!(
            current,
            total,
            percent = progress.percent(),
            "Processing image {current} of {total}"
        );
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}

fn with_file_name(err: PixelwerkError, name: &str) -> PixelwerkError {
    match err {
        PixelwerkError::Decode(detail) => PixelwerkError::Decode(format!("{name}: {detail}")),
        other => other,
    }
}
