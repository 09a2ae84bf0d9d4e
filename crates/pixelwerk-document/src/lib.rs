// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pixelwerk-document — Image and PDF processing for Pixelwerk.
//
// Provides the 2x bilinear enhancer, JPEG/PNG decoding and encoding, the
// page layout planner for multi-image PDFs, a `printpdf`-backed PDF writer,
// and the pipelines that tie them together.

pub mod image;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod save;

// Re-export the primary structs so callers can use `pixelwerk_document::Enhancer` etc.
pub use self::image::codec::{Encoder, ImageDecoder};
pub use self::image::enhance::{EnhanceOptions, Enhancer};
pub use layout::{LayoutPlanner, LayoutSession};
pub use pdf::writer::PdfWriter;
pub use pipeline::{
    AssemblyReport, CancelHandle, EnhanceJob, EnhancedFile, PdfAssembler, Progress, SourceImage,
};
pub use save::{DirectorySaver, FileSaver};
