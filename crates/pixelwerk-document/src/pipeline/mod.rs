// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipelines — the image-to-PDF batch and the single-image enhance job.

pub mod assemble;
pub mod enhance_job;

pub use assemble::{
    AssemblyReport, CancelHandle, PdfAssembler, Progress, SourceImage, filter_images,
};
pub use enhance_job::{EnhanceJob, EnhancedFile, enhanced_file_name};
