// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pixelwerk.

use thiserror::Error;

/// Top-level error type for all Pixelwerk operations.
#[derive(Debug, Error)]
pub enum PixelwerkError {
    // -- Intake / codec errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    // -- Layout errors --
    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("unknown option value: {0}")]
    InvalidPolicy(String),

    // -- PDF output --
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    // -- Batch control --
    #[error("operation cancelled")]
    Cancelled,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PixelwerkError>;
