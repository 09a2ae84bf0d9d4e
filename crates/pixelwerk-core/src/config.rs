// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{
    FailurePolicy, LayoutMode, OrientationPolicy, OutputFormat, PageSizePolicy, PaperSize,
};

/// Persistent application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings for image-to-PDF assembly.
    pub pdf: PdfSettings,
    /// Settings for the 2x enhancer.
    pub enhance: EnhanceSettings,
}

/// Image-to-PDF assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    pub page_size: PageSizePolicy,
    pub orientation: OrientationPolicy,
    /// Margin applied on every side, in millimetres.
    pub margin_mm: f64,
    pub layout: LayoutMode,
    /// Pause between page insertions, in milliseconds. Zero disables it.
    pub pacing_ms: u64,
    pub on_failure: FailurePolicy,
    /// Title written to the PDF /Info dictionary.
    pub title: String,
    /// Default output file name.
    pub output_name: String,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            page_size: PageSizePolicy::Paper(PaperSize::A4),
            orientation: OrientationPolicy::Auto,
            margin_mm: 10.0,
            layout: LayoutMode::OnePerPage,
            pacing_ms: 0,
            on_failure: FailurePolicy::AbortBatch,
            title: "Images".into(),
            output_name: "images.pdf".into(),
        }
    }
}

/// Enhancer output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceSettings {
    pub format: OutputFormat,
    /// JPEG quality as a fraction in `0.0..=1.0`. Ignored for PNG.
    pub jpeg_quality: f32,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            jpeg_quality: 0.9,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "pdf": { "layout": "all-in-one", "page_size": "auto" } }"#)
                .unwrap();
        assert_eq!(cfg.pdf.layout, LayoutMode::AllInOne);
        assert_eq!(cfg.pdf.page_size, PageSizePolicy::Auto);
        assert_eq!(cfg.pdf.margin_mm, 10.0);
        assert_eq!(cfg.enhance.format, OutputFormat::Png);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut cfg = AppConfig::default();
        cfg.pdf.margin_mm = 5.0;
        cfg.enhance.format = OutputFormat::Jpeg;
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.pdf.margin_mm, 5.0);
        assert_eq!(loaded.enhance.format, OutputFormat::Jpeg);
        assert_eq!(loaded.pdf.page_size, PageSizePolicy::Paper(PaperSize::A4));
    }

    #[test]
    fn unknown_page_size_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            serde_json::from_str(r#"{ "pdf": { "page_size": "napkin" } }"#);
        assert!(result.is_err());
    }
}
