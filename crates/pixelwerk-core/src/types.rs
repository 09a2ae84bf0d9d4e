// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: pixel buffers, page-size and orientation policies, and
// the millimetre geometry produced by the layout planner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PixelwerkError, Result};

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

// -- Pixel buffers ------------------------------------------------------------

/// A decoded RGBA8 image held in memory, row-major, top-left first.
///
/// `data.len() == width * height * 4` always holds for a constructed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes, validating dimensions against the byte length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixelwerkError::Geometry(format!(
                "pixel buffer must be at least 1x1, got {width}x{height}"
            )));
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(PixelwerkError::Geometry(format!(
                "{width}x{height} RGBA buffer needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Borrow the raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its raw RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA value at `(x, y)`. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index_of(x, y);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

/// RGBA byte length of a `width x height` buffer, or `Geometry` on overflow.
fn byte_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| PixelwerkError::Geometry(format!("{width}x{height} buffer is too large")))
}

// -- Paper sizes --------------------------------------------------------------

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Tabloid => (279.4, 431.8),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm as f64, *height_mm as f64),
        }
    }

    /// Dimensions with the long side placed according to `orientation`.
    pub fn oriented_mm(&self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A3 => f.write_str("a3"),
            Self::A4 => f.write_str("a4"),
            Self::A5 => f.write_str("a5"),
            Self::Letter => f.write_str("letter"),
            Self::Legal => f.write_str("legal"),
            Self::Tabloid => f.write_str("tabloid"),
            Self::Custom {
                width_mm,
                height_mm,
            } => write!(f, "{width_mm}x{height_mm}"),
        }
    }
}

impl FromStr for PaperSize {
    type Err = PixelwerkError;

    /// Accepts the named keywords or a custom `<width>x<height>` in millimetres.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" | "ledger" => Ok(Self::Tabloid),
            other => {
                let parsed = other.split_once('x').and_then(|(w, h)| {
                    Some((w.trim().parse::<u32>().ok()?, h.trim().parse::<u32>().ok()?))
                });
                match parsed {
                    Some((width_mm, height_mm)) if width_mm > 0 && height_mm > 0 => {
                        Ok(Self::Custom {
                            width_mm,
                            height_mm,
                        })
                    }
                    _ => Err(PixelwerkError::InvalidPolicy(format!("paper size `{s}`"))),
                }
            }
        }
    }
}

// -- Policies -----------------------------------------------------------------

/// How the page size of a new document is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSizePolicy {
    /// Page sized to the first image at 96 DPI plus margins.
    Auto,
    /// A fixed paper size.
    Paper(PaperSize),
}

impl fmt::Display for PageSizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Paper(paper) => paper.fmt(f),
        }
    }
}

impl FromStr for PageSizePolicy {
    type Err = PixelwerkError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Paper)
        }
    }
}

impl TryFrom<String> for PageSizePolicy {
    type Error = PixelwerkError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PageSizePolicy> for String {
    fn from(value: PageSizePolicy) -> Self {
        value.to_string()
    }
}

/// Resolved page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape when the source image is strictly wider than it is tall.
    pub fn for_image(width_px: u32, height_px: u32) -> Self {
        if width_px > height_px {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Requested page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationPolicy {
    #[default]
    Auto,
    Portrait,
    Landscape,
}

impl OrientationPolicy {
    /// Resolve against the source image's dimensions, never the page's.
    pub fn resolve(&self, width_px: u32, height_px: u32) -> Orientation {
        match self {
            Self::Auto => Orientation::for_image(width_px, height_px),
            Self::Portrait => Orientation::Portrait,
            Self::Landscape => Orientation::Landscape,
        }
    }
}

impl FromStr for OrientationPolicy {
    type Err = PixelwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(PixelwerkError::InvalidPolicy(format!("orientation `{s}`"))),
        }
    }
}

/// How images after the first are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Every image gets its own page.
    #[default]
    OnePerPage,
    /// Images flow down the page and break to a new one when they don't fit.
    AllInOne,
}

impl FromStr for LayoutMode {
    type Err = PixelwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-per-page" => Ok(Self::OnePerPage),
            "all-in-one" => Ok(Self::AllInOne),
            _ => Err(PixelwerkError::InvalidPolicy(format!("layout `{s}`"))),
        }
    }
}

/// What a batch does when one file fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole batch on the first failure.
    #[default]
    AbortBatch,
    /// Log the failure, leave the file out, and carry on.
    SkipFile,
}

/// Encoded output formats for enhanced images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PixelwerkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(PixelwerkError::InvalidPolicy(format!("output format `{s}`"))),
        }
    }
}

/// Infer an image MIME type from a file extension.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

// -- Layout geometry ----------------------------------------------------------

/// Page dimensions in millimetres, fixed once the first image is placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    pub orientation: Orientation,
}

impl PageGeometry {
    /// Width of the margin-inset content area.
    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Height of the margin-inset content area.
    pub fn content_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

/// Where one image lands, in millimetres from the page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Zero-based page index within the document.
    pub page_index: usize,
}

impl PlacedImage {
    /// Bottom edge of the image, measured from the top of the page.
    pub fn bottom_mm(&self) -> f64 {
        self.y_mm + self.height_mm
    }
}
