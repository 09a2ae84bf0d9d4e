// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout session — the running state of one multi-image PDF assembly.

use pixelwerk_core::{PageGeometry, PlacedImage};

/// Placements made so far plus the vertical cursor used by flowing layout.
///
/// The page geometry is fixed by the first image; every later image is fitted
/// into that same page size. The cursor is owned here rather than read back
/// from the PDF backend.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    page: PageGeometry,
    placements: Vec<PlacedImage>,
    current_page: usize,
    current_y_mm: f64,
}

impl LayoutSession {
    /// Start a session from the first image's page and placement.
    pub fn start(page: PageGeometry, first: PlacedImage) -> Self {
        Self {
            page,
            current_page: first.page_index,
            current_y_mm: first.bottom_mm(),
            placements: vec![first],
        }
    }

    pub fn page(&self) -> &PageGeometry {
        &self.page
    }

    /// All placements, in insertion order.
    pub fn placements(&self) -> &[PlacedImage] {
        &self.placements
    }

    /// Zero-based index of the page currently being filled.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages the document needs so far.
    pub fn page_count(&self) -> usize {
        self.current_page + 1
    }

    /// Bottom edge of the most recent image on the current page, from the top.
    pub fn current_y_mm(&self) -> f64 {
        self.current_y_mm
    }

    /// Open a fresh page and put the cursor back at the top margin.
    pub(crate) fn break_page(&mut self) -> usize {
        self.current_page += 1;
        self.current_y_mm = self.page.margin_mm;
        self.current_page
    }

    /// Record a placement and move the cursor to its bottom edge.
    pub(crate) fn push(&mut self, placed: PlacedImage) {
        self.current_y_mm = placed.bottom_mm();
        self.placements.push(placed);
    }
}
