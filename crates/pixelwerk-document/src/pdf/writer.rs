// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — places decoded images on pages using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use pixelwerk_core::error::{PixelwerkError, Result};
use pixelwerk_core::{PageGeometry, PixelBuffer, PlacedImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Image XObjects are embedded at 72 DPI so one pixel is one point before
/// scaling.
const EMBED_DPI: f32 = 72.0;

/// Builds a PDF page by page from placed images.
///
/// Every page shares the geometry given at construction. Images are drawn in
/// insertion order; `add_page` starts a new page after the current one.
/// Placements use millimetres from the top-left corner and are converted to
/// PDF user space (points from the bottom-left) here.
pub struct PdfWriter {
    doc: PdfDocument,
    page: PageGeometry,
    /// One op list per page, in page order. Never empty.
    pages: Vec<Vec<Op>>,
    images: usize,
}

impl PdfWriter {
    /// Start a document with a single empty page.
    pub fn new(page: PageGeometry, title: &str) -> Self {
        info!(
            width_mm = page.width_mm,
            height_mm = page.height_mm,
            orientation = ?page.orientation,
            title,
            "Creating PDF"
        );
        Self {
            doc: PdfDocument::new(title),
            page,
            pages: vec![Vec::new()],
            images: 0,
        }
    }

    pub fn page(&self) -> &PageGeometry {
        &self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page that `add_image` draws on.
    pub fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    /// Append an empty page and make it current. Returns its index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Vec::new());
        debug!(page = self.current_page(), "Page added");
        self.current_page()
    }

    /// Draw `buffer` at `placed` on the current page.
    ///
    /// Alpha is dropped; images are embedded as RGB8.
    #[instrument(skip(self, buffer), fields(width = buffer.width(), height = buffer.height()))]
    pub fn add_image(&mut self, buffer: &PixelBuffer, placed: &PlacedImage) -> Result<()> {
        if placed.page_index != self.current_page() {
            return Err(PixelwerkError::Pdf(format!(
                "placement targets page {} but the writer is on page {}",
                placed.page_index,
                self.current_page()
            )));
        }
        if placed.width_mm <= 0.0 || placed.height_mm <= 0.0 {
            return Err(PixelwerkError::Geometry(format!(
                "cannot draw an image {}x{}mm",
                placed.width_mm, placed.height_mm
            )));
        }

        let rgb: Vec<u8> = buffer
            .as_raw()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb),
            width: buffer.width() as usize,
            height: buffer.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        // Natural size at EMBED_DPI, in points.
        let natural_w_pt = buffer.width() as f32 / EMBED_DPI * 72.0;
        let natural_h_pt = buffer.height() as f32 / EMBED_DPI * 72.0;
        let target_w_pt = Mm(placed.width_mm as f32).into_pt().0;
        let target_h_pt = Mm(placed.height_mm as f32).into_pt().0;

        // PDF origin is bottom-left; placements measure from the top.
        let page_h_pt = Mm(self.page.height_mm as f32).into_pt().0;
        let x_pt = Mm(placed.x_mm as f32).into_pt().0;
        let y_pt = page_h_pt - Mm(placed.bottom_mm() as f32).into_pt().0;

        let op = Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_pt)),
                translate_y: Some(Pt(y_pt)),
                scale_x: Some(target_w_pt / natural_w_pt),
                scale_y: Some(target_h_pt / natural_h_pt),
                dpi: Some(EMBED_DPI),
                rotate: None,
            },
        };

        let page = self.current_page();
        self.pages[page].push(op);
        self.images += 1;
        debug!(page, x_pt, y_pt, target_w_pt, target_h_pt, "Image placed on page");
        Ok(())
    }

    /// Serialise the document.
    #[instrument(skip(self), fields(pages = self.pages.len(), images = self.images))]
    pub fn finish(mut self) -> Vec<u8> {
        let page_w = Mm(self.page.width_mm as f32);
        let page_h = Mm(self.page.height_mm as f32);

        let pages: Vec<PdfPage> = self
            .pages
            .into_iter()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        self.doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = output.len(),
            warnings = warnings.len(),
            "PDF serialised"
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelwerk_core::Orientation;

    fn a4() -> PageGeometry {
        PageGeometry {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
            orientation: Orientation::Portrait,
        }
    }

    fn placed(page_index: usize) -> PlacedImage {
        PlacedImage {
            x_mm: 10.0,
            y_mm: 10.0,
            width_mm: 190.0,
            height_mm: 95.0,
            page_index,
        }
    }

    #[test]
    fn writes_one_page_per_add_page() {
        let img = PixelBuffer::filled(4, 2, [200, 10, 10, 255]).unwrap();
        let mut writer = PdfWriter::new(a4(), "test");
        writer.add_image(&img, &placed(0)).unwrap();
        writer.add_page();
        writer.add_image(&img, &placed(1)).unwrap();
        assert_eq!(writer.page_count(), 2);

        let bytes = writer.finish();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn placement_maps_to_bottom_left_points() {
        let img = PixelBuffer::filled(40, 20, [0, 90, 200, 255]).unwrap();
        let target = PlacedImage {
            x_mm: 10.0,
            y_mm: 30.0,
            width_mm: 100.0,
            height_mm: 50.0,
            page_index: 0,
        };
        let mut writer = PdfWriter::new(a4(), "placement");
        writer.add_image(&img, &target).unwrap();
        let bytes = writer.finish();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let cm = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("image transform");
        let operands: Vec<f32> = cm.operands.iter().map(|o| o.as_float().unwrap()).collect();

        let mm_to_pt = 72.0 / 25.4;
        // Page is 297mm tall; the image bottom sits 80mm from the top.
        let expected = [
            100.0 * mm_to_pt,
            0.0,
            0.0,
            50.0 * mm_to_pt,
            10.0 * mm_to_pt,
            (297.0 - 80.0) * mm_to_pt,
        ];
        assert_eq!(operands.len(), 6);
        for (got, want) in operands.iter().zip(expected) {
            assert!((got - want).abs() < 0.01, "cm {operands:?} != {expected:?}");
        }
    }

    #[test]
    fn empty_document_still_has_a_page() {
        let bytes = PdfWriter::new(a4(), "empty").finish();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn placement_on_wrong_page_is_rejected() {
        let img = PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap();
        let mut writer = PdfWriter::new(a4(), "test");
        let err = writer.add_image(&img, &placed(1)).unwrap_err();
        assert!(matches!(err, PixelwerkError::Pdf(_)));
    }
}
