// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout planner — fits images onto pages in millimetres and decides whether
// the next image starts a new page or flows below the previous one.

use pixelwerk_core::config::PdfSettings;
use pixelwerk_core::error::{PixelwerkError, Result};
use pixelwerk_core::{
    LayoutMode, Orientation, OrientationPolicy, PageGeometry, PageSizePolicy, PlacedImage,
};
use tracing::{debug, instrument};

use super::session::LayoutSession;

/// Pixel density assumed when sizing `auto` pages from image pixels.
pub const PX_PER_INCH: f64 = 96.0;

pub const MM_PER_INCH: f64 = 25.4;

/// Convert a pixel length to millimetres at 96 DPI.
pub fn px_to_mm(px: u32) -> f64 {
    px as f64 * MM_PER_INCH / PX_PER_INCH
}

/// Computes page geometry and image placement for a PDF assembly.
///
/// The first image decides the page size (and, with [`PageSizePolicy::Auto`],
/// the page is the image itself at 96 DPI plus margins). Later images are
/// scaled uniformly into the content area of that same page.
#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    page_size: PageSizePolicy,
    orientation: OrientationPolicy,
    margin_mm: f64,
    mode: LayoutMode,
}

impl LayoutPlanner {
    pub fn new(
        page_size: PageSizePolicy,
        orientation: OrientationPolicy,
        margin_mm: f64,
        mode: LayoutMode,
    ) -> Result<Self> {
        if !margin_mm.is_finite() || margin_mm < 0.0 {
            return Err(PixelwerkError::Geometry(format!(
                "margin must be a non-negative number of millimetres, got {margin_mm}"
            )));
        }
        Ok(Self {
            page_size,
            orientation,
            margin_mm,
            mode,
        })
    }

    pub fn from_settings(settings: &PdfSettings) -> Result<Self> {
        Self::new(
            settings.page_size,
            settings.orientation,
            settings.margin_mm,
            settings.layout,
        )
    }

    pub fn margin_mm(&self) -> f64 {
        self.margin_mm
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Place the first image of a document, fixing the page geometry.
    #[instrument(skip(self), fields(page_size = %self.page_size))]
    pub fn plan_first_image(
        &self,
        img_width_px: u32,
        img_height_px: u32,
    ) -> Result<(PageGeometry, PlacedImage)> {
        check_dimensions(img_width_px, img_height_px)?;
        let margin = self.margin_mm;

        let (page, width_mm, height_mm) = match self.page_size {
            PageSizePolicy::Auto => {
                let width_mm = px_to_mm(img_width_px);
                let height_mm = px_to_mm(img_height_px);
                let page = PageGeometry {
                    width_mm: width_mm + 2.0 * margin,
                    height_mm: height_mm + 2.0 * margin,
                    margin_mm: margin,
                    orientation: Orientation::for_image(img_width_px, img_height_px),
                };
                (page, width_mm, height_mm)
            }
            PageSizePolicy::Paper(paper) => {
                let orientation = self.orientation.resolve(img_width_px, img_height_px);
                let (page_w, page_h) = paper.oriented_mm(orientation);
                let page = PageGeometry {
                    width_mm: page_w,
                    height_mm: page_h,
                    margin_mm: margin,
                    orientation,
                };
                let ratio = fit_ratio(&page, img_width_px, img_height_px)?;
                (
                    page,
                    img_width_px as f64 * ratio,
                    img_height_px as f64 * ratio,
                )
            }
        };

        let placed = PlacedImage {
            x_mm: margin,
            y_mm: margin,
            width_mm,
            height_mm,
            page_index: 0,
        };
        debug!(
            page_w = page.width_mm,
            page_h = page.height_mm,
            orientation = ?page.orientation,
            placed_w = width_mm,
            placed_h = height_mm,
            "First image planned"
        );
        Ok((page, placed))
    }

    /// Place a later image into the session's fixed page size.
    ///
    /// The page-size and orientation policies play no part here: once the
    /// first page exists, every image is fitted into its dimensions.
    #[instrument(skip(self, session), fields(mode = ?self.mode, page = session.current_page()))]
    pub fn plan_subsequent_image(
        &self,
        img_width_px: u32,
        img_height_px: u32,
        session: &mut LayoutSession,
    ) -> Result<PlacedImage> {
        check_dimensions(img_width_px, img_height_px)?;
        let page = *session.page();
        let margin = page.margin_mm;
        let ratio = fit_ratio(&page, img_width_px, img_height_px)?;
        let width_mm = img_width_px as f64 * ratio;
        let height_mm = img_height_px as f64 * ratio;

        let (page_index, y_mm) = match self.mode {
            LayoutMode::OnePerPage => (session.break_page(), margin),
            LayoutMode::AllInOne => {
                let current_y = session.current_y_mm();
                if current_y + height_mm + margin > page.height_mm {
                    debug!(current_y, height_mm, "Image overflows page; breaking");
                    (session.break_page(), margin)
                } else {
                    (session.current_page(), current_y + margin)
                }
            }
        };

        let placed = PlacedImage {
            x_mm: margin,
            y_mm,
            width_mm,
            height_mm,
            page_index,
        };
        session.push(placed);
        debug!(page_index, y_mm, width_mm, height_mm, "Image planned");
        Ok(placed)
    }

    /// Place the next image, starting a session if this is the first one.
    pub fn place(
        &self,
        session: &mut Option<LayoutSession>,
        img_width_px: u32,
        img_height_px: u32,
    ) -> Result<PlacedImage> {
        match session {
            Some(existing) => self.plan_subsequent_image(img_width_px, img_height_px, existing),
            None => {
                let (page, placed) = self.plan_first_image(img_width_px, img_height_px)?;
                *session = Some(LayoutSession::start(page, placed));
                Ok(placed)
            }
        }
    }
}

fn check_dimensions(width_px: u32, height_px: u32) -> Result<()> {
    if width_px == 0 || height_px == 0 {
        return Err(PixelwerkError::Geometry(format!(
            "image dimensions must be positive, got {width_px}x{height_px}"
        )));
    }
    Ok(())
}

/// Uniform scale that fits the image inside the page's margin-inset area.
fn fit_ratio(page: &PageGeometry, width_px: u32, height_px: u32) -> Result<f64> {
    let content_w = page.content_width_mm();
    let content_h = page.content_height_mm();
    if content_w <= 0.0 || content_h <= 0.0 {
        return Err(PixelwerkError::Geometry(format!(
            "a {}mm margin leaves no room on a {}x{}mm page",
            page.margin_mm, page.width_mm, page.height_mm
        )));
    }
    Ok((content_w / width_px as f64).min(content_h / height_px as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelwerk_core::PaperSize;

    const EPS: f64 = 1e-6;

    fn planner(page_size: PageSizePolicy, margin: f64, mode: LayoutMode) -> LayoutPlanner {
        LayoutPlanner::new(page_size, OrientationPolicy::Auto, margin, mode).unwrap()
    }

    fn a4(margin: f64, mode: LayoutMode) -> LayoutPlanner {
        planner(PageSizePolicy::Paper(PaperSize::A4), margin, mode)
    }

    #[test]
    fn auto_page_matches_image_at_96_dpi() {
        let p = planner(PageSizePolicy::Auto, 10.0, LayoutMode::OnePerPage);
        let (page, placed) = p.plan_first_image(1920, 1080).unwrap();
        assert!((page.width_mm - 528.0).abs() < EPS);
        assert!((page.height_mm - 305.75).abs() < EPS);
        assert_eq!(page.orientation, Orientation::Landscape);
        assert_eq!((placed.x_mm, placed.y_mm), (10.0, 10.0));
        assert!((placed.width_mm - 508.0).abs() < EPS);
        assert!((placed.height_mm - 285.75).abs() < EPS);
    }

    #[test]
    fn auto_page_square_image_is_portrait() {
        let p = planner(PageSizePolicy::Auto, 0.0, LayoutMode::OnePerPage);
        let (page, _) = p.plan_first_image(96, 96).unwrap();
        assert_eq!(page.orientation, Orientation::Portrait);
        assert!((page.width_mm - 25.4).abs() < EPS);
    }

    #[test]
    fn named_page_fits_and_preserves_aspect() {
        let p = a4(10.0, LayoutMode::OnePerPage);
        for (w, h) in [(1920, 1080), (600, 4000), (1, 1), (3000, 3000)] {
            let (page, placed) = p.plan_first_image(w, h).unwrap();
            let aspect = w as f64 / h as f64;
            assert!((placed.width_mm / placed.height_mm - aspect).abs() < EPS);
            assert!(placed.width_mm <= page.width_mm - 20.0 + EPS);
            assert!(placed.height_mm <= page.height_mm - 20.0 + EPS);
            assert_eq!((placed.x_mm, placed.y_mm), (10.0, 10.0));
        }
    }

    #[test]
    fn auto_orientation_rotates_page_for_wide_image() {
        let p = a4(10.0, LayoutMode::OnePerPage);
        let (page, placed) = p.plan_first_image(1920, 1080).unwrap();
        assert_eq!(page.orientation, Orientation::Landscape);
        assert_eq!((page.width_mm, page.height_mm), (297.0, 210.0));
        // Width is the binding side: 277mm of content.
        assert!((placed.width_mm - 277.0).abs() < EPS);
        assert!(placed.height_mm < 190.0);
    }

    #[test]
    fn explicit_orientation_overrides_image() {
        let p = LayoutPlanner::new(
            PageSizePolicy::Paper(PaperSize::A4),
            OrientationPolicy::Portrait,
            10.0,
            LayoutMode::OnePerPage,
        )
        .unwrap();
        let (page, placed) = p.plan_first_image(1920, 1080).unwrap();
        assert_eq!(page.orientation, Orientation::Portrait);
        assert!((placed.width_mm - 190.0).abs() < EPS);
    }

    #[test]
    fn first_image_planning_is_pure() {
        let p = a4(12.5, LayoutMode::AllInOne);
        assert_eq!(
            p.plan_first_image(640, 480).unwrap(),
            p.plan_first_image(640, 480).unwrap()
        );
    }

    #[test]
    fn one_per_page_always_breaks() {
        let p = a4(10.0, LayoutMode::OnePerPage);
        let mut session = None;
        for expected_page in 0..3 {
            let placed = p.place(&mut session, 100, 50).unwrap();
            assert_eq!(placed.page_index, expected_page);
            assert_eq!((placed.x_mm, placed.y_mm), (10.0, 10.0));
        }
        assert_eq!(session.unwrap().page_count(), 3);
    }

    #[test]
    fn all_in_one_flows_below_previous_image() {
        // Portrait A4, 190mm content width: a 2:1 image is 190 x 95mm.
        let p = LayoutPlanner::new(
            PageSizePolicy::Paper(PaperSize::A4),
            OrientationPolicy::Portrait,
            10.0,
            LayoutMode::AllInOne,
        )
        .unwrap();
        let mut session = None;
        let first = p.place(&mut session, 200, 100).unwrap();
        assert!((first.bottom_mm() - 105.0).abs() < EPS);

        let second = p.place(&mut session, 200, 100).unwrap();
        assert_eq!(second.page_index, 0);
        assert!((second.y_mm - 115.0).abs() < EPS);
        assert!((session.as_ref().unwrap().current_y_mm() - 210.0).abs() < EPS);
    }

    #[test]
    fn all_in_one_breaks_when_image_overflows() {
        let p = LayoutPlanner::new(
            PageSizePolicy::Paper(PaperSize::A4),
            OrientationPolicy::Portrait,
            10.0,
            LayoutMode::AllInOne,
        )
        .unwrap();
        let mut session = None;
        p.place(&mut session, 200, 100).unwrap();
        p.place(&mut session, 200, 100).unwrap();

        // Cursor at 210mm; 210 + 95 + 10 > 297, so a new page starts.
        let third = p.place(&mut session, 200, 100).unwrap();
        assert_eq!(third.page_index, 1);
        assert_eq!((third.x_mm, third.y_mm), (10.0, 10.0));

        let session = session.unwrap();
        assert_eq!(session.page_count(), 2);
        assert!((session.current_y_mm() - 105.0).abs() < EPS);
    }

    #[test]
    fn later_images_use_first_page_size() {
        let p = planner(PageSizePolicy::Auto, 5.0, LayoutMode::OnePerPage);
        let mut session = None;
        p.place(&mut session, 960, 480).unwrap();
        let page = *session.as_ref().unwrap().page();

        let tall = p.place(&mut session, 100, 1000).unwrap();
        assert!(tall.height_mm <= page.height_mm - 10.0 + EPS);
        assert!((tall.width_mm / tall.height_mm - 0.1).abs() < EPS);
    }

    #[test]
    fn degenerate_inputs_fail_fast() {
        let p = a4(10.0, LayoutMode::OnePerPage);
        assert!(matches!(
            p.plan_first_image(0, 100),
            Err(PixelwerkError::Geometry(_))
        ));
        assert!(
            LayoutPlanner::new(
                PageSizePolicy::Auto,
                OrientationPolicy::Auto,
                -1.0,
                LayoutMode::OnePerPage
            )
            .is_err()
        );
        let huge_margin = a4(150.0, LayoutMode::OnePerPage);
        assert!(matches!(
            huge_margin.plan_first_image(100, 100),
            Err(PixelwerkError::Geometry(_))
        ));
    }
}
