// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 2x enhancer — bilinear upscaling followed by a light unsharp-mask boost and
// a neighbourhood clamp that keeps the boost from amplifying noise.

use pixelwerk_core::error::{PixelwerkError, Result};
use pixelwerk_core::{CHANNELS, PixelBuffer};
use tracing::{debug, info, instrument};

/// Output is always this many times the input on both axes.
pub const UPSCALE_FACTOR: u32 = 2;

/// Tuning for the sharpen and noise-clamp steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceOptions {
    /// How far the interpolated value is pushed away from the neighbourhood mean.
    pub sharpen: f64,
    /// Lower clamp, as a factor of the darkest neighbour.
    pub floor_factor: f64,
    /// Upper clamp, as a factor of the brightest neighbour.
    pub ceiling_factor: f64,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            sharpen: 0.3,
            floor_factor: 0.9,
            ceiling_factor: 1.1,
        }
    }
}

/// Upscales an image 2x with bilinear interpolation and sharpens the result.
///
/// The transform is pure: the same input always yields the same output. For
/// each destination pixel the four nearest source pixels are blended; the
/// blend is then pushed away from their mean by [`EnhanceOptions::sharpen`]
/// and clamped to `[min * floor_factor, max * ceiling_factor]` of those same
/// four samples before the final `0..=255` clamp. Alpha is copied from the
/// top-left neighbour and never interpolated.
///
/// Samples past the right and bottom edges are clamped to the last
/// row/column.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    options: EnhanceOptions,
}

impl Enhancer {
    pub fn new(options: EnhanceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    /// Produce the 2x enhanced copy of `input`.
    #[instrument(skip_all, fields(width = input.width(), height = input.height()))]
    pub fn enhance(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        let (width, height) = input.dimensions();
        let (new_width, new_height) = match (
            width.checked_mul(UPSCALE_FACTOR),
            height.checked_mul(UPSCALE_FACTOR),
        ) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(PixelwerkError::Geometry(format!(
                    "{width}x{height} is too large to upscale"
                )));
            }
        };
        info!(new_width, new_height, "Enhancing image");

        let src = input.as_raw();
        let src_w = width as usize;
        let max_x = src_w - 1;
        let max_y = height as usize - 1;
        let scale = UPSCALE_FACTOR as f64;

        let mut out = vec![0u8; new_width as usize * new_height as usize * CHANNELS];

        for y in 0..new_height as usize {
            let orig_y = y as f64 / scale;
            let y1 = orig_y.floor() as usize;
            let y2 = (y1 + 1).min(max_y);
            let y_ratio = orig_y - y1 as f64;

            for x in 0..new_width as usize {
                let orig_x = x as f64 / scale;
                let x1 = orig_x.floor() as usize;
                let x2 = (x1 + 1).min(max_x);
                let x_ratio = orig_x - x1 as f64;

                // Top-left, top-right, bottom-left, bottom-right.
                let corners = [
                    (y1 * src_w + x1) * CHANNELS,
                    (y1 * src_w + x2) * CHANNELS,
                    (y2 * src_w + x1) * CHANNELS,
                    (y2 * src_w + x2) * CHANNELS,
                ];
                let dst = (y * new_width as usize + x) * CHANNELS;

                for channel in 0..3 {
                    let samples = corners.map(|idx| src[idx + channel] as f64);
                    out[dst + channel] = self.enhance_sample(samples, x_ratio, y_ratio);
                }
                out[dst + 3] = src[corners[0] + 3];
            }
        }

        debug!(bytes = out.len(), "Enhancement complete");
        PixelBuffer::new(new_width, new_height, out)
    }

    /// Blend, sharpen and clamp one colour channel.
    fn enhance_sample(&self, samples: [f64; 4], x_ratio: f64, y_ratio: f64) -> u8 {
        let [tl, tr, bl, br] = samples;
        let x_opposite = 1.0 - x_ratio;
        let y_opposite = 1.0 - y_ratio;

        let val = tl * x_opposite * y_opposite
            + tr * x_ratio * y_opposite
            + bl * x_opposite * y_ratio
            + br * x_ratio * y_ratio;

        let avg = (tl + tr + bl + br) / 4.0;
        let mut enhanced = val + (val - avg) * self.options.sharpen;

        let min = tl.min(tr).min(bl).min(br);
        let max = tl.max(tr).max(bl).max(br);
        if enhanced < min * self.options.floor_factor {
            enhanced = min * self.options.floor_factor;
        }
        if enhanced > max * self.options.ceiling_factor {
            enhanced = max * self.options.ceiling_factor;
        }

        to_channel(enhanced)
    }
}

/// Clamp to `0..=255` and round half to even, matching how canvas byte arrays
/// store floating-point values.
fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(width: u32, height: u32, pixels: &[[u8; 4]]) -> PixelBuffer {
        PixelBuffer::new(width, height, pixels.concat()).unwrap()
    }

    #[test]
    fn output_is_double_size() {
        let enhancer = Enhancer::default();
        for (w, h) in [(1, 1), (3, 1), (1, 5), (7, 4)] {
            let input = PixelBuffer::filled(w, h, [10, 20, 30, 255]).unwrap();
            let out = enhancer.enhance(&input).unwrap();
            assert_eq!(out.dimensions(), (w * 2, h * 2));
            assert_eq!(out.as_raw().len(), (w * h * 16) as usize);
        }
    }

    #[test]
    fn single_pixel_is_replicated() {
        let input = rgba(1, 1, &[[12, 34, 56, 78]]);
        let out = Enhancer::default().enhance(&input).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), [12, 34, 56, 78]);
            }
        }
    }

    #[test]
    fn top_left_pixel_is_unchanged() {
        let input = rgba(
            2,
            2,
            &[
                [200, 10, 90, 255],
                [30, 240, 60, 255],
                [5, 77, 180, 255],
                [255, 0, 128, 255],
            ],
        );
        let out = Enhancer::default().enhance(&input).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.pixel(0, 0), input.pixel(0, 0));
    }

    #[test]
    fn uniform_alpha_passes_through() {
        let pixels: Vec<[u8; 4]> = (0..12u8).map(|i| [i * 21, 255 - i * 7, i, 137]).collect();
        let input = rgba(4, 3, &pixels);
        let out = Enhancer::default().enhance(&input).unwrap();
        assert!(out.as_raw().chunks_exact(4).all(|px| px[3] == 137));
    }

    #[test]
    fn alpha_comes_from_top_left_neighbour() {
        let input = rgba(2, 1, &[[0, 0, 0, 10], [0, 0, 0, 250]]);
        let out = Enhancer::default().enhance(&input).unwrap();
        // x = 1 blends columns 0 and 1 but keeps column 0's alpha.
        assert_eq!(out.pixel(1, 0)[3], 10);
        assert_eq!(out.pixel(2, 0)[3], 250);
    }

    #[test]
    fn checkerboard_stays_in_range() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let input = rgba(2, 2, &[white, black, black, white]);
        let out = Enhancer::default().enhance(&input).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        // Corners map straight onto source pixels.
        assert_eq!(out.pixel(0, 0), white);
        assert_eq!(out.pixel(2, 0), black);
        // The centre of the 2x2 block blends to mid-grey.
        assert_eq!(out.pixel(1, 1), [128, 128, 128, 255]);
    }

    #[test]
    fn known_values_for_red_channel() {
        // Red channel: 100, 200 / 4, 6.
        let input = rgba(
            2,
            2,
            &[[100, 0, 0, 255], [200, 0, 0, 255], [4, 0, 0, 255], [6, 0, 0, 255]],
        );
        let out = Enhancer::default().enhance(&input).unwrap();

        // Horizontal midpoint on the top row: 150 sharpened away from 77.5.
        assert_eq!(out.pixel(1, 0)[0], 172);
        // Centre of the block equals the mean; 77.5 rounds half to even.
        assert_eq!(out.pixel(1, 1)[0], 78);
        // Vertical midpoint on the left column: 52 pulled down to 44.35.
        assert_eq!(out.pixel(0, 1)[0], 44);
        // Right edge: 200 boosted to 229.1 then clamped to 200 * 1.1.
        assert_eq!(out.pixel(3, 0)[0], 220);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let input = PixelBuffer::filled(3, 3, [90, 180, 45, 255]).unwrap();
        let out = Enhancer::default().enhance(&input).unwrap();
        assert!(
            out.as_raw()
                .chunks_exact(4)
                .all(|px| px == [90, 180, 45, 255])
        );
    }

    #[test]
    fn enhancement_is_deterministic() {
        let pixels: Vec<[u8; 4]> = (0..20u8).map(|i| [i * 13, i * 7, 255 - i, 255]).collect();
        let input = rgba(5, 4, &pixels);
        let enhancer = Enhancer::default();
        assert_eq!(
            enhancer.enhance(&input).unwrap(),
            enhancer.enhance(&input).unwrap()
        );
    }

    #[test]
    fn channel_conversion_clamps() {
        assert_eq!(to_channel(-3.0), 0);
        assert_eq!(to_channel(280.5), 255);
        assert_eq!(to_channel(2.5), 2);
        assert_eq!(to_channel(f64::NAN), 0);
    }
}
