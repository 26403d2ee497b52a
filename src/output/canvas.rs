//! Raster drawing primitives for the static charts.
//!
//! A `Canvas` owns an RGB image with a framed plot area.  Series are mapped
//! into the plot area by index (x) and by a caller-supplied value range (y).

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

/// Common color definitions
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);
    pub const BLUE: Rgb<u8> = Rgb([31, 119, 180]);
    pub const ORANGE: Rgb<u8> = Rgb([255, 127, 14]);
    pub const GREEN: Rgb<u8> = Rgb([44, 160, 44]);
    pub const RED: Rgb<u8> = Rgb([214, 39, 40]);
    pub const PURPLE: Rgb<u8> = Rgb([148, 103, 189]);
    pub const STEEL: Rgb<u8> = Rgb([120, 144, 156]);
}

/// Pixel margins around the plot area.
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 40;

/// Horizontal grid divisions.
const GRID_LINES: u32 = 5;

/// Closed numeric interval mapped onto the plot's vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest range covering every defined value in `columns`, padded by
    /// 5% on each side.  `None` when nothing is defined.
    pub fn covering(columns: &[&[Option<f64>]]) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in columns.iter().flat_map(|c| c.iter().flatten()) {
            if v.is_finite() {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        Some(Self::new(min, max).padded(0.05))
    }

    /// Widen by `frac` of the span on each side.  A zero span widens by
    /// `frac` of the magnitude (or by 1.0 around zero).
    pub fn padded(self, frac: f64) -> Self {
        let span = self.max - self.min;
        let pad = if span > 0.0 {
            span * frac
        } else if self.max != 0.0 {
            self.max.abs() * frac
        } else {
            1.0
        };
        Self::new(self.min - pad, self.max + pad)
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Plot-area bounds in pixels (inclusive).
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl PlotArea {
    fn width(&self) -> u32 {
        self.right - self.left
    }

    fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

pub struct Canvas {
    img: RgbImage,
    area: PlotArea,
}

impl Canvas {
    /// Blank white canvas with a framed plot area and horizontal grid.
    ///
    /// Callers guarantee `width >= 200` and `height >= 150` (validated in
    /// the config), which leaves a non-empty plot area.
    pub fn new(width: u32, height: u32) -> Self {
        let img = RgbImage::from_pixel(width, height, colors::WHITE);
        let area = PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: width.saturating_sub(MARGIN_RIGHT).max(MARGIN_LEFT + 1),
            bottom: height.saturating_sub(MARGIN_BOTTOM).max(MARGIN_TOP + 1),
        };
        let mut canvas = Self { img, area };
        canvas.draw_grid();
        canvas.draw_frame();
        canvas
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    // -------------------------------------------------------------------------
    // Series
    // -------------------------------------------------------------------------

    /// Polyline through the defined points of `values`.  `None` breaks the
    /// line.
    pub fn line_series(&mut self, values: &[Option<f64>], range: ValueRange, color: Rgb<u8>) {
        let n = values.len();
        let mut prev: Option<(i64, i64)> = None;
        for (i, v) in values.iter().enumerate() {
            match v.filter(|v| v.is_finite()) {
                Some(v) => {
                    let pt = (self.x_at(i, n), self.y_at(v, range));
                    match prev {
                        Some(p) => self.thick_line(p, pt, color),
                        None => self.put(pt.0, pt.1, color),
                    }
                    prev = Some(pt);
                }
                None => prev = None,
            }
        }
    }

    /// One vertical bar per value, rising from the bottom of `range`.
    pub fn bar_series(&mut self, values: &[f64], range: ValueRange, color: Rgb<u8>) {
        let n = values.len();
        if n == 0 {
            return;
        }
        let slot = (self.area.width() as f64 / n as f64).max(1.0);
        let bar_w = ((slot * 0.8).floor() as u32).max(1);
        let base = self.area.bottom as i64;
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let x0 = self.area.left as i64 + (i as f64 * slot) as i64;
            let top = self.y_at(v, range);
            self.fill_rect(x0, top, bar_w as i64, base - top + 1, color);
        }
    }

    /// Horizontal reference line at `value`.
    pub fn hline(&mut self, value: f64, range: ValueRange, color: Rgb<u8>, dashed: bool) {
        let y = self.y_at(value, range);
        for x in self.area.left..=self.area.right {
            if dashed && (x / 6) % 2 == 1 {
                continue;
            }
            self.put(x as i64, y, color);
        }
    }

    /// Vertical reference line at fractional position `frac` (0..=1) of the
    /// plot width.
    pub fn vline_at_fraction(&mut self, frac: f64, color: Rgb<u8>) {
        let x = self.area.left as i64 + (frac.clamp(0.0, 1.0) * self.area.width() as f64).round() as i64;
        for y in self.area.top..=self.area.bottom {
            self.put(x, y as i64, color);
        }
    }

    /// Small color swatches in the top-left corner of the plot, one per
    /// plotted series, in drawing order.
    pub fn legend(&mut self, swatches: &[Rgb<u8>]) {
        let x0 = self.area.left as i64 + 10;
        let y0 = self.area.top as i64 + 10;
        for (i, &color) in swatches.iter().enumerate() {
            let y = y0 + i as i64 * 14;
            self.fill_rect(x0, y, 24, 8, color);
        }
    }

    /// Write the image as PNG.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.img
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to encode PNG to {}", path.display()))
    }

    // -------------------------------------------------------------------------
    // Coordinate mapping
    // -------------------------------------------------------------------------

    fn x_at(&self, i: usize, n: usize) -> i64 {
        if n <= 1 {
            return (self.area.left + self.area.width() / 2) as i64;
        }
        let frac = i as f64 / (n - 1) as f64;
        self.area.left as i64 + (frac * self.area.width() as f64).round() as i64
    }

    fn y_at(&self, v: f64, range: ValueRange) -> i64 {
        let span = range.span();
        let frac = if span > 0.0 {
            ((v - range.min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.area.bottom as i64 - (frac * self.area.height() as f64).round() as i64
    }

    // -------------------------------------------------------------------------
    // Pixel helpers
    // -------------------------------------------------------------------------

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        for dy in 0..h.max(0) {
            for dx in 0..w.max(0) {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham line, two pixels thick.
    fn thick_line(&mut self, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            self.put(x, y + 1, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_grid(&mut self) {
        for k in 1..GRID_LINES {
            let y = self.area.top + self.area.height() * k / GRID_LINES;
            for x in self.area.left..=self.area.right {
                self.put(x as i64, y as i64, colors::GRID);
            }
        }
    }

    fn draw_frame(&mut self) {
        let PlotArea {
            left,
            top,
            right,
            bottom,
        } = self.area;
        for x in left..=right {
            self.put(x as i64, top as i64, colors::BLACK);
            self.put(x as i64, bottom as i64, colors::BLACK);
        }
        for y in top..=bottom {
            self.put(left as i64, y as i64, colors::BLACK);
            self.put(right as i64, y as i64, colors::BLACK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(canvas: &Canvas, color: Rgb<u8>) -> usize {
        canvas.image().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn covering_range_pads_and_skips_none() {
        let a = [None, Some(10.0), Some(20.0)];
        let b = [Some(15.0), None];
        let r = ValueRange::covering(&[&a[..], &b[..]]).unwrap();
        assert!((r.min - 9.5).abs() < 1e-12);
        assert!((r.max - 20.5).abs() < 1e-12);
        let none: [Option<f64>; 2] = [None, None];
        assert!(ValueRange::covering(&[&none[..]]).is_none());
    }

    #[test]
    fn flat_range_is_widened() {
        let r = ValueRange::new(100.0, 100.0).padded(0.05);
        assert!(r.min < 100.0 && r.max > 100.0);
        let r = ValueRange::new(0.0, 0.0).padded(0.05);
        assert_eq!((r.min, r.max), (-1.0, 1.0));
    }

    #[test]
    fn new_canvas_has_frame() {
        let canvas = Canvas::new(300, 200);
        assert_eq!(canvas.image().dimensions(), (300, 200));
        assert!(count(&canvas, colors::BLACK) > 0);
    }

    #[test]
    fn line_series_draws_and_breaks_on_none() {
        let mut canvas = Canvas::new(300, 200);
        let range = ValueRange::new(0.0, 10.0);
        canvas.line_series(&[Some(1.0), Some(9.0), None, None], range, colors::BLUE);
        assert!(count(&canvas, colors::BLUE) > 10);

        let mut empty = Canvas::new(300, 200);
        empty.line_series(&[None, None], range, colors::BLUE);
        assert_eq!(count(&empty, colors::BLUE), 0);
    }

    #[test]
    fn dashed_hline_draws_fewer_pixels() {
        let range = ValueRange::new(0.0, 100.0);
        let mut solid = Canvas::new(300, 200);
        solid.hline(70.0, range, colors::RED, false);
        let mut dashed = Canvas::new(300, 200);
        dashed.hline(70.0, range, colors::RED, true);
        let (s, d) = (count(&solid, colors::RED), count(&dashed, colors::RED));
        assert!(d > 0 && d < s, "solid {s}, dashed {d}");
    }

    #[test]
    fn bars_rise_from_bottom() {
        let mut canvas = Canvas::new(300, 200);
        canvas.bar_series(&[0.0, 5.0, 10.0], ValueRange::new(0.0, 10.0), colors::STEEL);
        assert!(count(&canvas, colors::STEEL) > 100);
    }
}
