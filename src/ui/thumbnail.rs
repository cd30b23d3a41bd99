//! Half-block image rendering (`▀`, two pixels per cell).

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

use crate::core::curve::{Curve, Rgb};

use super::theme::{fade, shade};

/// Colour adjustments shared by every pixel of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub opacity: f64,
    pub overlay: f64,
    pub brightness: f64,
}

impl Tint {
    pub const NONE: Self = Self {
        opacity: 1.0,
        overlay: 0.0,
        brightness: 1.0,
    };

    pub fn apply(self, c: Rgb) -> Color {
        fade(shade(c, self.overlay, self.brightness), self.opacity)
    }
}

fn pixel(img: &RgbaImage, x: u32, y: u32) -> Rgb {
    let p = img.get_pixel(x.min(img.width() - 1), y.min(img.height() - 1));
    Rgb::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
}

/// Maps cell-space coordinates onto an image, cropping to cover.
#[derive(Debug, Clone, Copy)]
pub struct CoverSampler {
    scale: f64,
    off_x: f64,
    off_y: f64,
}

impl CoverSampler {
    /// `cols` × `rows` cells, i.e. `cols` × `2·rows` pixels.
    pub fn new(img: &RgbaImage, cols: f64, rows: f64) -> Option<Self> {
        if img.width() == 0 || img.height() == 0 || cols <= 0.0 || rows <= 0.0 {
            return None;
        }
        let (w, h) = (f64::from(img.width()), f64::from(img.height()));
        let scale = (cols / w).max(rows * 2.0 / h);
        Some(Self {
            scale,
            off_x: (w * scale - cols) / 2.0,
            off_y: (h * scale - rows * 2.0) / 2.0,
        })
    }

    /// Top and bottom pixel for the cell at local `(col, row)`.
    pub fn cell(&self, img: &RgbaImage, col: f64, row: f64) -> (Rgb, Rgb) {
        let x = ((col + 0.5 + self.off_x) / self.scale).max(0.0) as u32;
        let yt = ((row * 2.0 + 0.5 + self.off_y) / self.scale).max(0.0) as u32;
        let yb = ((row * 2.0 + 1.5 + self.off_y) / self.scale).max(0.0) as u32;
        (pixel(img, x, yt), pixel(img, x, yb))
    }
}

/// Gradient colour for local `(col, row)` of a `cols` × `rows` area.
pub fn placeholder_cell(curve: &Curve<Rgb>, col: f64, row: f64, cols: f64, rows: f64) -> (Rgb, Rgb) {
    let at = |y: f64| {
        let t = (col / cols.max(1.0) + y / (rows * 2.0).max(1.0)) / 2.0;
        curve.sample(t)
    };
    (at(row * 2.0), at(row * 2.0 + 1.0))
}

pub fn set_halfblock(buf: &mut Buffer, x: u16, y: u16, top: Color, bottom: Color) {
    if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
        cell.set_char('▀').set_fg(top).set_bg(bottom);
    }
}

/// Render an image fitted inside `area`, preserving aspect ratio and
/// centred horizontally.
///
/// Terminal cells are ~2× taller than wide, so each cell represents
/// 1 pixel wide × 2 pixels tall; the fit accounts for this.
pub fn render_fit(img: &RgbaImage, area: Rect, tint: Tint, buf: &mut Buffer) {
    use image::imageops::FilterType;

    if area.width == 0 || area.height == 0 || img.width() == 0 || img.height() == 0 {
        return;
    }

    let max_px_w = f64::from(area.width);
    let max_px_h = f64::from(area.height) * 2.0;
    let src_w = f64::from(img.width());
    let src_h = f64::from(img.height());

    let scale = (max_px_w / src_w).min(max_px_h / src_h);
    let fit_w = (src_w * scale).round().max(1.0) as u32;
    let fit_h = (src_h * scale).round().max(1.0) as u32;

    let rgba = image::imageops::resize(img, fit_w, fit_h, FilterType::Triangle);
    let (iw, ih) = (rgba.width(), rgba.height());
    let col_offset = area.width.saturating_sub(iw as u16) / 2;
    let row_offset = area.height.saturating_sub(ih.div_ceil(2) as u16) / 2;

    for row in 0..area.height {
        let yt = u32::from(row) * 2;
        let yb = yt + 1;
        if yt >= ih {
            break;
        }
        for col in 0..iw.min(u32::from(area.width)) {
            let top = tint.apply(pixel(&rgba, col, yt));
            let bottom = if yb < ih {
                tint.apply(pixel(&rgba, col, yb))
            } else {
                Color::Reset
            };
            set_halfblock(
                buf,
                area.x + col_offset + col as u16,
                area.y + row_offset + row,
                top,
                bottom,
            );
        }
    }
}

/// Gradient placeholder filling `area`.
pub fn render_placeholder(curve: &Curve<Rgb>, area: Rect, tint: Tint, buf: &mut Buffer) {
    let (cols, rows) = (f64::from(area.width), f64::from(area.height));
    for row in 0..area.height {
        for col in 0..area.width {
            let (t, b) = placeholder_cell(curve, f64::from(col), f64::from(row), cols, rows);
            set_halfblock(buf, area.x + col, area.y + row, tint.apply(t), tint.apply(b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::{placeholder_curve, ZINC_800};

    #[test]
    fn cover_crops_the_long_side() {
        // 40×10 image into 10 cols × 5 rows (10×10 px): crops left/right.
        let mut img = RgbaImage::new(40, 10);
        for (x, _, p) in img.enumerate_pixels_mut() {
            *p = image::Rgba([if x < 15 { 255 } else { 0 }, 0, 0, 255]);
        }
        let s = CoverSampler::new(&img, 10.0, 5.0).unwrap();
        let (left, _) = s.cell(&img, 0.0, 0.0);
        let (right, _) = s.cell(&img, 9.0, 4.0);
        assert_eq!(left.r, 0.0);
        assert_eq!(right.r, 0.0);
        let (mid, _) = s.cell(&img, 0.0, 2.0);
        assert_eq!(mid.r, 0.0);
    }

    #[test]
    fn placeholder_starts_at_the_top_left() {
        let curve = placeholder_curve();
        let (top, _) = placeholder_cell(&curve, 0.0, 0.0, 10.0, 5.0);
        assert_eq!(top, ZINC_800);
    }

    #[test]
    fn tint_applies_overlay_then_opacity() {
        let c = Rgb::new(200.0, 100.0, 0.0);
        assert_eq!(Tint::NONE.apply(c), Color::Rgb(200, 100, 0));
        let dim = Tint {
            opacity: 0.5,
            overlay: 0.5,
            brightness: 1.0,
        };
        assert_eq!(dim.apply(c), Color::Rgb(50, 25, 0));
    }

    #[test]
    fn render_fit_draws_halfblocks() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        render_fit(&img, area, Tint::NONE, &mut buf);
        let drawn = buf.content().iter().filter(|c| c.symbol() == "▀").count();
        assert!(drawn > 0);
    }
}
