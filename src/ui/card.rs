//! Shared card painter for the showcase and helix views.
//!
//! A card is a float rectangle in cell space.  Rotation is approximated by
//! shearing each row horizontally; cells are twice as tall as wide, so one
//! row of vertical distance shifts by `2·tan(rotation)` columns.

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
};

use crate::core::curve::{Curve, Lerp, Rgb};

use super::theme::{fade, WHITE, ZINC_400};
use super::thumbnail::{placeholder_cell, set_halfblock, CoverSampler, Tint};

/// Card placement in cell space (centre, size, rotation in radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardShape {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl CardShape {
    fn top(&self) -> f64 {
        self.cy - self.height / 2.0
    }

    /// Left edge of the row whose centre is at `row_center`.
    fn left_at(&self, row_center: f64) -> f64 {
        let shear = -2.0 * self.rotation.tan();
        self.cx - self.width / 2.0 + (row_center - self.cy) * shear
    }

    /// Card-local `(col, row)` covering the cell at `(x, y)`, if any.
    pub fn local(&self, x: u16, y: u16) -> Option<(f64, f64)> {
        let row_center = f64::from(y) + 0.5;
        let lr = row_center - self.top();
        if lr < 0.0 || lr >= self.height {
            return None;
        }
        let lc = f64::from(x) + 0.5 - self.left_at(row_center);
        if lc < 0.0 || lc >= self.width {
            return None;
        }
        Some((lc.floor(), lr.floor()))
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.local(x, y).is_some()
    }

    /// Unrotated bounding cells, clipped to `clip`.
    fn bounds(&self, clip: Rect) -> Option<Rect> {
        let slack = (self.height * 2.0 * self.rotation.tan()).abs();
        let x0 = (self.cx - self.width / 2.0 - slack).floor().max(f64::from(clip.left()));
        let x1 = (self.cx + self.width / 2.0 + slack).ceil().min(f64::from(clip.right()));
        let y0 = self.top().floor().max(f64::from(clip.top()));
        let y1 = (self.top() + self.height).ceil().min(f64::from(clip.bottom()));
        if !(x0.is_finite() && y0.is_finite()) || x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
    }
}

/// What fills the card face.
pub enum Fill<'a> {
    Image(&'a RgbaImage),
    Placeholder(&'a Curve<Rgb>),
}

/// Hover ring and drop shadow, both in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub outline: f64,
    pub shadow: f64,
}

impl Edge {
    pub const NONE: Self = Self {
        outline: 0.0,
        shadow: 0.0,
    };
}

/// How far a full-strength ring pulls edge cells toward white.
const RING_MIX: f64 = 0.35;

fn darken(c: Color, k: f64) -> Color {
    match c {
        Color::Rgb(r, g, b) => {
            let f = |v: u8| (f64::from(v) * (1.0 - k)).round() as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}

/// Text drawn over the bottom of the card.
pub struct Caption<'a> {
    pub title: &'a str,
    pub meta: String,
    pub emphasis: bool,
}

pub fn paint(
    buf: &mut Buffer,
    clip: Rect,
    shape: &CardShape,
    fill: &Fill<'_>,
    tint: Tint,
    edge: Edge,
    caption: Option<&Caption<'_>>,
) {
    let clip = clip.intersection(buf.area);
    let Some(bounds) = shape.bounds(clip) else {
        return;
    };
    let sampler = match fill {
        Fill::Image(img) => CoverSampler::new(img, shape.width.round(), shape.height.round()),
        Fill::Placeholder(_) => None,
    };

    for y in bounds.top()..bounds.bottom() {
        for x in bounds.left()..bounds.right() {
            let Some((lc, lr)) = shape.local(x, y) else {
                continue;
            };
            let (top, bottom) = match (fill, &sampler) {
                (Fill::Image(img), Some(s)) => s.cell(img, lc, lr),
                (Fill::Placeholder(curve), _) => {
                    placeholder_cell(curve, lc, lr, shape.width, shape.height)
                }
                (Fill::Image(_), None) => continue,
            };
            let on_edge = lc == 0.0
                || lr == 0.0
                || lc + 1.0 >= shape.width.ceil()
                || lr + 1.0 >= shape.height.ceil();
            let (top, bottom) = if on_edge && edge.outline > 0.0 {
                let mix = edge.outline.clamp(0.0, 1.0) * RING_MIX;
                (top.lerp(&WHITE, mix), bottom.lerp(&WHITE, mix))
            } else {
                (top, bottom)
            };
            set_halfblock(buf, x, y, tint.apply(top), tint.apply(bottom));
        }
    }

    paint_shadow(buf, clip, shape, edge.shadow * tint.opacity);

    if let Some(caption) = caption {
        if shape.height >= 4.0 {
            let base = (shape.top() + shape.height).floor() - 1.0;
            let mut title = Style::default().fg(fade(WHITE, tint.opacity));
            if caption.emphasis {
                title = title.add_modifier(Modifier::BOLD);
            }
            let meta = Style::default().fg(fade(ZINC_400, tint.opacity));
            put_text(buf, clip, shape, base - 1.0, caption.title, title);
            put_text(buf, clip, shape, base, &caption.meta, meta);
        }
    }
}

/// Darken the row under the card, offset one column right.
fn paint_shadow(buf: &mut Buffer, clip: Rect, shape: &CardShape, strength: f64) {
    if !(strength > 0.0) {
        return;
    }
    let bottom = (shape.top() + shape.height).ceil();
    if bottom < f64::from(clip.top()) || bottom >= f64::from(clip.bottom()) {
        return;
    }
    let y = bottom as u16;
    let left = (shape.left_at(bottom - 0.5) + 1.0).floor();
    let k = strength.clamp(0.0, 1.0);
    for i in 0..shape.width.ceil() as u32 {
        let x = left + f64::from(i);
        if x < f64::from(clip.left()) || x >= f64::from(clip.right()) {
            continue;
        }
        if let Some(cell) = buf.cell_mut(Position::new(x as u16, y)) {
            let (fg, bg) = (darken(cell.fg, k), darken(cell.bg, k));
            cell.set_fg(fg).set_bg(bg);
        }
    }
}

/// Write `text` two cells in from the sheared left edge of row `row`,
/// clipped to the card and to `clip`.
fn put_text(buf: &mut Buffer, clip: Rect, shape: &CardShape, row: f64, text: &str, style: Style) {
    if row < f64::from(clip.top()) || row >= f64::from(clip.bottom()) {
        return;
    }
    let y = row as u16;
    let start = (shape.left_at(row + 0.5) + 2.0).floor();
    let limit = shape.width - 4.0;
    for (i, ch) in text.chars().enumerate() {
        if i as f64 >= limit {
            break;
        }
        let x = start + i as f64;
        if x < f64::from(clip.left()) || x >= f64::from(clip.right()) {
            continue;
        }
        if let Some(cell) = buf.cell_mut(Position::new(x as u16, y)) {
            cell.set_char(ch).set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::placeholder_curve;

    fn shape(rotation: f64) -> CardShape {
        CardShape {
            cx: 20.0,
            cy: 10.0,
            width: 10.0,
            height: 6.0,
            rotation,
        }
    }

    #[test]
    fn unrotated_card_covers_its_rectangle() {
        let s = shape(0.0);
        assert!(s.contains(15, 7));
        assert!(s.contains(24, 12));
        assert!(!s.contains(14, 7));
        assert!(!s.contains(25, 7));
        assert!(!s.contains(15, 6));
        assert!(!s.contains(15, 13));
        assert_eq!(s.local(15, 7), Some((0.0, 0.0)));
    }

    #[test]
    fn rotation_shears_rows_in_opposite_directions() {
        let s = shape(0.2);
        let top_left = (0..40).find(|&x| s.contains(x, 7)).unwrap();
        let bottom_left = (0..40).find(|&x| s.contains(x, 12)).unwrap();
        assert!(top_left > bottom_left);
    }

    #[test]
    fn painting_is_clipped() {
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let curve = placeholder_curve();
        let clip = Rect::new(0, 0, 40, 9);
        paint(&mut buf, clip, &shape(0.0), &Fill::Placeholder(&curve), Tint::NONE, Edge::NONE, None);
        assert_eq!(buf[(15, 8)].symbol(), "▀");
        assert_eq!(buf[(15, 9)].symbol(), " ");
    }

    #[test]
    fn caption_sits_on_the_bottom_rows() {
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        let curve = placeholder_curve();
        let caption = Caption {
            title: "Void",
            meta: "Art · 2024".into(),
            emphasis: false,
        };
        paint(
            &mut buf,
            area,
            &shape(0.0),
            &Fill::Placeholder(&curve),
            Tint::NONE,
            Edge::NONE,
            Some(&caption),
        );
        assert_eq!(buf[(17, 11)].symbol(), "V");
        assert_eq!(buf[(17, 12)].symbol(), "A");
    }

    #[test]
    fn ring_lightens_only_the_edge() {
        let area = Rect::new(0, 0, 40, 20);
        let curve = placeholder_curve();
        let fill = Fill::Placeholder(&curve);
        let mut plain = Buffer::empty(area);
        let mut ringed = Buffer::empty(area);
        paint(&mut plain, area, &shape(0.0), &fill, Tint::NONE, Edge::NONE, None);
        let edge = Edge {
            outline: 1.0,
            shadow: 0.0,
        };
        paint(&mut ringed, area, &shape(0.0), &fill, Tint::NONE, edge, None);
        assert_ne!(plain[(15, 9)].fg, ringed[(15, 9)].fg);
        assert_ne!(plain[(24, 9)].fg, ringed[(24, 9)].fg);
        assert_eq!(plain[(19, 9)].fg, ringed[(19, 9)].fg);
    }

    #[test]
    fn shadow_darkens_the_row_below() {
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        for x in 0..40 {
            buf[(x, 13)].set_bg(Color::Rgb(100, 100, 100));
        }
        let curve = placeholder_curve();
        let edge = Edge {
            outline: 0.0,
            shadow: 0.5,
        };
        paint(&mut buf, area, &shape(0.0), &Fill::Placeholder(&curve), Tint::NONE, edge, None);
        assert_eq!(buf[(18, 13)].bg, Color::Rgb(50, 50, 50));
        assert_eq!(buf[(2, 13)].bg, Color::Rgb(100, 100, 100));
        assert_eq!(buf[(18, 12)].symbol(), "▀");
    }
}
