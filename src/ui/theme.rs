//! Colour palette and text styles used across the UI.
//!
//! Terminals have no alpha channel, so opacity is rendered by blending
//! toward the page background.

use ratatui::style::{Color, Modifier, Style};

use crate::core::curve::{fixed, Curve, Lerp, Rgb};

pub const BACKGROUND: Rgb = Rgb::new(0.0, 0.0, 0.0);
pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
pub const ZINC_400: Rgb = Rgb::new(161.0, 161.0, 170.0);
pub const ZINC_500: Rgb = Rgb::new(113.0, 113.0, 122.0);
pub const ZINC_800: Rgb = Rgb::new(39.0, 39.0, 42.0);
pub const ZINC_900: Rgb = Rgb::new(24.0, 24.0, 27.0);
pub const ZINC_950: Rgb = Rgb::new(9.0, 9.0, 11.0);

/// Estimated cell size in pixels; converts px offsets to cells.
pub const PX_PER_COL: f64 = 8.0;
pub const PX_PER_ROW: f64 = 16.0;

pub fn to_color(c: Rgb) -> Color {
    let (r, g, b) = c.to_u8();
    Color::Rgb(r, g, b)
}

/// `c` at `opacity` over the background.
pub fn fade(c: Rgb, opacity: f64) -> Color {
    to_color(BACKGROUND.lerp(&c, opacity.clamp(0.0, 1.0)))
}

/// Darkness overlay and brightness applied before fading.
pub fn shade(c: Rgb, overlay: f64, brightness: f64) -> Rgb {
    c.scaled((1.0 - overlay.clamp(0.0, 1.0)) * brightness)
}

/// Diagonal zinc gradient for cards without a decodable image.
pub fn placeholder_curve() -> Curve<Rgb> {
    fixed(&[0.0, 0.5, 1.0], &[ZINC_800, ZINC_900, ZINC_950], ZINC_900)
}

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub fn text_style(opacity: f64) -> Style {
        Style::default().fg(fade(WHITE, opacity))
    }

    pub fn muted_style(opacity: f64) -> Style {
        Style::default().fg(fade(ZINC_500, opacity))
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style() -> Style {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn input_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_blends_toward_black() {
        assert_eq!(fade(WHITE, 1.0), Color::Rgb(255, 255, 255));
        assert_eq!(fade(WHITE, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(fade(WHITE, 0.5), Color::Rgb(128, 128, 128));
    }

    #[test]
    fn placeholder_runs_light_to_dark() {
        let curve = placeholder_curve();
        assert_eq!(curve.sample(0.0), ZINC_800);
        assert_eq!(curve.sample(1.0), ZINC_950);
        let mid = curve.sample(0.25);
        assert!(mid.r < ZINC_800.r && mid.r > ZINC_900.r);
    }
}
