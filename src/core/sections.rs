//! Scroll-driven hero and footer sections.
//!
//! Both are pure functions of a progress value; the footer additionally
//! smooths its progress through a reveal spring.

use super::curve::{scalar, Curve};
use super::spring::{Spring, SpringConfig};

/// Hero transforms at one scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroVisual {
    pub title_y: f64,
    pub title_opacity: f64,
    pub title_scale: f64,
    pub subtitle_y: f64,
    pub subtitle_opacity: f64,
    pub indicator_y: f64,
    pub indicator_opacity: f64,
    /// Background layer shift, `0.0..=0.8` of its height.
    pub background_shift: f64,
}

/// Hero curves, sampled with progress over `PINNED_TO_EXIT`.
#[derive(Debug, Clone)]
pub struct HeroCurves {
    title_y: Curve<f64>,
    title_opacity: Curve<f64>,
    title_scale: Curve<f64>,
    subtitle_y: Curve<f64>,
    subtitle_opacity: Curve<f64>,
    indicator_y: Curve<f64>,
    indicator_opacity: Curve<f64>,
    background: Curve<f64>,
}

impl Default for HeroCurves {
    fn default() -> Self {
        Self {
            title_y: scalar(&[0.0, 0.6, 1.0], &[0.0, 30.0, 60.0]),
            title_opacity: scalar(&[0.0, 0.4, 0.8], &[1.0, 0.5, 0.0]),
            title_scale: scalar(&[0.0, 0.8], &[1.0, 0.97]),
            subtitle_y: scalar(&[0.0, 0.5, 0.9], &[0.0, 25.0, 50.0]),
            subtitle_opacity: scalar(&[0.0, 0.35, 0.7], &[1.0, 0.4, 0.0]),
            indicator_y: scalar(&[0.0, 0.3], &[0.0, 20.0]),
            indicator_opacity: scalar(&[0.0, 0.15, 0.35], &[1.0, 0.5, 0.0]),
            background: scalar(&[0.0, 1.0], &[0.0, 0.8]),
        }
    }
}

impl HeroCurves {
    pub fn sample(&self, progress: f64) -> HeroVisual {
        HeroVisual {
            title_y: self.title_y.sample(progress),
            title_opacity: self.title_opacity.sample(progress),
            title_scale: self.title_scale.sample(progress),
            subtitle_y: self.subtitle_y.sample(progress),
            subtitle_opacity: self.subtitle_opacity.sample(progress),
            indicator_y: self.indicator_y.sample(progress),
            indicator_opacity: self.indicator_opacity.sample(progress),
            background_shift: self.background.sample(progress),
        }
    }
}

// ───────────────────────────────────────── footer ────────────

pub const FOOTER_LINKS: &[&str] = &["Instagram", "Discord", "LinkedIn"];

#[derive(Debug, Clone, PartialEq)]
pub struct FooterVisual {
    pub y: f64,
    pub opacity: f64,
    /// Horizontal extent of the divider line, `0.0..=1.0`.
    pub divider: f64,
    /// One opacity per entry in [`FOOTER_LINKS`].
    pub links: Vec<f64>,
    pub copyright: f64,
}

/// Footer reveal: progress over `ENTER_TO_SETTLE`, smoothed by a spring.
#[derive(Debug, Clone)]
pub struct FooterReveal {
    spring: Spring,
    y: Curve<f64>,
    opacity: Curve<f64>,
    divider: Curve<f64>,
    links: Vec<Curve<f64>>,
    copyright: Curve<f64>,
}

impl Default for FooterReveal {
    fn default() -> Self {
        let links = (0..FOOTER_LINKS.len())
            .map(|i| {
                let start = 0.4 + 0.08 * i as f64;
                scalar(&[start, start + 0.3], &[0.0, 1.0])
            })
            .collect();
        Self {
            spring: Spring::new(0.0, SpringConfig::REVEAL),
            y: scalar(&[0.0, 0.7, 1.0], &[60.0, 20.0, 0.0]),
            opacity: scalar(&[0.0, 0.5, 0.8, 1.0], &[0.0, 0.3, 0.7, 1.0]),
            divider: scalar(&[0.3, 0.8], &[0.0, 1.0]),
            links,
            copyright: scalar(&[0.6, 0.9], &[0.0, 1.0]),
        }
    }
}

impl FooterReveal {
    pub fn set_progress(&mut self, progress: f64) {
        self.spring.set_target(progress.clamp(0.0, 1.0));
    }

    /// Returns `true` while the reveal is still moving.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.spring.tick(dt)
    }

    #[cfg(test)]
    pub fn progress(&self) -> f64 {
        self.spring.value()
    }

    pub fn visual(&self) -> FooterVisual {
        let p = self.spring.value();
        FooterVisual {
            y: self.y.sample(p),
            opacity: self.opacity.sample(p),
            divider: self.divider.sample(p),
            links: self.links.iter().map(|c| c.sample(p)).collect(),
            copyright: self.copyright.sample(p),
        }
    }
}
