//! Per-card presence: turns scroll progress and hover into a visual state.
//!
//! Each [`CardPresence`] owns its springs.  The frame loop feeds it the
//! card's raw scroll progress and hover flag, calls [`CardPresence::tick`]
//! with the frame's `dt`, then reads [`CardPresence::visual`].
//!
//! Visibility-from-depth lives in [`super::helix::fog_opacity`];
//! interactivity-from-opacity is [`is_interactive`].  They compose but
//! neither knows about the other.

use super::curve::{scalar, Curve};
use super::helix::ViewportClass;
use super::spring::{Spring, SpringConfig};

/// Below this opacity a card stops receiving pointer input.
pub const INTERACTIVE_OPACITY: f64 = 0.3;

pub const HOVER_SCALE: f64 = 1.03;
pub const HOVER_BRIGHTNESS: f64 = 1.08;
/// Drop shadow strength at rest and while hovered.
pub const REST_SHADOW: f64 = 0.5;
pub const HOVER_SHADOW: f64 = 0.8;

/// Whether a card at `opacity` may be hovered or clicked.
pub fn is_interactive(opacity: f64) -> bool {
    opacity >= INTERACTIVE_OPACITY
}

/// Curves shared by every card of one viewport class.
#[derive(Debug, Clone)]
pub struct PresenceCurves {
    /// Horizontal offset for even indices; odd indices mirror it.
    pub x_even: Curve<f64>,
    pub x_odd: Curve<f64>,
    pub scale: Curve<f64>,
    pub opacity: Curve<f64>,
    pub overlay: Curve<f64>,
    /// Base parallax amplitude before the per-index multiplier.
    pub parallax: f64,
}

impl PresenceCurves {
    pub fn for_class(class: ViewportClass) -> Self {
        let edge = match class {
            ViewportClass::Mobile => 30.0,
            ViewportClass::Desktop => 80.0,
        };
        Self {
            x_even: scalar(&[0.0, 0.5, 1.0], &[-edge, 0.0, edge]),
            x_odd: scalar(&[0.0, 0.5, 1.0], &[edge, 0.0, -edge]),
            scale: scalar(&[0.0, 0.3, 0.5, 0.7, 1.0], &[0.92, 0.96, 1.0, 0.96, 0.92]),
            opacity: scalar(
                &[0.0, 0.15, 0.4, 0.6, 0.85, 1.0],
                &[0.2, 0.5, 1.0, 1.0, 0.5, 0.2],
            ),
            overlay: scalar(&[0.0, 0.35, 0.5, 0.65, 1.0], &[0.6, 0.2, 0.0, 0.2, 0.6]),
            parallax: 40.0,
        }
    }
}

/// Conceptual phase of a card along its scroll range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CardPhase {
    Hidden,
    Entering,
    Focused,
    Exiting,
}

impl CardPhase {
    /// Classify a raw progress value.  Descriptive only: visuals are
    /// continuous functions of progress.
    pub fn at(progress: f64, curves: &PresenceCurves) -> Self {
        if !(progress > 0.0 && progress < 1.0) {
            return Self::Hidden;
        }
        if curves.opacity.sample(progress) >= 1.0 {
            Self::Focused
        } else if progress < 0.5 {
            Self::Entering
        } else {
            Self::Exiting
        }
    }
}

/// Everything needed to draw one card this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisualState {
    pub x: f64,
    pub y: f64,
    /// Scroll scale times hover scale.
    pub scale: f64,
    pub opacity: f64,
    /// Darkness overlay alpha.
    pub overlay: f64,
    pub brightness: f64,
    /// Hover ring strength, 0 at rest and 1 when fully hovered.
    pub outline: f64,
    /// Drop shadow strength, [`REST_SHADOW`] to [`HOVER_SHADOW`].
    pub shadow: f64,
    /// Rotation in radians.
    pub rotation: f64,
    pub z_order: i32,
    pub hovered: bool,
    pub interactive: bool,
}

#[derive(Debug, Clone)]
pub struct CardPresence {
    index: usize,
    curves: PresenceCurves,
    position: Spring,
    opacity: Spring,
    hover_scale: Spring,
    hover_brightness: Spring,
    hovered: bool,
    rotation_progress: f64,
}

impl CardPresence {
    /// A card at rest at `progress`, as on first mount.
    pub fn new(index: usize, curves: PresenceCurves, progress: f64) -> Self {
        Self {
            index,
            curves,
            position: Spring::new(progress, SpringConfig::POSITION),
            opacity: Spring::new(progress, SpringConfig::OPACITY),
            hover_scale: Spring::new(1.0, SpringConfig::HOVER),
            hover_brightness: Spring::new(1.0, SpringConfig::HOVER),
            hovered: false,
            rotation_progress: 0.0,
        }
    }

    /// Swap curves after a viewport-class change, keeping spring state.
    pub fn set_curves(&mut self, curves: PresenceCurves) {
        self.curves = curves;
    }

    pub fn set_progress(&mut self, progress: f64) {
        let p = progress.clamp(0.0, 1.0);
        self.position.set_target(p);
        self.opacity.set_target(p);
    }

    /// Parent rotation progress (radians) shared across cards.
    pub fn set_rotation_progress(&mut self, rotation: f64) {
        self.rotation_progress = rotation;
    }

    /// Update hover.  Requests while the card is not interactive are
    /// treated as "not hovered".
    pub fn set_hovered(&mut self, hovered: bool) {
        let hovered = hovered && is_interactive(self.current_opacity());
        self.hovered = hovered;
        let (scale, brightness) = if hovered {
            (HOVER_SCALE, HOVER_BRIGHTNESS)
        } else {
            (1.0, 1.0)
        };
        self.hover_scale.set_target(scale);
        self.hover_brightness.set_target(brightness);
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Advance every spring.  Returns `true` while anything still moves.
    pub fn tick(&mut self, dt: f64) -> bool {
        let a = self.position.tick(dt);
        let b = self.opacity.tick(dt);
        let c = self.hover_scale.tick(dt);
        let d = self.hover_brightness.tick(dt);
        // Fading out under the pointer drops hover.
        if self.hovered && !is_interactive(self.current_opacity()) {
            self.set_hovered(false);
        }
        a || b || c || d
    }

    fn current_opacity(&self) -> f64 {
        self.curves.opacity.sample(self.opacity.value())
    }

    pub fn visual(&self) -> CardVisualState {
        let pos = self.position.value();
        let op = self.opacity.value();

        let x = if self.index % 2 == 0 {
            self.curves.x_even.sample(pos)
        } else {
            self.curves.x_odd.sample(pos)
        };
        let parallax = self.curves.parallax * (1.0 + (self.index % 3) as f64 * 0.08);
        let y = parallax + (-parallax - parallax) * pos.clamp(0.0, 1.0);

        let scale = self.curves.scale.sample(op) * self.hover_scale.value();
        // Ring and shadow ride the hover scale spring.
        let lift = ((self.hover_scale.value() - 1.0) / (HOVER_SCALE - 1.0)).clamp(0.0, 1.0);
        let opacity = self.curves.opacity.sample(op);
        let rotation = self.rotation_progress * 0.02 * ((self.index % 3) as f64 - 1.0);

        let z_order = if self.hovered {
            i32::MAX
        } else {
            (scale * 1000.0).round() as i32
        };

        CardVisualState {
            x,
            y,
            scale,
            opacity,
            overlay: self.curves.overlay.sample(op),
            brightness: self.hover_brightness.value(),
            outline: lift,
            shadow: REST_SHADOW + (HOVER_SHADOW - REST_SHADOW) * lift,
            rotation,
            z_order,
            hovered: self.hovered,
            interactive: is_interactive(opacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn settle(card: &mut CardPresence) {
        for _ in 0..2000 {
            if !card.tick(DT) {
                break;
            }
        }
    }

    fn card_at(index: usize, progress: f64) -> CardPresence {
        CardPresence::new(index, PresenceCurves::for_class(ViewportClass::Desktop), progress)
    }

    #[test]
    fn centered_card_is_fully_focused() {
        let v = card_at(0, 0.5).visual();
        assert_eq!(v.opacity, 1.0);
        assert_eq!(v.scale, 1.0);
        assert_eq!(v.overlay, 0.0);
        assert_eq!(v.x, 0.0);
        assert!(v.interactive);
    }

    #[test]
    fn horizontal_offset_alternates_by_parity() {
        let even = card_at(0, 0.0).visual();
        let odd = card_at(1, 0.0).visual();
        assert_eq!(even.x, -80.0);
        assert_eq!(odd.x, 80.0);

        let mobile = CardPresence::new(0, PresenceCurves::for_class(ViewportClass::Mobile), 1.0);
        assert_eq!(mobile.visual().x, 30.0);
    }

    #[test]
    fn parallax_magnitude_varies_with_index() {
        let a = card_at(0, 0.0).visual().y;
        let b = card_at(1, 0.0).visual().y;
        let c = card_at(2, 0.0).visual().y;
        assert!((a - 40.0).abs() < 1e-9);
        assert!((b - 43.2).abs() < 1e-9);
        assert!((c - 46.4).abs() < 1e-9);
        assert!((card_at(2, 1.0).visual().y + 46.4).abs() < 1e-9);
    }

    #[test]
    fn overlay_is_inverse_of_opacity() {
        for p in [0.0, 0.2, 0.35, 0.5, 0.65, 0.9, 1.0] {
            let v = card_at(0, p).visual();
            let w = card_at(0, (p + 0.05).min(0.5)).visual();
            if w.opacity > v.opacity {
                assert!(w.overlay <= v.overlay, "p={p}");
            }
        }
    }

    #[test]
    fn scroll_springs_converge_to_progress() {
        let mut card = card_at(0, 0.0);
        card.set_progress(0.5);
        card.tick(DT);
        assert!(card.visual().opacity < 1.0, "should not jump to target");
        settle(&mut card);
        let v = card.visual();
        assert!((v.opacity - 1.0).abs() < 1e-2);
        assert!(v.x.abs() < 0.5);
    }

    #[test]
    fn hover_is_faster_than_scroll() {
        let mut card = card_at(0, 0.5);
        card.set_hovered(true);
        card.set_progress(0.0);
        for _ in 0..30 {
            card.tick(DT);
        }
        let hover_progress = (card.hover_scale.value() - 1.0) / (HOVER_SCALE - 1.0);
        let scroll_progress = (0.5 - card.position.value()) / 0.5;
        assert!(hover_progress > scroll_progress);
    }

    #[test]
    fn hover_scales_and_brightens_and_raises() {
        let mut card = card_at(3, 0.5);
        card.set_hovered(true);
        settle(&mut card);
        let v = card.visual();
        assert!(v.hovered);
        assert!((v.scale - HOVER_SCALE).abs() < 1e-3);
        assert!((v.brightness - HOVER_BRIGHTNESS).abs() < 1e-3);
        assert_eq!(v.z_order, i32::MAX);
        assert!((v.outline - 1.0).abs() < 1e-3);
        assert!((v.shadow - HOVER_SHADOW).abs() < 1e-3);

        card.set_hovered(false);
        settle(&mut card);
        let v = card.visual();
        assert_eq!(v.outline, 0.0);
        assert_eq!(v.shadow, REST_SHADOW);
    }

    #[test]
    fn faint_cards_ignore_hover() {
        let mut card = card_at(0, 0.0);
        assert!(!card.visual().interactive);
        card.set_hovered(true);
        assert!(!card.is_hovered());
    }

    #[test]
    fn hover_drops_when_card_fades_out() {
        let mut card = card_at(0, 0.5);
        card.set_hovered(true);
        card.set_progress(1.0);
        settle(&mut card);
        assert!(!card.is_hovered());
        assert!(!card.visual().interactive);
    }

    #[test]
    fn interactivity_threshold() {
        assert!(!is_interactive(0.29));
        assert!(is_interactive(0.3));
        assert!(is_interactive(1.0));
    }

    #[test]
    fn rotation_follows_parent_with_index_sign() {
        let mut a = card_at(0, 0.5);
        let mut b = card_at(1, 0.5);
        let mut c = card_at(2, 0.5);
        for card in [&mut a, &mut b, &mut c] {
            card.set_rotation_progress(10.0);
        }
        assert!((a.visual().rotation + 0.2).abs() < 1e-12);
        assert_eq!(b.visual().rotation, 0.0);
        assert!((c.visual().rotation - 0.2).abs() < 1e-12);
    }

    #[test]
    fn phases_follow_scroll_order() {
        let curves = PresenceCurves::for_class(ViewportClass::Desktop);
        let mut seen: Vec<CardPhase> = Vec::new();
        for i in 0..=200 {
            let phase = CardPhase::at(i as f64 / 200.0, &curves);
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
        }
        assert_eq!(
            seen,
            vec![
                CardPhase::Hidden,
                CardPhase::Entering,
                CardPhase::Focused,
                CardPhase::Exiting,
                CardPhase::Hidden,
            ]
        );
    }

    #[test]
    fn focus_peaks_in_the_middle() {
        let opacity = |p: f64| card_at(0, p).visual().opacity;
        let scale = |p: f64| card_at(0, p).visual().scale;
        assert!(opacity(0.1) < opacity(0.3));
        assert!(opacity(0.3) < opacity(0.5));
        assert!(opacity(0.7) > opacity(0.9));
        assert!(scale(0.2) < scale(0.5) && scale(0.8) < scale(0.5));
    }
}
