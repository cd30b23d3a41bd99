//! Frame-rate independent smooth scrolling.
//!
//! Input moves the target; the rendered position chases it with an
//! exponential ease-out.  Scroll trackers read the rendered position, so
//! everything driven by scroll progress eases along with it.

/// Fraction of the remaining distance covered per 60 Hz frame.
pub const DEFAULT_LERP: f64 = 0.1;

/// Distance below which the position snaps onto the target.
const SNAP: f64 = 0.05;

/// Scroll position animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    position: f64,
    target: f64,
    max: f64,
    lerp: f64,
}

impl SmoothScroll {
    pub fn new(lerp: f64) -> Self {
        let lerp = if lerp.is_finite() { lerp } else { DEFAULT_LERP };
        Self {
            position: 0.0,
            target: 0.0,
            max: 0.0,
            lerp: lerp.clamp(0.02, 1.0),
        }
    }

    /// Upper bound for the scroll position; re-clamps both values.
    pub fn set_max(&mut self, max: f64) {
        self.max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        self.target = self.target.clamp(0.0, self.max);
        self.position = self.position.clamp(0.0, self.max);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        if delta.is_finite() {
            self.target = (self.target + delta).clamp(0.0, self.max);
        }
    }

    pub fn scroll_to(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target.clamp(0.0, self.max);
        }
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let t = 1.0 - (1.0 - self.lerp).powf(dt * 60.0);
        self.position += (self.target - self.position) * t;
        if (self.target - self.position).abs() < SNAP {
            self.position = self.target;
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(DEFAULT_LERP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_covers_the_lerp_fraction() {
        let mut s = SmoothScroll::new(0.1);
        s.set_max(100.0);
        s.scroll_by(10.0);
        s.tick(1.0 / 60.0);
        assert!((s.position() - 1.0).abs() < 1e-9);
        assert!(s.is_animating());
    }

    #[test]
    fn frame_rate_does_not_change_the_curve() {
        let mut fast = SmoothScroll::new(0.1);
        let mut slow = SmoothScroll::new(0.1);
        for s in [&mut fast, &mut slow] {
            s.set_max(100.0);
            s.scroll_to(40.0);
        }
        for _ in 0..4 {
            fast.tick(1.0 / 60.0);
        }
        slow.tick(4.0 / 60.0);
        assert!((fast.position() - slow.position()).abs() < 1e-9);
    }

    #[test]
    fn settles_and_snaps() {
        let mut s = SmoothScroll::default();
        s.set_max(50.0);
        s.scroll_to(20.0);
        for _ in 0..200 {
            s.tick(1.0 / 60.0);
        }
        assert_eq!(s.position(), 20.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn target_is_clamped_to_range() {
        let mut s = SmoothScroll::default();
        s.set_max(10.0);
        s.scroll_by(-5.0);
        assert_eq!(s.target(), 0.0);
        s.scroll_by(25.0);
        assert_eq!(s.target(), 10.0);
        s.scroll_to(4.0);
        for _ in 0..200 {
            s.tick(1.0 / 60.0);
        }
        assert_eq!(s.position(), 4.0);
        s.set_max(2.0);
        assert_eq!(s.position(), 2.0);
        assert_eq!(s.target(), 2.0);
    }

    #[test]
    fn bad_input_is_ignored() {
        let mut s = SmoothScroll::default();
        s.set_max(10.0);
        s.scroll_by(f64::NAN);
        s.tick(f64::INFINITY);
        s.tick(-1.0);
        assert_eq!(s.position(), 0.0);
        assert_eq!(s.target(), 0.0);
    }
}
