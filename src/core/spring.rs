//! Damped spring used to smooth a driving value before it reaches a curve.
//!
//! Integration is semi-implicit Euler (velocity first, then position with
//! the new velocity), which stays bounded for every stiffness/damping pair
//! the presets use at 60 Hz.  Large frame gaps are split into sub-steps.

/// Longest single integration step; longer `dt`s are sub-stepped.
const MAX_STEP: f64 = 1.0 / 60.0;

/// Frame gaps beyond this are treated as a stall and clamped.
const MAX_DT: f64 = 0.25;

/// Stiffness / damping / rest threshold for a [`Spring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    /// Displacement *and* speed below which the spring snaps to rest.
    pub rest_delta: f64,
}

impl SpringConfig {
    pub const fn new(stiffness: f64, damping: f64, rest_delta: f64) -> Self {
        Self {
            stiffness,
            damping,
            rest_delta,
        }
    }

    /// Scroll-driven card position.
    pub const POSITION: Self = Self::new(50.0, 40.0, 0.001);
    /// Scroll-driven card opacity; slower than position.
    pub const OPACITY: Self = Self::new(30.0, 50.0, 0.001);
    /// Hover feedback, fast enough to feel immediate.
    pub const HOVER: Self = Self::new(300.0, 30.0, 0.001);
    /// Footer reveal.
    pub const REVEAL: Self = Self::new(40.0, 30.0, 0.001);
}

/// Spring state: current value, velocity and target.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    current: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
}

impl Spring {
    /// A spring at rest at `value`.
    pub fn new(value: f64, config: SpringConfig) -> Self {
        Self {
            current: value,
            velocity: 0.0,
            target: value,
            config,
        }
    }

    /// Change the target.  `current` and `velocity` are untouched, so a
    /// retarget mid-flight bends the trajectory without jumping.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump straight to `value` and stop.
    #[cfg(test)]
    pub fn snap_to(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds.  Returns `true` while still moving.
    pub fn tick(&mut self, dt: f64) -> bool {
        if !(dt > 0.0) {
            return !self.is_at_rest();
        }
        let mut remaining = dt.min(MAX_DT);
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP);
            self.step(step);
            remaining -= step;
        }

        if self.within_rest_delta() {
            self.current = self.target;
            self.velocity = 0.0;
            return false;
        }
        true
    }

    fn step(&mut self, dt: f64) {
        let SpringConfig {
            stiffness, damping, ..
        } = self.config;
        let acceleration = -stiffness * (self.current - self.target) - damping * self.velocity;
        self.velocity += acceleration * dt;
        self.current += self.velocity * dt;
    }

    fn within_rest_delta(&self) -> bool {
        let eps = self.config.rest_delta;
        (self.current - self.target).abs() < eps && self.velocity.abs() < eps
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.current == self.target && self.velocity == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn converges_and_snaps_to_target() {
        let mut s = Spring::new(0.0, SpringConfig::new(100.0, 30.0, 0.001));
        s.set_target(1.0);
        for _ in 0..200 {
            s.tick(DT);
        }
        assert!((s.value() - 1.0).abs() < 0.001);
        assert!(s.is_at_rest(), "spring should have snapped to rest");
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn stays_bounded_across_documented_ranges() {
        for stiffness in [30.0, 50.0, 100.0, 200.0, 300.0] {
            for damping in [25.0, 30.0, 40.0, 50.0] {
                let mut s = Spring::new(0.0, SpringConfig::new(stiffness, damping, 0.001));
                s.set_target(1.0);
                let mut peak: f64 = 0.0;
                for _ in 0..1200 {
                    s.tick(DT);
                    assert!(s.value().is_finite());
                    peak = peak.max(s.value());
                }
                assert!(peak < 1.5, "k={stiffness} c={damping} overshot to {peak}");
                assert!((s.value() - 1.0).abs() < 0.001, "k={stiffness} c={damping}");
            }
        }
    }

    #[test]
    fn retarget_mid_flight_does_not_jump() {
        let mut s = Spring::new(0.0, SpringConfig::POSITION);
        s.set_target(1.0);
        for _ in 0..10 {
            s.tick(DT);
        }
        let before = s.value();
        let velocity = s.velocity();
        s.set_target(-1.0);
        assert_eq!(s.value(), before);
        assert_eq!(s.velocity(), velocity);
        s.tick(DT);
        assert!((s.value() - before).abs() < 0.1);
    }

    #[test]
    fn variable_dt_is_substepped() {
        let mut a = Spring::new(0.0, SpringConfig::HOVER);
        let mut b = Spring::new(0.0, SpringConfig::HOVER);
        a.set_target(1.0);
        b.set_target(1.0);
        a.tick(4.0 * DT);
        for _ in 0..4 {
            b.tick(DT);
        }
        assert!((a.value() - b.value()).abs() < 1e-9);
    }

    #[test]
    fn zero_or_negative_dt_is_a_no_op() {
        let mut s = Spring::new(0.0, SpringConfig::OPACITY);
        s.set_target(1.0);
        s.tick(0.0);
        s.tick(-1.0);
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut s = Spring::new(0.5, SpringConfig::OPACITY);
        s.set_target(f64::NAN);
        assert_eq!(s.target(), 0.5);
        assert!(s.is_at_rest());
    }
}
