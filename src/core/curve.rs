//! Piecewise-linear curves: map a progress value through ordered
//! breakpoints to an interpolated output.
//!
//! A [`Curve`] is immutable once built and sampling is pure, so the same
//! curve can be shared by every card and sampled every frame.

use thiserror::Error;

// ───────────────────────────────────────── interpolation ─────

/// Values that can be linearly interpolated component-wise.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl<const N: usize> Lerp for [f64; N] {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut out = *self;
        for (o, (a, b)) in out.iter_mut().zip(self.iter().zip(other.iter())) {
            *o = a + (b - a) * t;
        }
        out
    }
}

/// An RGB colour with `f64` channels in `0.0..=255.0`.
///
/// Channels are interpolated independently in sRGB, the space the palette
/// values are written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, clamping to the valid range.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            r: (self.r * factor).clamp(0.0, 255.0),
            g: (self.g * factor).clamp(0.0, 255.0),
            b: (self.b * factor).clamp(0.0, 255.0),
        }
    }

    /// Round to 8-bit channels.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

impl Lerp for Rgb {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            r: self.r.lerp(&other.r, t),
            g: self.g.lerp(&other.g, t),
            b: self.b.lerp(&other.b, t),
        }
    }
}

// ───────────────────────────────────────── curve ─────────────

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("a curve needs at least 2 breakpoints, got {0}")]
    TooFewPoints(usize),
    #[error("breakpoint {index} is not strictly after the previous one ({prev} >= {next})")]
    NotIncreasing { index: usize, prev: f64, next: f64 },
    #[error("breakpoint {0} has a non-finite progress value")]
    NonFinite(usize),
    #[error("{inputs} progress values but {outputs} outputs")]
    LengthMismatch { inputs: usize, outputs: usize },
}

/// Ordered `(progress, value)` breakpoints with strictly increasing progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve<T> {
    points: Vec<(f64, T)>,
}

impl<T: Lerp> Curve<T> {
    pub fn new(points: Vec<(f64, T)>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        for (i, (p, _)) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(CurveError::NonFinite(i));
            }
            if i > 0 && points[i - 1].0 >= *p {
                return Err(CurveError::NotIncreasing {
                    index: i,
                    prev: points[i - 1].0,
                    next: *p,
                });
            }
        }
        Ok(Self { points })
    }

    /// Build from parallel input/output slices.
    pub fn from_slices(inputs: &[f64], outputs: &[T]) -> Result<Self, CurveError> {
        if inputs.len() != outputs.len() {
            return Err(CurveError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        Self::new(
            inputs
                .iter()
                .copied()
                .zip(outputs.iter().cloned())
                .collect(),
        )
    }

    /// Sample the curve.  Outside the breakpoint range the boundary value is
    /// returned unchanged; a NaN progress samples as the first breakpoint.
    pub fn sample(&self, progress: f64) -> T {
        let first = &self.points[0];
        let last = &self.points[self.points.len() - 1];
        if progress.is_nan() || progress <= first.0 {
            return first.1.clone();
        }
        if progress >= last.0 {
            return last.1.clone();
        }

        // First breakpoint strictly after `progress`; guaranteed in 1..len.
        let hi = self.points.partition_point(|(p, _)| *p <= progress);
        let (p0, v0) = &self.points[hi - 1];
        let (p1, v1) = &self.points[hi];
        v0.lerp(v1, (progress - p0) / (p1 - p0))
    }
}

/// Curve from compile-time breakpoint tables.
///
/// Only for literal tables that are known to be valid; falls back to a flat
/// curve at `fallback` if they are not.
pub(crate) fn fixed<T: Lerp>(inputs: &[f64], outputs: &[T], fallback: T) -> Curve<T> {
    Curve::from_slices(inputs, outputs).unwrap_or_else(|_| Curve {
        points: vec![(0.0, fallback.clone()), (1.0, fallback)],
    })
}

/// Scalar shorthand for [`fixed`].
pub(crate) fn scalar(inputs: &[f64], outputs: &[f64]) -> Curve<f64> {
    fixed(inputs, outputs, outputs.first().copied().unwrap_or(0.0))
}
