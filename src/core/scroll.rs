//! Scroll progress tracking for a region of the document.
//!
//! A [`ScrollTracker`] is owned by whatever tracks the region (a card, the
//! hero, the footer).  There is no shared global; each tracker is fed the
//! current scroll offset and viewport geometry and keeps its own progress.

/// A point on an axis expressed as a fraction of a length
/// (0.0 = start, 0.5 = center, 1.0 = end).
pub type Fraction = f64;

pub const START: Fraction = 0.0;
pub const END: Fraction = 1.0;

/// "Region edge meets viewport edge", e.g. `("start", "end")` means the
/// region's top reaches the viewport's bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub region: Fraction,
    pub viewport: Fraction,
}

impl Intersection {
    pub const fn new(region: Fraction, viewport: Fraction) -> Self {
        Self { region, viewport }
    }
}

/// Start/end intersections that bound a tracked range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOffsets {
    pub start: Intersection,
    pub end: Intersection,
}

impl ScrollOffsets {
    pub const fn new(start: Intersection, end: Intersection) -> Self {
        Self { start, end }
    }

    /// Region enters at the bottom of the viewport, leaves at the top.
    pub const ENTER_TO_EXIT: Self =
        Self::new(Intersection::new(START, END), Intersection::new(END, START));

    /// Region starts pinned at the top, ends when its bottom reaches the top.
    pub const PINNED_TO_EXIT: Self =
        Self::new(Intersection::new(START, START), Intersection::new(END, START));

    /// Region enters at the bottom, ends when its bottom reaches the bottom.
    pub const ENTER_TO_SETTLE: Self =
        Self::new(Intersection::new(START, END), Intersection::new(END, END));
}

/// A tracked region in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub top: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Progress for a region given a scroll offset and viewport height.
///
/// Zero-extent ranges (start == end) fall back to 0.0.
pub fn progress_for(region: Region, offsets: ScrollOffsets, scroll: f64, viewport: f64) -> f64 {
    let at = |i: Intersection| region.top + i.region * region.height - i.viewport * viewport;
    let start = at(offsets.start);
    let end = at(offsets.end);
    let extent = end - start;
    if !(extent.abs() > f64::EPSILON) || !scroll.is_finite() {
        return 0.0;
    }
    ((scroll - start) / extent).clamp(0.0, 1.0)
}

/// Per-region progress state, recomputed on every scroll or resize.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    region: Region,
    offsets: ScrollOffsets,
    progress: f64,
}

impl ScrollTracker {
    pub fn new(region: Region, offsets: ScrollOffsets) -> Self {
        Self {
            region,
            offsets,
            progress: 0.0,
        }
    }

    /// Layout changed (resize, item set changed).
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Recompute progress from the current scroll position.
    pub fn update(&mut self, scroll: f64, viewport: f64) -> f64 {
        self.progress = progress_for(self.region, self.offsets, scroll, viewport);
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}
