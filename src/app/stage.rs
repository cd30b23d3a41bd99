//! Per-frame animation state for the showcase and helix views.
//!
//! The document is measured in terminal rows.  Scroll input moves a
//! [`SmoothScroll`] target; each tick the rendered position feeds every
//! [`ScrollTracker`], and the trackers feed the card presence springs, the
//! hero curves and the footer reveal.

use std::f64::consts::TAU;

use crate::core::helix::{HelixConfig, HelixLayout, ViewportClass};
use crate::core::presence::{is_interactive, CardPhase, CardPresence, PresenceCurves};
use crate::core::scroll::{Region, ScrollOffsets, ScrollTracker};
use crate::core::sections::{FooterReveal, HeroCurves, HeroVisual};
use crate::core::smooth_scroll::SmoothScroll;

/// Rows between the hero and the first card.
pub const HEADING_ROWS: f64 = 6.0;
/// Rows between consecutive cards.
pub const CARD_GAP_ROWS: f64 = 3.0;
pub const FOOTER_ROWS: f64 = 9.0;
/// Helix document rows per item, in viewport heights.
const HELIX_ROWS_PER_ITEM: f64 = 0.5;
/// Idle helix spin, radians per second.
const IDLE_SPIN_SPEED: f64 = 0.15;

/// Document geometry of the showcase for one viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShowcaseGeometry {
    pub viewport_rows: f64,
    pub card_rows: f64,
    pub heading_top: f64,
    pub cards_top: f64,
    pub footer_top: f64,
    pub doc_height: f64,
}

impl ShowcaseGeometry {
    pub fn compute(viewport_rows: f64, count: usize) -> Self {
        let vh = viewport_rows.max(1.0);
        let card_rows = (vh * 0.55).round().clamp(8.0, 24.0);
        let heading_top = vh;
        let cards_top = heading_top + HEADING_ROWS;
        let cards_end = cards_top + count as f64 * (card_rows + CARD_GAP_ROWS);
        let footer_top = cards_end + 2.0;
        Self {
            viewport_rows: vh,
            card_rows,
            heading_top,
            cards_top,
            footer_top,
            doc_height: footer_top + FOOTER_ROWS,
        }
    }

    pub fn hero(&self) -> Region {
        Region::new(0.0, self.viewport_rows)
    }

    pub fn card(&self, index: usize) -> Region {
        Region::new(
            self.cards_top + index as f64 * (self.card_rows + CARD_GAP_ROWS),
            self.card_rows,
        )
    }

    pub fn collection(&self) -> Region {
        Region::new(self.heading_top, self.footer_top - self.heading_top)
    }

    pub fn footer(&self) -> Region {
        Region::new(self.footer_top, FOOTER_ROWS)
    }

    pub fn max_scroll(&self) -> f64 {
        (self.doc_height - self.viewport_rows).max(0.0)
    }
}

// ───────────────────────────────────────── showcase ──────────

pub struct CardSlot {
    pub tracker: ScrollTracker,
    pub presence: CardPresence,
}

/// Hero, card collection and footer.
pub struct ShowcaseStage {
    pub scroll: SmoothScroll,
    class: ViewportClass,
    geometry: ShowcaseGeometry,
    hero_tracker: ScrollTracker,
    hero_curves: HeroCurves,
    collection_tracker: ScrollTracker,
    cards: Vec<CardSlot>,
    footer_tracker: ScrollTracker,
    footer: FooterReveal,
}

impl ShowcaseStage {
    pub fn new(count: usize, viewport_rows: f64, class: ViewportClass, lerp: f64) -> Self {
        let geometry = ShowcaseGeometry::compute(viewport_rows, count);
        let mut stage = Self {
            scroll: SmoothScroll::new(lerp),
            class,
            geometry,
            hero_tracker: ScrollTracker::new(geometry.hero(), ScrollOffsets::PINNED_TO_EXIT),
            hero_curves: HeroCurves::default(),
            collection_tracker: ScrollTracker::new(
                geometry.collection(),
                ScrollOffsets::ENTER_TO_EXIT,
            ),
            cards: Vec::new(),
            footer_tracker: ScrollTracker::new(geometry.footer(), ScrollOffsets::ENTER_TO_SETTLE),
            footer: FooterReveal::default(),
        };
        stage.set_count(count);
        stage
    }

    /// Rebuild card slots for a new item count.  Springs of surviving
    /// cards keep their state.
    pub fn set_count(&mut self, count: usize) {
        self.cards.truncate(count);
        let curves = PresenceCurves::for_class(self.class);
        while self.cards.len() < count {
            let index = self.cards.len();
            let mut tracker =
                ScrollTracker::new(self.geometry.card(index), ScrollOffsets::ENTER_TO_EXIT);
            let progress = tracker.update(self.scroll.position(), self.geometry.viewport_rows);
            self.cards.push(CardSlot {
                tracker,
                presence: CardPresence::new(index, curves.clone(), progress),
            });
        }
        self.relayout(self.geometry.viewport_rows);
    }

    /// Viewport height changed, or the card count did.
    pub fn relayout(&mut self, viewport_rows: f64) {
        self.geometry = ShowcaseGeometry::compute(viewport_rows, self.cards.len());
        self.hero_tracker.set_region(self.geometry.hero());
        self.collection_tracker.set_region(self.geometry.collection());
        self.footer_tracker.set_region(self.geometry.footer());
        for (i, slot) in self.cards.iter_mut().enumerate() {
            slot.tracker.set_region(self.geometry.card(i));
        }
        self.scroll.set_max(self.geometry.max_scroll());
    }

    pub fn set_class(&mut self, class: ViewportClass) {
        if class == self.class {
            return;
        }
        tracing::debug!(class = class.label(), "viewport class changed");
        self.class = class;
        let curves = PresenceCurves::for_class(class);
        for slot in &mut self.cards {
            slot.presence.set_curves(curves.clone());
        }
    }

    /// Advance one frame.  Returns `true` while anything still moves.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.scroll.tick(dt);
        let scroll = self.scroll.position();
        let vh = self.geometry.viewport_rows;

        self.hero_tracker.update(scroll, vh);
        let rotation = self.collection_tracker.update(scroll, vh) * TAU;

        let mut moving = self.scroll.is_animating();
        for slot in &mut self.cards {
            let progress = slot.tracker.update(scroll, vh);
            slot.presence.set_progress(progress);
            slot.presence.set_rotation_progress(rotation);
            moving |= slot.presence.tick(dt);
        }

        self.footer.set_progress(self.footer_tracker.update(scroll, vh));
        moving |= self.footer.tick(dt);
        moving
    }

    pub fn geometry(&self) -> &ShowcaseGeometry {
        &self.geometry
    }

    pub fn class(&self) -> ViewportClass {
        self.class
    }

    pub fn cards(&self) -> &[CardSlot] {
        &self.cards
    }

    pub fn hero(&self) -> HeroVisual {
        self.hero_curves.sample(self.hero_tracker.progress())
    }

    pub fn footer(&self) -> &FooterReveal {
        &self.footer
    }

    /// Hover exactly one card (or none).
    pub fn set_hovered(&mut self, index: Option<usize>) {
        for (i, slot) in self.cards.iter_mut().enumerate() {
            slot.presence.set_hovered(Some(i) == index);
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.cards.iter().position(|s| s.presence.is_hovered())
    }

    /// The card currently in focus, if any.
    pub fn focused(&self) -> Option<usize> {
        let curves = PresenceCurves::for_class(self.class);
        self.cards
            .iter()
            .position(|s| CardPhase::at(s.tracker.progress(), &curves) == CardPhase::Focused)
    }

    /// Scroll so card `index` sits in the middle of the viewport.
    pub fn scroll_to_card(&mut self, index: usize) {
        let region = self.geometry.card(index);
        let target = region.top + region.height / 2.0 - self.geometry.viewport_rows / 2.0;
        self.scroll.scroll_to(target);
    }
}

// ───────────────────────────────────────── helix ─────────────

/// Helix view: layout, its own scroll document and the idle spin.
pub struct HelixStage {
    pub scroll: SmoothScroll,
    config: HelixConfig,
    layout: HelixLayout,
    tracker: ScrollTracker,
    viewport_rows: f64,
    spin: f64,
    /// Cleared when the view is left; the spin loop stops advancing.
    mounted: bool,
    hovered: Option<usize>,
}

impl HelixStage {
    pub fn new(
        count: usize,
        viewport_rows: f64,
        class: ViewportClass,
        config: HelixConfig,
        lerp: f64,
    ) -> Self {
        let layout = HelixLayout::compute(count, class, &config);
        let mut stage = Self {
            scroll: SmoothScroll::new(lerp),
            config,
            layout,
            tracker: ScrollTracker::new(Region::default(), ScrollOffsets::PINNED_TO_EXIT),
            viewport_rows,
            spin: 0.0,
            mounted: false,
            hovered: None,
        };
        stage.relayout(viewport_rows);
        stage
    }

    fn doc_rows(&self) -> f64 {
        let vh = self.viewport_rows.max(1.0);
        vh * (2.0 + self.layout.placements().len() as f64 * HELIX_ROWS_PER_ITEM)
    }

    pub fn relayout(&mut self, viewport_rows: f64) {
        self.viewport_rows = viewport_rows;
        let rows = self.doc_rows();
        self.tracker.set_region(Region::new(0.0, rows));
        // Progress reaches 1 when the region's bottom hits the viewport top.
        self.scroll.set_max(rows);
    }

    /// Recompute placements only when the item set or class changed.
    pub fn ensure_layout(&mut self, count: usize, class: ViewportClass) {
        if self.layout.is_stale(count, class) {
            tracing::debug!(count, class = class.label(), "helix layout recomputed");
            self.layout = HelixLayout::compute(count, class, &self.config);
            self.hovered = None;
            self.relayout(self.viewport_rows);
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.hovered = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.mounted {
            return false;
        }
        self.scroll.tick(dt);
        self.tracker.update(self.scroll.position(), self.viewport_rows);
        if dt.is_finite() && dt > 0.0 {
            self.spin = (self.spin + dt * IDLE_SPIN_SPEED) % TAU;
        }
        self.drop_faded_hover();
        true
    }

    /// Hover only survives while the hovered item stays interactive.
    fn drop_faded_hover(&mut self) {
        let Some(index) = self.hovered else {
            return;
        };
        let camera = self.layout.camera();
        let still_interactive = self
            .layout
            .frame(self.progress(), self.spin)
            .iter()
            .any(|v| v.index == index && v.is_visible(camera) && is_interactive(v.opacity));
        if !still_interactive {
            tracing::debug!(index, "helix hover dropped, item faded");
            self.hovered = None;
        }
    }

    pub fn progress(&self) -> f64 {
        self.tracker.progress()
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn layout(&self) -> &HelixLayout {
        &self.layout
    }

    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn run(stage: &mut ShowcaseStage, frames: usize) {
        for _ in 0..frames {
            stage.tick(DT);
        }
    }

    #[test]
    fn geometry_stacks_sections() {
        let g = ShowcaseGeometry::compute(40.0, 3);
        assert_eq!(g.card_rows, 22.0);
        assert_eq!(g.cards_top, 46.0);
        assert_eq!(g.card(1).top, 46.0 + 25.0);
        assert_eq!(g.footer_top, 46.0 + 75.0 + 2.0);
        assert_eq!(g.max_scroll(), g.doc_height - 40.0);
    }

    #[test]
    fn scrolling_brings_a_card_into_focus() {
        let mut stage = ShowcaseStage::new(4, 40.0, ViewportClass::Desktop, 0.1);
        run(&mut stage, 5);
        assert_eq!(stage.focused(), None);
        assert!(!stage.cards()[0].presence.visual().interactive);

        stage.scroll_to_card(1);
        run(&mut stage, 600);
        assert_eq!(stage.focused(), Some(1));
        let v = stage.cards()[1].presence.visual();
        assert!((v.opacity - 1.0).abs() < 1e-3);
        assert!(v.interactive);
    }

    #[test]
    fn hero_fades_as_it_scrolls_away() {
        let mut stage = ShowcaseStage::new(2, 30.0, ViewportClass::Desktop, 1.0);
        assert_eq!(stage.hero().title_opacity, 1.0);
        stage.scroll.scroll_to(30.0);
        run(&mut stage, 2);
        assert_eq!(stage.hero().title_opacity, 0.0);
    }

    #[test]
    fn only_visible_cards_take_hover() {
        let mut stage = ShowcaseStage::new(3, 40.0, ViewportClass::Desktop, 1.0);
        stage.scroll_to_card(0);
        run(&mut stage, 600);
        stage.set_hovered(Some(0));
        assert_eq!(stage.hovered(), Some(0));
        stage.set_hovered(Some(2));
        assert_eq!(stage.hovered(), None);
    }

    #[test]
    fn footer_reveals_at_the_bottom() {
        let mut stage = ShowcaseStage::new(2, 30.0, ViewportClass::Mobile, 1.0);
        assert_eq!(stage.footer().visual().opacity, 0.0);
        let bottom = stage.geometry().max_scroll();
        stage.scroll.scroll_to(bottom);
        run(&mut stage, 1200);
        assert!((stage.footer().progress() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn helix_spin_stops_when_unmounted() {
        let mut helix = HelixStage::new(8, 40.0, ViewportClass::Desktop, HelixConfig::default(), 0.1);
        assert!(!helix.tick(DT));
        assert_eq!(helix.spin(), 0.0);

        helix.mount();
        assert!(helix.tick(DT));
        let spun = helix.spin();
        assert!(spun > 0.0);

        helix.unmount();
        helix.tick(DT);
        assert_eq!(helix.spin(), spun);
    }

    #[test]
    fn helix_hover_clears_when_the_item_fades() {
        let mut helix = HelixStage::new(8, 40.0, ViewportClass::Desktop, HelixConfig::default(), 1.0);
        helix.mount();
        helix.set_hovered(Some(0));
        helix.tick(DT);
        assert_eq!(helix.hovered(), Some(0));

        helix.scroll.scroll_to(helix.scroll.max());
        for _ in 0..600 {
            helix.tick(DT);
        }
        assert_eq!(helix.hovered(), None);
    }

    #[test]
    fn helix_layout_is_reused_until_stale() {
        let mut helix = HelixStage::new(8, 40.0, ViewportClass::Desktop, HelixConfig::default(), 0.1);
        let before = helix.layout().placements().to_vec();
        helix.ensure_layout(8, ViewportClass::Desktop);
        assert_eq!(helix.layout().placements(), &before[..]);
        helix.ensure_layout(8, ViewportClass::Mobile);
        assert_eq!(helix.layout().class(), ViewportClass::Mobile);
        helix.ensure_layout(5, ViewportClass::Mobile);
        assert_eq!(helix.layout().placements().len(), 5);
    }

    #[test]
    fn helix_progress_follows_scroll() {
        let mut helix = HelixStage::new(4, 20.0, ViewportClass::Desktop, HelixConfig::default(), 1.0);
        helix.mount();
        helix.scroll.scroll_to(f64::MAX);
        helix.tick(DT);
        assert_eq!(helix.progress(), 1.0);
    }
}
