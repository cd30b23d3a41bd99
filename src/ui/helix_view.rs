//! Helix view: perspective projection of the two-strand helix.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::app::stage::HelixStage;
use crate::app::state::AppState;
use crate::core::presence::{is_interactive, HOVER_BRIGHTNESS, HOVER_SHADOW, REST_SHADOW};

use super::card::{self, Caption, CardShape, Edge, Fill};
use super::centered_text;
use super::theme::{placeholder_curve, Theme};
use super::thumbnail::Tint;

/// Card size in world units.
const CARD_WORLD_W: f64 = 3.2;
const CARD_WORLD_H: f64 = 2.0;
/// Narrowest a card gets when seen edge-on, as a fraction of its width.
const MIN_FACING: f64 = 0.2;
const BACK_FACE_BRIGHTNESS: f64 = 0.55;

/// One projected helix item.
#[derive(Debug, Clone, Copy)]
pub struct HelixGeom {
    pub index: usize,
    pub shape: CardShape,
    pub opacity: f64,
    pub distance: f64,
    /// `false` when the card shows its back to the camera.
    pub front_facing: bool,
}

/// Projected items, far-to-near (paint order).
pub fn helix_geometry(stage: &HelixStage, area: Rect) -> Vec<HelixGeom> {
    let layout = stage.layout();
    let config = layout.config();
    let camera = layout.camera();
    // Focal length in rows; a column is half as tall as a row is wide.
    let focal = (f64::from(area.height) / 2.0) / (config.fov_y / 2.0).tan();
    let mid_x = f64::from(area.x) + f64::from(area.width) / 2.0;
    let mid_y = f64::from(area.y) + f64::from(area.height) / 2.0;

    layout
        .frame(stage.progress(), stage.spin())
        .into_iter()
        .filter_map(|item| {
            if !item.is_visible(camera) {
                return None;
            }
            let k = focal / item.depth(camera);
            let facing = item.yaw.cos();
            Some(HelixGeom {
                index: item.index,
                shape: CardShape {
                    cx: mid_x + item.world.x * k * 2.0,
                    cy: mid_y - item.world.y * k,
                    width: CARD_WORLD_W * k * 2.0 * facing.abs().max(MIN_FACING),
                    height: CARD_WORLD_H * k,
                    rotation: 0.0,
                },
                opacity: item.opacity,
                distance: item.distance,
                front_facing: facing >= 0.0,
            })
        })
        .collect()
}

/// Nearest sufficiently visible item under `(x, y)`.
pub fn hit_test(stage: &HelixStage, area: Rect, x: u16, y: u16) -> Option<usize> {
    if !area.contains((x, y).into()) {
        return None;
    }
    helix_geometry(stage, area)
        .iter()
        .rev()
        .filter(|g| is_interactive(g.opacity))
        .find(|g| g.shape.contains(x, y))
        .map(|g| g.index)
}

fn centre_on_screen(g: &HelixGeom, area: Rect) -> bool {
    g.shape.cy >= f64::from(area.top())
        && g.shape.cy < f64::from(area.bottom())
        && g.shape.cx >= f64::from(area.left())
        && g.shape.cx < f64::from(area.right())
}

/// The nearest visible item whose centre is on screen.
pub fn front_item(stage: &HelixStage, area: Rect) -> Option<usize> {
    helix_geometry(stage, area)
        .iter()
        .rev()
        .filter(|g| is_interactive(g.opacity))
        .find(|g| centre_on_screen(g, area))
        .map(|g| g.index)
}

/// Whether item `index` can still be opened: drawn, opaque enough and on
/// screen this frame.
pub fn is_selectable(stage: &HelixStage, area: Rect, index: usize) -> bool {
    helix_geometry(stage, area)
        .iter()
        .any(|g| g.index == index && is_interactive(g.opacity) && centre_on_screen(g, area))
}

pub struct HelixView<'a> {
    pub state: &'a AppState,
}

impl Widget for HelixView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stage = &self.state.helix;
        if self.state.projects.is_empty() {
            centered_text(
                buf,
                area,
                f64::from(area.y) + f64::from(area.height) / 2.0,
                "No projects yet. Run `folio seed` to add the demo collection.",
                Theme::muted_style(1.0),
            );
            return;
        }

        let placeholder = placeholder_curve();
        let hovered = stage.hovered();
        for geom in helix_geometry(stage, area) {
            let Some(project) = self.state.projects.get(geom.index) else {
                continue;
            };
            let is_hovered = hovered == Some(geom.index);
            let tint = Tint {
                opacity: geom.opacity,
                overlay: 0.0,
                brightness: match (geom.front_facing, is_hovered) {
                    (false, _) => BACK_FACE_BRIGHTNESS,
                    (true, true) => HOVER_BRIGHTNESS,
                    (true, false) => 1.0,
                },
            };
            let fill = match self.state.thumbnail(&project.thumbnail) {
                Some(img) => Fill::Image(img),
                None => Fill::Placeholder(&placeholder),
            };
            let caption = geom.front_facing.then(|| Caption {
                title: &project.title,
                meta: project.year.clone(),
                emphasis: is_hovered,
            });
            let edge = Edge {
                outline: if is_hovered { 1.0 } else { 0.0 },
                shadow: if is_hovered { HOVER_SHADOW } else { REST_SHADOW },
            };
            card::paint(buf, area, &geom.shape, &fill, tint, edge, caption.as_ref());
        }

        let progress = format!("{:>3.0}%", stage.progress() * 100.0);
        centered_text(buf, area, f64::from(area.y), &progress, Theme::muted_style(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::helix::{HelixConfig, ViewportClass};

    fn stage(count: usize) -> HelixStage {
        let mut s = HelixStage::new(count, 40.0, ViewportClass::Desktop, HelixConfig::default(), 1.0);
        s.mount();
        s.tick(0.0);
        s
    }

    #[test]
    fn geometry_runs_far_to_near() {
        let s = stage(8);
        let items = helix_geometry(&s, Rect::new(0, 0, 160, 40));
        assert!(!items.is_empty());
        for pair in items.windows(2) {
            assert!(pair[0].distance >= pair[1].distance);
        }
    }

    #[test]
    fn nearer_cards_are_drawn_larger() {
        let s = stage(8);
        let items = helix_geometry(&s, Rect::new(0, 0, 160, 40));
        let far = items.first().unwrap();
        let near = items.last().unwrap();
        assert!(near.shape.height >= far.shape.height);
    }

    #[test]
    fn first_item_starts_in_front_at_the_centre_row() {
        let s = stage(8);
        let area = Rect::new(0, 0, 160, 40);
        let items = helix_geometry(&s, area);
        let first = items.iter().find(|g| g.index == 0).unwrap();
        assert!((first.shape.cy - 20.0).abs() < 1e-9);
        assert_eq!(front_item(&s, area), Some(0));
        let (x, y) = (first.shape.cx as u16, first.shape.cy as u16);
        assert_eq!(hit_test(&s, area, x, y), Some(0));
        assert!(is_selectable(&s, area, 0));
    }

    #[test]
    fn culled_items_are_not_selectable() {
        let mut s = stage(8);
        let area = Rect::new(0, 0, 160, 40);
        s.scroll.scroll_to(s.scroll.max());
        for _ in 0..600 {
            s.tick(1.0 / 60.0);
        }
        assert!(!is_selectable(&s, area, 0));
    }
}
