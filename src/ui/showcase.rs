//! Showcase view: hero, the scroll-animated card collection and the footer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::stage::ShowcaseStage;
use crate::app::state::AppState;
use crate::core::helix::ViewportClass;
use crate::core::presence::CardVisualState;
use crate::core::sections::FOOTER_LINKS;

use super::card::{self, Caption, CardShape, Edge, Fill};
use super::centered_text;
use super::theme::{
    fade, placeholder_curve, Theme, PX_PER_COL, PX_PER_ROW, ZINC_500, ZINC_800, ZINC_950,
};
use super::thumbnail::Tint;

pub const HERO_TITLE: [&str; 2] = ["DIGITAL", "MUSEUM"];
pub const HERO_SUBTITLE: &str = "A CURATED EXPERIENCE";
pub const COLLECTION_TITLE: &str = "Collection";
pub const COLLECTION_BLURB: &str =
    "A curated selection of works exploring form, shadow, and silence.";
pub const COPYRIGHT: &str = "© Digital Museum";

/// Where one card lands on screen this frame.
#[derive(Debug, Clone, Copy)]
pub struct CardGeom {
    pub index: usize,
    pub shape: CardShape,
    pub visual: CardVisualState,
}

fn card_width(cols: f64, class: ViewportClass) -> f64 {
    match class {
        ViewportClass::Mobile => (cols * 0.86).max(12.0),
        ViewportClass::Desktop => (cols * 0.55).clamp(24.0, 90.0),
    }
}

/// Card placements in paint order (lowest `z_order` first).
pub fn card_geometry(stage: &ShowcaseStage, area: Rect) -> Vec<CardGeom> {
    let geometry = stage.geometry();
    let scroll = stage.scroll.position();
    let base_width = card_width(f64::from(area.width), stage.class());
    let mid_x = f64::from(area.x) + f64::from(area.width) / 2.0;

    let mut cards: Vec<CardGeom> = stage
        .cards()
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let visual = slot.presence.visual();
            let region = geometry.card(index);
            let doc_mid = region.top + region.height / 2.0 - scroll;
            CardGeom {
                index,
                shape: CardShape {
                    cx: mid_x + visual.x / PX_PER_COL,
                    cy: f64::from(area.y) + doc_mid + visual.y / PX_PER_ROW,
                    width: base_width * visual.scale,
                    height: region.height * visual.scale,
                    rotation: visual.rotation,
                },
                visual,
            }
        })
        .collect();
    cards.sort_by_key(|c| c.visual.z_order);
    cards
}

/// Top-most interactive card under `(x, y)`.
pub fn hit_test(stage: &ShowcaseStage, area: Rect, x: u16, y: u16) -> Option<usize> {
    if !area.contains((x, y).into()) {
        return None;
    }
    card_geometry(stage, area)
        .iter()
        .rev()
        .filter(|c| c.visual.interactive)
        .find(|c| c.shape.contains(x, y))
        .map(|c| c.index)
}

pub struct ShowcaseView<'a> {
    pub state: &'a AppState,
}

impl Widget for ShowcaseView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stage = &self.state.showcase;
        let scroll = stage.scroll.position();
        let top = f64::from(area.y) - scroll;

        render_hero(stage, area, top, buf);

        let geometry = stage.geometry();
        let heading = top + geometry.heading_top + 1.0;
        centered_text(buf, area, heading, COLLECTION_TITLE, Theme::title_style());
        centered_text(buf, area, heading + 2.0, COLLECTION_BLURB, Theme::muted_style(1.0));

        if self.state.projects.is_empty() {
            centered_text(
                buf,
                area,
                top + geometry.cards_top + 1.0,
                "No projects yet. Run `folio seed` to add the demo collection.",
                Theme::muted_style(1.0),
            );
        }

        let placeholder = placeholder_curve();
        for geom in card_geometry(stage, area) {
            let Some(project) = self.state.projects.get(geom.index) else {
                continue;
            };
            let v = geom.visual;
            let tint = Tint {
                opacity: v.opacity,
                overlay: v.overlay,
                brightness: v.brightness,
            };
            let fill = match self.state.thumbnail(&project.thumbnail) {
                Some(img) => Fill::Image(img),
                None => Fill::Placeholder(&placeholder),
            };
            let caption = Caption {
                title: &project.title,
                meta: format!("{} · {}", project.category, project.year),
                emphasis: v.hovered,
            };
            let edge = Edge {
                outline: v.outline,
                shadow: v.shadow,
            };
            card::paint(buf, area, &geom.shape, &fill, tint, edge, Some(&caption));
        }

        render_footer(stage, area, top, buf);
    }
}

fn render_hero(stage: &ShowcaseStage, area: Rect, top: f64, buf: &mut Buffer) {
    let hero = stage.hero();
    let vh = stage.geometry().viewport_rows;

    // Background darkens as the hero scrolls away.
    let bg = fade(ZINC_950, 1.0 - hero.background_shift);
    for row in 0..vh as u16 {
        let y = top + f64::from(row);
        if y < f64::from(area.top()) || y >= f64::from(area.bottom()) {
            continue;
        }
        for x in area.left()..area.right() {
            buf[(x, y as u16)].set_bg(bg);
        }
    }

    let mid = top + vh / 2.0;
    let title_row = mid - 2.0 + hero.title_y / PX_PER_ROW;
    let gap = if hero.title_scale > 0.985 { " " } else { "" };
    let title_style = Theme::text_style(hero.title_opacity)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    for (i, word) in HERO_TITLE.iter().enumerate() {
        let spaced: Vec<String> = word.chars().map(String::from).collect();
        centered_text(buf, area, title_row + i as f64, &spaced.join(gap), title_style);
    }

    let subtitle_row = mid + 1.0 + hero.subtitle_y / PX_PER_ROW;
    let subtitle_style = Style::default().fg(fade(ZINC_500, hero.subtitle_opacity)).bg(bg);
    centered_text(buf, area, subtitle_row, HERO_SUBTITLE, subtitle_style);

    let indicator_row = top + vh - 3.0 + hero.indicator_y / PX_PER_ROW;
    let indicator_style = Style::default().fg(fade(ZINC_500, hero.indicator_opacity)).bg(bg);
    centered_text(buf, area, indicator_row, "Scroll ↓", indicator_style);
}

fn render_footer(stage: &ShowcaseStage, area: Rect, top: f64, buf: &mut Buffer) {
    let footer = stage.footer().visual();
    let base = top + stage.geometry().footer_top + 1.0 + footer.y / PX_PER_ROW;

    let full = f64::from(area.width) * 0.6;
    let len = (full * footer.divider).round() as usize;
    if len > 0 {
        let line = "─".repeat(len);
        let style = Style::default().fg(fade(ZINC_800, footer.opacity));
        centered_text(buf, area, base, &line, style);
    }

    let mut links = String::new();
    let mut spans = Vec::new();
    for (i, name) in FOOTER_LINKS.iter().enumerate() {
        if i > 0 {
            links.push_str("    ");
        }
        spans.push((links.chars().count(), *name, footer.links.get(i).copied().unwrap_or(0.0)));
        links.push_str(name);
    }
    let row = base + 2.0;
    if row >= f64::from(area.top()) && row < f64::from(area.bottom()) {
        let width = links.chars().count() as u16;
        let x0 = area.x + area.width.saturating_sub(width) / 2;
        for (offset, name, opacity) in spans {
            let x = x0 + offset as u16;
            if x < area.right() {
                let max = usize::from(area.right() - x);
                buf.set_stringn(x, row as u16, name, max, Theme::text_style(opacity * footer.opacity));
            }
        }
    }

    centered_text(
        buf,
        area,
        base + 4.0,
        COPYRIGHT,
        Theme::muted_style(footer.copyright * footer.opacity),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(count: usize) -> ShowcaseStage {
        let mut s = ShowcaseStage::new(count, 30.0, ViewportClass::Desktop, 1.0);
        s.tick(0.0);
        s
    }

    #[test]
    fn desktop_cards_are_wider_than_half_the_screen() {
        assert_eq!(card_width(100.0, ViewportClass::Desktop), 55.0);
        assert_eq!(card_width(200.0, ViewportClass::Desktop), 90.0);
        assert_eq!(card_width(100.0, ViewportClass::Mobile), 86.0);
    }

    #[test]
    fn geometry_is_in_paint_order() {
        let s = stage(4);
        let cards = card_geometry(&s, Rect::new(0, 0, 120, 30));
        assert_eq!(cards.len(), 4);
        for pair in cards.windows(2) {
            assert!(pair[0].visual.z_order <= pair[1].visual.z_order);
        }
    }

    #[test]
    fn nothing_is_hit_on_the_hero() {
        let s = stage(4);
        let area = Rect::new(0, 0, 120, 30);
        assert_eq!(hit_test(&s, area, 60, 15), None);
        assert_eq!(hit_test(&s, area, 200, 15), None);
    }

    #[test]
    fn centred_card_is_hit() {
        let mut s = stage(4);
        s.scroll_to_card(1);
        for _ in 0..600 {
            s.tick(1.0 / 60.0);
        }
        let area = Rect::new(0, 0, 120, 30);
        let cards = card_geometry(&s, area);
        let second = cards.iter().find(|c| c.index == 1).unwrap();
        assert!(second.visual.interactive);
        let (x, y) = (second.shape.cx as u16, second.shape.cy as u16);
        assert_eq!(hit_test(&s, area, x, y), Some(1));
    }
}
