//! Project detail page, looked up by slug.
//!
//! Fades in with the reveal spring.  The back link sits at a fixed spot
//! so mouse handling can hit-test it without a render pass.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::state::{AppState, DetailState, ThumbSlot};

use super::centered_text;
use super::theme::{placeholder_curve, Theme};
use super::thumbnail::{render_fit, render_placeholder, Tint};

const BACK_LABEL: &str = "← Back";

/// Clickable "back" link within the content area.
pub fn back_rect(area: Rect) -> Rect {
    Rect::new(area.x + 2, area.y + 1, BACK_LABEL.chars().count() as u16, 1).intersection(area)
}

pub struct DetailView<'a> {
    pub state: &'a AppState,
    pub detail: &'a DetailState,
}

impl Widget for DetailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let reveal = self.detail.reveal.value().clamp(0.0, 1.0);
        let back_rect = back_rect(area);
        if !back_rect.is_empty() {
            buf.set_stringn(
                back_rect.x,
                back_rect.y,
                BACK_LABEL,
                usize::from(back_rect.width),
                Theme::muted_style(1.0),
            );
        }

        // Slides up two rows while fading in.
        let lift = ((1.0 - reveal) * 2.0).round() as u16;
        let body = Rect::new(
            area.x,
            (area.y + 3 + lift).min(area.bottom()),
            area.width,
            area.height.saturating_sub(3 + lift),
        );

        match &self.detail.project {
            Some(project) => {
                let inner = Rect::new(
                    body.x + 2,
                    body.y,
                    body.width.saturating_sub(4),
                    body.height,
                );
                let image_rows = (inner.height * 3 / 5).max(1);
                let image_area = Rect::new(inner.x, inner.y, inner.width, image_rows);
                let tint = Tint {
                    opacity: reveal,
                    ..Tint::NONE
                };
                match self.state.thumbs.get(&project.thumbnail) {
                    Some(ThumbSlot::Ready(img)) => render_fit(img, image_area, tint, buf),
                    Some(ThumbSlot::Loading) => centered_text(
                        buf,
                        image_area,
                        f64::from(image_area.y) + f64::from(image_rows) / 2.0,
                        "Loading…",
                        Theme::muted_style(reveal),
                    ),
                    _ => render_placeholder(&placeholder_curve(), image_area, tint, buf),
                }

                let text_area = Rect::new(
                    inner.x,
                    (inner.y + image_rows + 1).min(inner.bottom()),
                    inner.width,
                    inner.height.saturating_sub(image_rows + 1),
                );
                let lines = vec![
                    Line::from(Span::styled(
                        format!("{} · {}", project.category, project.year),
                        Theme::muted_style(reveal),
                    )),
                    Line::from(Span::styled(
                        project.title.clone(),
                        Theme::text_style(reveal).add_modifier(Modifier::BOLD),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled(
                        project.description.clone(),
                        Theme::text_style(reveal * 0.85),
                    )),
                ];
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .render(text_area, buf);
            }
            None => {
                let mid = f64::from(body.y) + f64::from(body.height) / 2.0 - 2.0;
                centered_text(
                    buf,
                    body,
                    mid,
                    "Project not found",
                    Theme::text_style(reveal).add_modifier(Modifier::BOLD),
                );
                centered_text(
                    buf,
                    body,
                    mid + 2.0,
                    &format!("Nothing is published under \"{}\".", self.detail.slug),
                    Theme::muted_style(reveal),
                );
                centered_text(
                    buf,
                    body,
                    mid + 4.0,
                    "Press Esc to return to the collection.",
                    Theme::muted_style(reveal),
                );
            }
        }
    }
}
