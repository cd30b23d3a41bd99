//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* and *app* state and turns it into cells on
//! the terminal.  No database or filesystem I/O happens here.

pub mod admin;
pub mod card;
pub mod detail;
pub mod helix_view;
pub mod layout;
pub mod popup;
pub mod showcase;
pub mod theme;
pub mod thumbnail;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::app::state::{ActiveView, AppState};
use crate::config::Action;

use self::layout::AppLayout;
use self::theme::Theme;

/// Write `text` centred on document row `row`, skipping rows outside `area`.
pub fn centered_text(buf: &mut Buffer, area: Rect, row: f64, text: &str, style: Style) {
    if !row.is_finite() || row < f64::from(area.top()) || row >= f64::from(area.bottom()) {
        return;
    }
    let width = Line::raw(text).width().min(usize::from(area.width)) as u16;
    let x = area.x + (area.width - width) / 2;
    buf.set_stringn(x, row as u16, text, usize::from(area.width), style);
}

/// Draw one frame.
pub fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());
    let content = layout.content_area;

    match state.active_view {
        ActiveView::Helix => frame.render_widget(helix_view::HelixView { state }, content),
        ActiveView::Detail => {
            if let Some(detail) = &state.detail {
                frame.render_widget(detail::DetailView { state, detail }, content);
            }
        }
        ActiveView::Admin | ActiveView::ProjectForm | ActiveView::ConfirmDelete => {
            let email = state.session.as_ref().map(|s| s.email.as_str()).unwrap_or("");
            frame.render_widget(
                admin::AdminView {
                    dashboard: &state.dashboard,
                    email,
                },
                content,
            );
        }
        ActiveView::Showcase | ActiveView::Login => {
            frame.render_widget(showcase::ShowcaseView { state }, content)
        }
    }

    match state.active_view {
        ActiveView::Login => {
            frame.render_widget(popup::LoginPopup { form: &state.login }, content)
        }
        ActiveView::ProjectForm => frame.render_widget(
            popup::ProjectFormPopup {
                state: &state.form,
                alert: state.dashboard.alert.as_deref(),
            },
            content,
        ),
        ActiveView::ConfirmDelete => frame.render_widget(
            popup::ConfirmDeletePopup {
                project: state.dashboard.selected_project(),
            },
            content,
        ),
        _ => {}
    }

    let status = Paragraph::new(status_text(state)).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

fn status_text(state: &AppState) -> String {
    if let Some(msg) = &state.status_message {
        return msg.clone();
    }
    match state.active_view {
        ActiveView::Showcase | ActiveView::Helix => {
            format!(" {}  [{}]", state.config.status_bar_hint(), state.class().label())
        }
        ActiveView::Detail => format!(
            " {}: back | {}: quit",
            state.config.display_bindings(Action::Back),
            state.config.display_bindings(Action::Quit)
        ),
        ActiveView::Admin => format!(" {}", admin::ADMIN_HINT),
        ActiveView::Login | ActiveView::ProjectForm | ActiveView::ConfirmDelete => String::new(),
    }
}

/// Render into an off-screen buffer, for tests.
#[cfg(test)]
pub(crate) fn render_to_buffer(widget: impl ratatui::widgets::Widget, area: Rect) -> Buffer {
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);
    buf
}
