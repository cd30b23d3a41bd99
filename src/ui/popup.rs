//! Popup overlay widgets: sign-in, add-project form and delete confirmation.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::state::{FormState, LoginField, LoginForm, FORM_FIELDS};
use crate::core::project::{Project, CATEGORIES};

use super::layout::centered_fixed;
use super::theme::Theme;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// `label` on one line, the boxed value (with a cursor when focused) below.
fn field_lines(label: &str, value: &str, focused: bool, width: usize) -> [Line<'static>; 2] {
    let prefix = if focused { " ▸ " } else { "   " };
    let cursor = if focused { "▏" } else { "" };
    // Keep the tail visible when the value is wider than the box.
    let room = width.saturating_sub(6);
    let count = value.chars().count();
    let shown: String = value.chars().skip(count.saturating_sub(room)).collect();
    [
        Line::from(Span::styled(
            format!("{prefix}{label}"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("   {shown}{cursor}"),
            Theme::input_style(focused),
        )),
    ]
}

// ───────────────────────────────────────── login popup ───────

pub struct LoginPopup<'a> {
    pub form: &'a LoginForm,
}

impl Widget for LoginPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(48, 11, area);
        Clear.render(popup, buf);
        let block = popup_block(" Sign in ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let width = usize::from(inner.width);
        let masked = "•".repeat(self.form.password.chars().count());
        let mut lines = vec![Line::raw("")];
        lines.extend(field_lines(
            "Email",
            &self.form.email,
            self.form.focus == LoginField::Email,
            width,
        ));
        lines.extend(field_lines(
            "Password",
            &masked,
            self.form.focus == LoginField::Password,
            width,
        ));
        lines.push(Line::raw(""));
        match &self.form.error {
            Some(err) => lines.push(Line::from(Span::styled(format!("  {err}"), Theme::error_style()))),
            None => lines.push(Line::from(Span::styled(
                "  Tab: switch field  Enter: sign in  Esc: cancel",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── project form ──────

/// Index of the category field in [`FORM_FIELDS`].
const CATEGORY_FIELD: usize = 2;

pub struct ProjectFormPopup<'a> {
    pub state: &'a FormState,
    pub alert: Option<&'a str>,
}

impl Widget for ProjectFormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (FORM_FIELDS.len() as u16) * 2 + 6;
        let popup = centered_fixed(64, height, area);
        Clear.render(popup, buf);
        let block = popup_block(" Add project ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let width = usize::from(inner.width);
        let mut lines = vec![Line::raw("")];
        for (i, label) in FORM_FIELDS.iter().enumerate() {
            lines.extend(field_lines(
                label,
                self.state.field(i),
                i == self.state.focus,
                width,
            ));
        }
        lines.push(Line::raw(""));
        let hint = if self.state.focus == CATEGORY_FIELD {
            format!("  Suggested: {}", CATEGORIES.join(", "))
        } else {
            "  Tab/↑↓: field  Enter: save  Esc: cancel".to_string()
        };
        match self.alert {
            Some(alert) => lines.push(Line::from(Span::styled(format!("  {alert}"), Theme::error_style()))),
            None => lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))),
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── confirm delete ────

pub struct ConfirmDeletePopup<'a> {
    pub project: Option<&'a Project>,
}

impl Widget for ConfirmDeletePopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(50, 8, area);
        Clear.render(popup, buf);
        let block = popup_block(" Delete project ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let title = self.project.map(|p| p.title.as_str()).unwrap_or("this project");
        let lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::raw("  Delete "),
                Span::styled(format!("\"{title}\""), Theme::title_style()),
                Span::raw("?"),
            ]),
            Line::from(Span::styled(
                "  This cannot be undone.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "  y/Enter: delete  n/Esc: cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
