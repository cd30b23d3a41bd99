//! Admin dashboard: the project list with selection and the alert banner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::core::actions::AdminDashboard;

use super::theme::Theme;

pub const ADMIN_HINT: &str = "n new  d delete  Enter view  l sign out  Esc back";

pub struct AdminView<'a> {
    pub dashboard: &'a AdminDashboard,
    /// Signed-in account, shown in the title.
    pub email: &'a str,
}

/// First visible row so that `selected` stays on screen.
fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}

impl Widget for AdminView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Projects · {} ", self.email))
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        if let Some(alert) = &self.dashboard.alert {
            lines.push(Line::from(Span::styled(format!(" {alert}"), Theme::error_style())));
            lines.push(Line::raw(""));
        }

        let dim = Style::default().fg(Color::DarkGray);
        if self.dashboard.loading {
            lines.push(Line::from(Span::styled(" Loading…", dim)));
        } else if self.dashboard.projects.is_empty() {
            lines.push(Line::from(Span::styled(" No projects. Press n to add one.", dim)));
        } else {
            let width = usize::from(inner.width);
            let title_w = (width / 2).max(12);
            lines.push(Line::from(Span::styled(
                format!("   {:<title_w$} {:<14} {:<6}", "Title", "Category", "Year"),
                dim,
            )));
            let rows = usize::from(inner.height).saturating_sub(lines.len());
            let offset = scroll_offset(self.dashboard.selected, rows);
            for (i, project) in self
                .dashboard
                .projects
                .iter()
                .enumerate()
                .skip(offset)
                .take(rows)
            {
                let selected = i == self.dashboard.selected;
                let prefix = if selected { " ▸ " } else { "   " };
                let title: String = project.title.chars().take(title_w).collect();
                let text = format!(
                    "{prefix}{title:<title_w$} {:<14} {:<6}",
                    project.category, project.year
                );
                let style = if selected {
                    Theme::selected_style()
                } else {
                    Theme::text_style(1.0)
                };
                lines.push(Line::from(Span::styled(text, style)));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(12, 10), 3);
        assert_eq!(scroll_offset(5, 0), 0);
    }

    #[test]
    fn alert_is_rendered_above_the_list() {
        let dashboard = AdminDashboard {
            alert: Some("Failed to delete project".into()),
            ..AdminDashboard::default()
        };
        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        AdminView {
            dashboard: &dashboard,
            email: "admin@example.com",
        }
        .render(area, &mut buf);
        let row: String = (1..59).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Failed to delete project"));
    }
}
