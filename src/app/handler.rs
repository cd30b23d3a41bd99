//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::smooth_scroll::SmoothScroll;
use crate::ui::layout::AppLayout;
use crate::ui::{detail, helix_view, showcase};

use super::state::{ActiveView, AppState, LoginField, LoginForm};

/// Rows moved per scroll step (key or wheel notch).
const SCROLL_STEP: f64 = 3.0;
/// Fraction of the viewport moved by page keys.
const PAGE_FRACTION: f64 = 0.9;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }
    state.status_message = None;

    match state.active_view {
        ActiveView::Showcase | ActiveView::Helix => handle_stage_key(state, key),
        ActiveView::Detail => handle_detail_key(state, key),
        ActiveView::Login => handle_login_key(state, key),
        ActiveView::Admin => handle_admin_key(state, key),
        ActiveView::ProjectForm => handle_form_key(state, key),
        ActiveView::ConfirmDelete => handle_confirm_key(state, key),
    }
}

/// The stage area for the current terminal size.
pub fn content_area(state: &AppState) -> Rect {
    let (cols, rows) = state.viewport;
    AppLayout::from_area(Rect::new(0, 0, cols, rows)).content_area
}

fn active_scroll(state: &mut AppState) -> &mut SmoothScroll {
    if state.active_view == ActiveView::Helix {
        &mut state.helix.scroll
    } else {
        &mut state.showcase.scroll
    }
}

// ── Showcase / helix (configurable bindings) ────────────────────

fn handle_stage_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that always work on the stage.
    match key.code {
        KeyCode::Home => {
            active_scroll(state).scroll_to(0.0);
            return;
        }
        KeyCode::End => {
            let scroll = active_scroll(state);
            let max = scroll.max();
            scroll.scroll_to(max);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let page = f64::from(content_area(state).height) * PAGE_FRACTION;

    match action {
        Action::ScrollDown => active_scroll(state).scroll_by(SCROLL_STEP),
        Action::ScrollUp => active_scroll(state).scroll_by(-SCROLL_STEP),
        Action::PageDown => active_scroll(state).scroll_by(page),
        Action::PageUp => active_scroll(state).scroll_by(-page),
        Action::Open => open_current(state),
        Action::Back => {
            if state.active_view == ActiveView::Helix {
                state.set_view(ActiveView::Showcase);
            }
        }
        Action::ToggleHelix => state.toggle_helix(),
        Action::OpenAdmin => state.open_admin(),
        Action::Quit => state.should_quit = true,
    }
}

/// Open the hovered card, else the one in focus.
fn open_current(state: &mut AppState) {
    let target = if state.active_view == ActiveView::Helix {
        let area = content_area(state);
        state
            .helix
            .hovered()
            .filter(|&i| helix_view::is_selectable(&state.helix, area, i))
            .or_else(|| helix_view::front_item(&state.helix, area))
    } else {
        state.showcase.hovered().or_else(|| state.showcase.focused())
    };
    match target {
        Some(index) => state.open_card(index),
        None => state.status_message = Some("No card in focus".into()),
    }
}

// ── Detail ──────────────────────────────────────────────────────

fn handle_detail_key(state: &mut AppState, key: KeyEvent) {
    match state.config.match_key(key) {
        Some(Action::Back) => state.close_detail(),
        Some(Action::Quit) => state.should_quit = true,
        _ => {}
    }
}

// ── Login ───────────────────────────────────────────────────────

fn handle_login_key(state: &mut AppState, key: KeyEvent) {
    let login = &mut state.login;
    match key.code {
        KeyCode::Esc => state.set_view(ActiveView::Showcase),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.focus = match login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Enter => {
            if login.focus == LoginField::Email {
                login.focus = LoginField::Password;
            } else {
                state.submit_login();
            }
        }
        KeyCode::Backspace => {
            login.error = None;
            focused_login_field(login).pop();
        }
        KeyCode::Char(c) if is_text_input(key) => {
            login.error = None;
            focused_login_field(login).push(c);
        }
        _ => {}
    }
}

fn focused_login_field(login: &mut LoginForm) -> &mut String {
    match login.focus {
        LoginField::Email => &mut login.email,
        LoginField::Password => &mut login.password,
    }
}

fn is_text_input(key: KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

// ── Admin dashboard ─────────────────────────────────────────────

fn handle_admin_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.dashboard.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.dashboard.select_next(),
        KeyCode::Char('n') => state.open_form(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if state.dashboard.selected_project().is_some() {
                state.dashboard.alert = None;
                state.set_view(ActiveView::ConfirmDelete);
            }
        }
        KeyCode::Char('l') => state.sign_out(),
        KeyCode::Enter => {
            if let Some(slug) = state.dashboard.selected_project().map(|p| p.slug.clone()) {
                state.open_detail(&slug);
            }
        }
        KeyCode::Esc => state.set_view(ActiveView::Showcase),
        KeyCode::Char('q') => state.should_quit = true,
        _ => {}
    }
}

fn handle_form_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.dashboard.alert = None;
            state.set_view(ActiveView::Admin);
        }
        KeyCode::Tab | KeyCode::Down => state.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.form.focus_prev(),
        KeyCode::Enter => state.submit_form(),
        KeyCode::Backspace => {
            let focus = state.form.focus;
            state.form.field_mut(focus).pop();
        }
        KeyCode::Char(c) if is_text_input(key) => {
            let focus = state.form.focus;
            state.form.field_mut(focus).push(c);
        }
        _ => {}
    }
}

fn handle_confirm_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => state.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => state.set_view(ActiveView::Admin),
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let area = content_area(state);
    let (col, row) = (mouse.column, mouse.row);

    match state.active_view {
        ActiveView::Showcase => match mouse.kind {
            MouseEventKind::ScrollDown => state.showcase.scroll.scroll_by(SCROLL_STEP),
            MouseEventKind::ScrollUp => state.showcase.scroll.scroll_by(-SCROLL_STEP),
            MouseEventKind::Moved => {
                let hit = showcase::hit_test(&state.showcase, area, col, row);
                if hit != state.showcase.hovered() {
                    state.showcase.set_hovered(hit);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = showcase::hit_test(&state.showcase, area, col, row) {
                    state.open_card(index);
                }
            }
            _ => {}
        },
        ActiveView::Helix => match mouse.kind {
            MouseEventKind::ScrollDown => state.helix.scroll.scroll_by(SCROLL_STEP),
            MouseEventKind::ScrollUp => state.helix.scroll.scroll_by(-SCROLL_STEP),
            MouseEventKind::Moved => {
                let hit = helix_view::hit_test(&state.helix, area, col, row);
                state.helix.set_hovered(hit);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = helix_view::hit_test(&state.helix, area, col, row) {
                    state.open_card(index);
                }
            }
            _ => {}
        },
        ActiveView::Detail => {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && detail::back_rect(area).contains((col, row).into())
            {
                state.close_detail();
            }
        }
        _ => {}
    }
}
