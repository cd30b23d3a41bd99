//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::actions::{AdminDashboard, ProjectActions, ProjectForm};
use crate::core::auth::{IdentityProvider, LocalIdentityProvider, Session};
use crate::core::helix::ViewportClass;
use crate::core::project::Project;
use crate::core::repo::SqliteProjectRepository;
use crate::core::spring::{Spring, SpringConfig};
use crate::core::store::{FsObjectStore, ObjectStore};

use super::stage::{HelixStage, ShowcaseStage};
use super::thumb_runtime::{spawn_decode, ThumbUpdate};

pub type Actions = ProjectActions<SqliteProjectRepository, FsObjectStore>;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Showcase,
    Helix,
    Detail,
    Login,
    Admin,
    ProjectForm,
    ConfirmDelete,
}

/// Decoded thumbnail cache entry.
pub enum ThumbSlot {
    Loading,
    Ready(Arc<image::RgbaImage>),
    Failed,
}

/// Detail view for one slug.
pub struct DetailState {
    pub slug: String,
    /// `None` renders the "not found" page.
    pub project: Option<Project>,
    /// Fade-in, 0 → 1.
    pub reveal: Spring,
    pub return_to: ActiveView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

pub const FORM_FIELDS: &[&str] = &[
    "Title",
    "Description",
    "Category",
    "Year",
    "Image (URL or file path)",
];

/// Add-project form with the focused field index.
#[derive(Debug, Default)]
pub struct FormState {
    pub form: ProjectForm,
    pub focus: usize,
}

impl FormState {
    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.form.title,
            1 => &self.form.description,
            2 => &self.form.category,
            3 => &self.form.year,
            _ => &self.form.image,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> &mut String {
        match index {
            0 => &mut self.form.title,
            1 => &mut self.form.description,
            2 => &mut self.form.category,
            3 => &mut self.form.year,
            _ => &mut self.form.image,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }
}

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    pub actions: Actions,
    pub identity: LocalIdentityProvider,
    pub session: Option<Session>,
    /// Newest first, as listed by the repository.
    pub projects: Vec<Project>,
    pub showcase: ShowcaseStage,
    pub helix: HelixStage,
    pub detail: Option<DetailState>,
    pub dashboard: AdminDashboard,
    pub login: LoginForm,
    pub form: FormState,
    /// Thumbnail URL → decoded image.
    pub thumbs: HashMap<String, ThumbSlot>,
    thumb_tx: Option<mpsc::UnboundedSender<ThumbUpdate>>,
    /// Terminal size in cells.
    pub viewport: (u16, u16),
    /// `Some` pins the viewport class regardless of width.
    pub forced_class: Option<ViewportClass>,
    pub active_view: ActiveView,
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        actions: Actions,
        identity: LocalIdentityProvider,
        viewport: (u16, u16),
        forced_class: Option<ViewportClass>,
    ) -> Self {
        let class = forced_class
            .unwrap_or_else(|| ViewportClass::from_width(viewport.0, config.mobile_breakpoint_cols));
        let rows = content_rows(viewport.1);
        let showcase = ShowcaseStage::new(0, rows, class, config.scroll_lerp);
        let helix = HelixStage::new(0, rows, class, config.helix.clone(), config.scroll_lerp);
        Self {
            config,
            actions,
            identity,
            session: None,
            projects: Vec::new(),
            showcase,
            helix,
            detail: None,
            dashboard: AdminDashboard::default(),
            login: LoginForm::default(),
            form: FormState::default(),
            thumbs: HashMap::new(),
            thumb_tx: None,
            viewport,
            forced_class,
            active_view: ActiveView::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Decode thumbnails on background threads and report through `tx`.
    pub fn set_thumb_sender(&mut self, tx: mpsc::UnboundedSender<ThumbUpdate>) {
        self.thumb_tx = Some(tx);
    }

    pub fn class(&self) -> ViewportClass {
        self.forced_class.unwrap_or_else(|| {
            ViewportClass::from_width(self.viewport.0, self.config.mobile_breakpoint_cols)
        })
    }

    /// Re-read the project list and rebuild everything derived from it.
    pub fn reload_projects(&mut self) {
        self.projects = self.actions.list_projects();
        let count = self.projects.len();
        self.showcase.set_count(count);
        self.helix.ensure_layout(count, self.class());
        self.dashboard.projects = self.projects.clone();
        if self.dashboard.selected >= count {
            self.dashboard.selected = count.saturating_sub(1);
        }
        self.request_thumbnails();
        tracing::debug!(count, "projects loaded");
    }

    fn request_thumbnails(&mut self) {
        let Some(tx) = self.thumb_tx.clone() else {
            return;
        };
        for project in &self.projects {
            if self.thumbs.contains_key(&project.thumbnail) {
                continue;
            }
            match self.actions.store().resolve(&project.thumbnail) {
                Some(path) => {
                    self.thumbs.insert(project.thumbnail.clone(), ThumbSlot::Loading);
                    spawn_decode(tx.clone(), project.thumbnail.clone(), path);
                }
                None => {
                    self.thumbs.insert(project.thumbnail.clone(), ThumbSlot::Failed);
                }
            }
        }
    }

    pub fn apply_thumb(&mut self, update: ThumbUpdate) {
        let slot = match update.result {
            Ok(img) => ThumbSlot::Ready(img),
            Err(_) => ThumbSlot::Failed,
        };
        self.thumbs.insert(update.url, slot);
    }

    pub fn thumbnail(&self, url: &str) -> Option<&image::RgbaImage> {
        match self.thumbs.get(url) {
            Some(ThumbSlot::Ready(img)) => Some(img.as_ref()),
            _ => None,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        let class = self.class();
        let content = content_rows(rows);
        self.showcase.set_class(class);
        self.showcase.relayout(content);
        self.helix.ensure_layout(self.projects.len(), class);
        self.helix.relayout(content);
    }

    /// Advance all animation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if self.helix.is_mounted() {
            self.helix.tick(dt);
        } else {
            self.showcase.tick(dt);
        }
        if let Some(detail) = &mut self.detail {
            detail.reveal.tick(dt);
        }
    }

    // ── navigation ──────────────────────────────────────────────

    pub fn open_detail(&mut self, slug: &str) {
        let project = self.actions.project_by_slug(slug);
        if project.is_none() {
            tracing::info!(slug, "detail requested for unknown slug");
        }
        let return_to = match self.active_view {
            ActiveView::Detail => self
                .detail
                .as_ref()
                .map(|d| d.return_to)
                .unwrap_or_default(),
            other => other,
        };
        let mut reveal = Spring::new(0.0, SpringConfig::REVEAL);
        reveal.set_target(1.0);
        self.detail = Some(DetailState {
            slug: slug.to_string(),
            project,
            reveal,
            return_to,
        });
        self.set_view(ActiveView::Detail);
    }

    /// Open the detail view of the card at `index` (showcase order).
    pub fn open_card(&mut self, index: usize) {
        if let Some(slug) = self.projects.get(index).map(|p| p.slug.clone()) {
            self.open_detail(&slug);
        }
    }

    /// Leave the detail view.  Back on the showcase, the card just viewed
    /// is brought to the middle of the screen.
    pub fn close_detail(&mut self) {
        let Some(detail) = self.detail.take() else {
            self.set_view(ActiveView::Showcase);
            return;
        };
        if detail.return_to == ActiveView::Showcase {
            if let Some(index) = self.projects.iter().position(|p| p.slug == detail.slug) {
                self.showcase.scroll_to_card(index);
            }
        }
        self.set_view(detail.return_to);
    }

    pub fn toggle_helix(&mut self) {
        let next = if self.active_view == ActiveView::Helix {
            ActiveView::Showcase
        } else {
            ActiveView::Helix
        };
        self.set_view(next);
    }

    pub fn open_admin(&mut self) {
        if !self.identity.is_configured() {
            self.status_message =
                Some("Admin disabled: set admin_email and admin_password in the config".into());
            return;
        }
        if self.session.is_some() {
            self.dashboard.alert = None;
            self.set_view(ActiveView::Admin);
        } else {
            self.login = LoginForm::default();
            if let Some(email) = &self.config.admin_email {
                self.login.email = email.clone();
                self.login.focus = LoginField::Password;
            }
            self.set_view(ActiveView::Login);
        }
    }

    /// Switch views, keeping the helix spin mounted only while visible.
    pub fn set_view(&mut self, view: ActiveView) {
        if view == ActiveView::Helix {
            self.helix.ensure_layout(self.projects.len(), self.class());
            self.helix.mount();
        } else {
            self.helix.unmount();
        }
        if view == ActiveView::Showcase {
            self.showcase.set_hovered(None);
        }
        self.active_view = view;
    }

    // ── admin ───────────────────────────────────────────────────

    pub fn submit_login(&mut self) {
        match self.identity.sign_in(&self.login.email, &self.login.password) {
            Ok(session) => {
                self.session = Some(session);
                self.login = LoginForm::default();
                self.dashboard.alert = None;
                self.set_view(ActiveView::Admin);
            }
            Err(err) => {
                self.login.password.clear();
                self.login.error = Some(err.to_string());
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            self.identity.sign_out(&session);
        }
        self.set_view(ActiveView::Showcase);
    }

    pub fn open_form(&mut self) {
        self.form = FormState::default();
        self.dashboard.alert = None;
        self.set_view(ActiveView::ProjectForm);
    }

    /// Create from the form; closes it only on success.
    pub fn submit_form(&mut self) {
        let result = self
            .dashboard
            .create(&self.actions, self.session.as_ref(), &self.form.form);
        if result.success {
            self.form = FormState::default();
            self.reload_projects();
            self.status_message = Some("Project created".into());
            self.set_view(ActiveView::Admin);
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.dashboard.selected_project().map(|p| p.id.clone()) else {
            self.set_view(ActiveView::Admin);
            return;
        };
        let result = self
            .dashboard
            .delete(&self.actions, self.session.as_ref(), &id);
        if result.success {
            self.reload_projects();
            self.status_message = Some("Project deleted".into());
        }
        self.set_view(ActiveView::Admin);
    }
}

/// Rows available to the document (one row is the status bar).
pub fn content_rows(terminal_rows: u16) -> f64 {
    f64::from(terminal_rows.saturating_sub(1).max(1))
}
