//! Action boundary between the data layer and the UI.
//!
//! Repository and store errors stop here: callers get an [`ActionResult`]
//! and the detail goes to the log.  [`AdminDashboard`] is the admin list
//! state that only changes once an action reports success.

use std::path::Path;

use super::auth::{AdminGuard, Session};
use super::error::FolioError;
use super::project::{Project, ProjectDraft};
use super::repo::ProjectRepository;
use super::store::ObjectStore;

pub const CREATE_FAILED: &str = "Failed to create project";
pub const DELETE_FAILED: &str = "Failed to delete project";
pub const UPLOAD_FAILED: &str = "Failed to upload image";
pub const UNAUTHENTICATED: &str = "Please sign in to manage projects";

/// `{ success, error }` outcome of a mutating action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Admin form input.  `image` is either a URL or a local file to upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub year: String,
    pub image: String,
}

pub struct ProjectActions<R, S> {
    repo: R,
    store: S,
}

impl<R: ProjectRepository, S: ObjectStore> ProjectActions<R, S> {
    pub fn new(repo: R, store: S) -> Self {
        Self { repo, store }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Newest first; empty on failure.
    pub fn list_projects(&self) -> Vec<Project> {
        self.repo.list().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to list projects");
            Vec::new()
        })
    }

    /// `None` means "not found" (including lookup failures).
    pub fn project_by_slug(&self, slug: &str) -> Option<Project> {
        match self.repo.get_by_slug(slug) {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(slug, error = %err, "failed to look up project");
                None
            }
        }
    }

    pub fn create_project(&self, session: Option<&Session>, form: &ProjectForm) -> ActionResult {
        if AdminGuard::require(session).is_err() {
            return ActionResult::failed(UNAUTHENTICATED);
        }
        match self.try_create(form) {
            Ok(project) => {
                tracing::info!(slug = %project.slug, "create_project ok");
                ActionResult::ok()
            }
            Err(FolioError::Upload(err)) => {
                tracing::error!(error = %err, "create_project upload failed");
                ActionResult::failed(UPLOAD_FAILED)
            }
            Err(err) => {
                tracing::error!(error = %err, "create_project failed");
                ActionResult::failed(CREATE_FAILED)
            }
        }
    }

    fn try_create(&self, form: &ProjectForm) -> Result<Project, FolioError> {
        let mut draft = ProjectDraft {
            title: form.title.clone(),
            description: form.description.clone(),
            category: form.category.clone(),
            year: form.year.clone(),
            thumbnail: form.image.trim().to_string(),
        };
        // Validate before uploading so a bad form leaves no orphan object.
        draft.validate()?;

        let local = Path::new(&draft.thumbnail);
        if local.is_file() {
            draft.thumbnail = self.upload_file(local)?;
        }
        Ok(self.repo.create(&draft)?)
    }

    fn upload_file(&self, path: &Path) -> Result<String, FolioError> {
        let bytes = std::fs::read(path).map_err(super::error::UploadError::from)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.store.upload(&name, &bytes)?)
    }

    /// Upload a local image and return its public URL.
    pub fn upload_thumbnail(
        &self,
        session: Option<&Session>,
        path: &Path,
    ) -> Result<String, ActionResult> {
        if AdminGuard::require(session).is_err() {
            return Err(ActionResult::failed(UNAUTHENTICATED));
        }
        self.upload_file(path).map_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "upload failed");
            ActionResult::failed(UPLOAD_FAILED)
        })
    }

    pub fn delete_project(&self, session: Option<&Session>, id: &str) -> ActionResult {
        if AdminGuard::require(session).is_err() {
            return ActionResult::failed(UNAUTHENTICATED);
        }
        match self.repo.delete(id) {
            Ok(()) => ActionResult::ok(),
            Err(err) => {
                tracing::error!(id, error = %err, "delete_project failed");
                ActionResult::failed(DELETE_FAILED)
            }
        }
    }
}

// ───────────────────────────────────────── dashboard ─────────

/// Admin dashboard list state.
#[derive(Debug, Default)]
pub struct AdminDashboard {
    pub projects: Vec<Project>,
    pub loading: bool,
    /// User-facing failure message, cleared by the next action.
    pub alert: Option<String>,
    pub selected: usize,
}

impl AdminDashboard {
    #[cfg(test)]
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Remove `id` only once the repository confirms the delete.
    pub fn delete<R: ProjectRepository, S: ObjectStore>(
        &mut self,
        actions: &ProjectActions<R, S>,
        session: Option<&Session>,
        id: &str,
    ) -> ActionResult {
        self.loading = true;
        self.alert = None;
        let result = actions.delete_project(session, id);
        if result.success {
            self.projects.retain(|p| p.id != id);
            if self.selected >= self.projects.len() {
                self.selected = self.projects.len().saturating_sub(1);
            }
        } else {
            self.alert = result.error.clone();
        }
        self.loading = false;
        result
    }

    /// Create, then reload the list from the repository on success.
    pub fn create<R: ProjectRepository, S: ObjectStore>(
        &mut self,
        actions: &ProjectActions<R, S>,
        session: Option<&Session>,
        form: &ProjectForm,
    ) -> ActionResult {
        self.loading = true;
        self.alert = None;
        let result = actions.create_project(session, form);
        if result.success {
            self.projects = actions.list_projects();
            self.selected = 0;
        } else {
            self.alert = result.error.clone();
        }
        self.loading = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{IdentityProvider, LocalIdentityProvider};
    use crate::core::db::open_db_in_memory;
    use crate::core::error::{RepoError, RepoResult, UploadError};
    use crate::core::repo::SqliteProjectRepository;
    use crate::core::store::FsObjectStore;
    use std::cell::Cell;
    use std::path::PathBuf;

    const PNG: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0,
        0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0,
    ];

    /// Wraps the SQLite repository and fails writes on demand.
    struct FlakyRepo {
        inner: SqliteProjectRepository,
        fail_writes: Cell<bool>,
    }

    impl ProjectRepository for FlakyRepo {
        fn list(&self) -> RepoResult<Vec<Project>> {
            self.inner.list()
        }
        fn get_by_slug(&self, slug: &str) -> RepoResult<Option<Project>> {
            self.inner.get_by_slug(slug)
        }
        fn get_by_id(&self, id: &str) -> RepoResult<Option<Project>> {
            self.inner.get_by_id(id)
        }
        fn create(&self, draft: &ProjectDraft) -> RepoResult<Project> {
            if self.fail_writes.get() {
                return Err(RepoError::Storage(rusqlite::Error::InvalidQuery));
            }
            self.inner.create(draft)
        }
        fn delete(&self, id: &str) -> RepoResult<()> {
            if self.fail_writes.get() {
                return Err(RepoError::Storage(rusqlite::Error::InvalidQuery));
            }
            self.inner.delete(id)
        }
    }

    /// Store that refuses every upload.
    struct BrokenStore;

    impl ObjectStore for BrokenStore {
        fn upload(&self, filename: &str, _bytes: &[u8]) -> Result<String, UploadError> {
            Err(UploadError::Conflict(filename.to_string()))
        }
        fn resolve(&self, _url: &str) -> Option<PathBuf> {
            None
        }
    }

    fn session() -> Session {
        let idp = LocalIdentityProvider::new(Some("admin@example.com"), Some("hunter2hunter2"));
        idp.sign_in("admin@example.com", "hunter2hunter2").unwrap()
    }

    fn form(title: &str, image: &str) -> ProjectForm {
        ProjectForm {
            title: title.into(),
            description: "An exploration of weightless structures.".into(),
            category: "Collection".into(),
            year: "2024".into(),
            image: image.into(),
        }
    }

    fn actions(dir: &Path) -> ProjectActions<FlakyRepo, FsObjectStore> {
        let repo = FlakyRepo {
            inner: SqliteProjectRepository::new(open_db_in_memory().unwrap()),
            fail_writes: Cell::new(false),
        };
        ProjectActions::new(repo, FsObjectStore::new(dir, "https://cdn.example.com"))
    }

    #[test]
    fn create_derives_slug_and_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let actions = actions(dir.path());
        let s = session();
        assert!(actions.create_project(Some(&s), &form("Silent Geometry", "https://x/1.jpg")).success);
        assert!(actions.create_project(Some(&s), &form("Ethereal Forms", "https://x/2.jpg")).success);

        let list = actions.list_projects();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Ethereal Forms");
        let suffix = list[0].slug.strip_prefix("ethereal-forms-").unwrap();
        assert!(suffix.parse::<i64>().is_ok());
        assert_eq!(actions.project_by_slug(&list[0].slug).unwrap().id, list[0].id);
        assert!(actions.project_by_slug("no-such-work").is_none());
    }

    #[test]
    fn create_requires_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let actions = actions(dir.path());
        let result = actions.create_project(None, &form("Dark Matter", "https://x/3.jpg"));
        assert_eq!(result, ActionResult::failed(UNAUTHENTICATED));
        assert!(actions.list_projects().is_empty());
    }

    #[test]
    fn missing_field_fails_without_uploading() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cover.png");
        std::fs::write(&image, PNG).unwrap();
        let store_dir = dir.path().join("objects");
        let actions = actions(&store_dir);

        let mut f = form("", image.to_str().unwrap());
        f.title.clear();
        let result = actions.create_project(Some(&session()), &f);
        assert_eq!(result, ActionResult::failed(CREATE_FAILED));
        assert!(!store_dir.exists());
    }

    #[test]
    fn local_image_is_uploaded_and_used_as_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cover art.png");
        std::fs::write(&image, PNG).unwrap();
        let actions = actions(&dir.path().join("objects"));

        let result = actions.create_project(Some(&session()), &form("Frozen Light", image.to_str().unwrap()));
        assert!(result.success, "{result:?}");
        let project = &actions.list_projects()[0];
        assert!(project.thumbnail.starts_with("https://cdn.example.com/"));
        assert!(project.thumbnail.ends_with("-coverart.png"));
        assert!(actions.store().resolve(&project.thumbnail).is_some());
    }

    #[test]
    fn upload_failure_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cover.png");
        std::fs::write(&image, PNG).unwrap();
        let repo = SqliteProjectRepository::new(open_db_in_memory().unwrap());
        let actions = ProjectActions::new(repo, BrokenStore);
        let s = session();

        let result = actions.create_project(Some(&s), &form("Void Symphony", image.to_str().unwrap()));
        assert_eq!(result, ActionResult::failed(UPLOAD_FAILED));
        assert!(actions.list_projects().is_empty());
        assert_eq!(
            actions.upload_thumbnail(Some(&s), &image),
            Err(ActionResult::failed(UPLOAD_FAILED))
        );
    }

    #[test]
    fn dashboard_removes_only_after_confirmed_delete() {
        let dir = tempfile::tempdir().unwrap();
        let actions = actions(dir.path());
        let s = session();
        actions.create_project(Some(&s), &form("Obsidian Dreams", "https://x/5.jpg"));
        actions.create_project(Some(&s), &form("Abstract Echoes", "https://x/7.jpg"));
        let mut dash = AdminDashboard::new(actions.list_projects());
        let victim = dash.projects[1].id.clone();

        actions.repo().fail_writes.set(true);
        let result = dash.delete(&actions, Some(&s), &victim);
        assert!(!result.success);
        assert_eq!(dash.alert.as_deref(), Some(DELETE_FAILED));
        assert_eq!(dash.projects.len(), 2);
        assert!(!dash.loading);

        actions.repo().fail_writes.set(false);
        dash.selected = 1;
        let result = dash.delete(&actions, Some(&s), &victim);
        assert!(result.success);
        assert!(dash.alert.is_none());
        assert_eq!(dash.projects.len(), 1);
        assert!(dash.projects.iter().all(|p| p.id != victim));
        assert_eq!(dash.selected, 0);
        assert_eq!(actions.list_projects().len(), 1);
    }

    #[test]
    fn dashboard_create_failure_keeps_list() {
        let dir = tempfile::tempdir().unwrap();
        let actions = actions(dir.path());
        let s = session();
        let mut dash = AdminDashboard::new(Vec::new());

        assert!(dash.create(&actions, Some(&s), &form("Temporal Shift", "https://x/8.jpg")).success);
        assert_eq!(dash.projects.len(), 1);

        actions.repo().fail_writes.set(true);
        let result = dash.create(&actions, Some(&s), &form("Dark Matter", "https://x/3.jpg"));
        assert_eq!(result, ActionResult::failed(CREATE_FAILED));
        assert_eq!(dash.projects.len(), 1);
        assert_eq!(dash.alert.as_deref(), Some(CREATE_FAILED));
    }

    #[test]
    fn delete_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let actions = actions(dir.path());
        let result = actions.delete_project(Some(&session()), "does-not-exist");
        assert_eq!(result, ActionResult::failed(DELETE_FAILED));
    }
}
