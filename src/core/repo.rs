//! Project repository contract and its SQLite implementation.
//!
//! Write paths validate the draft before touching SQL; read paths reject
//! rows that cannot be decoded instead of papering over them.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::error::{RepoError, RepoResult};
use super::project::{new_slug, Project, ProjectDraft, DEMO_PROJECTS};

const PROJECT_SELECT_SQL: &str = "SELECT
    id, slug, title, description, category, year, thumbnail, created_at, updated_at
FROM projects";

/// CRUD over project records.
pub trait ProjectRepository {
    /// All projects, newest first.
    fn list(&self) -> RepoResult<Vec<Project>>;
    fn get_by_slug(&self, slug: &str) -> RepoResult<Option<Project>>;
    fn get_by_id(&self, id: &str) -> RepoResult<Option<Project>>;
    fn create(&self, draft: &ProjectDraft) -> RepoResult<Project>;
    /// Fails with [`RepoError::NotFound`] when nothing was deleted.
    fn delete(&self, id: &str) -> RepoResult<()>;
}

pub struct SqliteProjectRepository {
    conn: Connection,
}

impl SqliteProjectRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Insert the demo collection when the table is empty.  Returns how
    /// many rows were inserted.
    pub fn seed_demo_projects(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }

        // Oldest demo entry first so `list()` shows them in catalogue order.
        let base = Utc::now().timestamp_millis();
        let total = DEMO_PROJECTS.len();
        for (i, (slug, title, category, year, description)) in DEMO_PROJECTS.iter().enumerate() {
            let created = base - (total - i) as i64;
            self.conn.execute(
                "INSERT INTO projects (
                    id, slug, title, description, category, year, thumbnail, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8);",
                params![
                    Uuid::new_v4().to_string(),
                    slug,
                    title,
                    description,
                    category,
                    year,
                    format!("/thumbnails/{:02}.jpg", i + 1),
                    created,
                ],
            )?;
        }
        tracing::info!(count = total, "seeded demo projects");
        Ok(total)
    }
}

impl ProjectRepository for SqliteProjectRepository {
    fn list(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(parse_project_row(row)?);
        }
        Ok(out)
    }

    fn get_by_slug(&self, slug: &str) -> RepoResult<Option<Project>> {
        self.get_where("slug", slug)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Project>> {
        self.get_where("id", id)
    }

    fn create(&self, draft: &ProjectDraft) -> RepoResult<Project> {
        draft.validate()?;
        let draft = draft.trimmed();

        let now = now_millis();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            slug: new_slug(&draft.title, now),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            year: draft.year,
            thumbnail: draft.thumbnail,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO projects (
                id, slug, title, description, category, year, thumbnail, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                project.id,
                project.slug,
                project.title,
                project.description,
                project.category,
                project.year,
                project.thumbnail,
                project.created_at.timestamp_millis(),
                project.updated_at.timestamp_millis(),
            ],
        )?;

        tracing::info!(id = %project.id, slug = %project.slug, "project created");
        Ok(project)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        tracing::info!(id, "project deleted");
        Ok(())
    }
}

impl SqliteProjectRepository {
    fn get_where(&self, column: &'static str, value: &str) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE {column} = ?1;"))?;
        let row = stmt
            .query_row(params![value], |row| Ok(parse_project_row(row)))
            .optional()?;
        row.transpose()
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let created: i64 = row.get(7)?;
    let updated: i64 = row.get(8)?;
    Ok(Project {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        year: row.get(5)?,
        thumbnail: row.get(6)?,
        created_at: millis_to_datetime(created)?,
        updated_at: millis_to_datetime(updated)?,
    })
}

/// Current time truncated to the millisecond precision stored on disk.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn millis_to_datetime(ms: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp out of range: {ms}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::open_db_in_memory;
    use crate::core::error::ValidationError;

    fn repo() -> SqliteProjectRepository {
        SqliteProjectRepository::new(open_db_in_memory().unwrap())
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            description: "desc".into(),
            category: "Showcase".into(),
            year: "2024".into(),
            thumbnail: "https://cdn.example.com/a.jpg".into(),
        }
    }

    #[test]
    fn create_then_lookup_by_slug_and_id() {
        let repo = repo();
        let created = repo.create(&draft("Ethereal Forms")).unwrap();
        assert!(created.slug.starts_with("ethereal-forms-"));
        assert!(created.slug["ethereal-forms-".len()..].parse::<i64>().is_ok());

        let by_slug = repo.get_by_slug(&created.slug).unwrap().unwrap();
        assert_eq!(by_slug, created);
        let by_id = repo.get_by_id(&created.id).unwrap().unwrap();
        assert_eq!(by_id.slug, created.slug);
        assert!(repo.get_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let repo = repo();
        let a = repo.create(&draft("First")).unwrap();
        let b = repo.create(&draft("Second")).unwrap();
        let c = repo.create(&draft("Third")).unwrap();
        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn create_rejects_missing_fields() {
        let repo = repo();
        let mut d = draft("Untitled");
        d.year = " ".into();
        let err = repo.create(&d).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::MissingField("year"))
        ));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_id_is_not_found() {
        let repo = repo();
        let p = repo.create(&draft("Doomed")).unwrap();
        repo.delete(&p.id).unwrap();
        assert!(matches!(repo.delete(&p.id), Err(RepoError::NotFound(_))));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn duplicate_slug_is_a_storage_error() {
        let repo = repo();
        let p = repo.create(&draft("Twin")).unwrap();
        let err = repo
            .conn
            .execute(
                "INSERT INTO projects VALUES ('x', ?1, 't', 'd', 'c', 'y', 'u', 0, 0);",
                params![p.slug],
            )
            .map_err(RepoError::from)
            .unwrap_err();
        assert!(matches!(err, RepoError::Storage(_)));
    }

    #[test]
    fn seeding_only_fills_an_empty_table() {
        let repo = repo();
        assert_eq!(repo.seed_demo_projects().unwrap(), DEMO_PROJECTS.len());
        assert_eq!(repo.seed_demo_projects().unwrap(), 0);
        let list = repo.list().unwrap();
        assert_eq!(list.first().unwrap().slug, "temporal-shift");
        assert_eq!(list.last().unwrap().slug, "ethereal-forms");
        assert!(repo.get_by_slug("dark-matter").unwrap().is_some());
    }
}
