//! Project record, draft input, and slug derivation.

use chrono::{DateTime, Utc};

use super::error::ValidationError;

/// Suggested categories.  The stored category is an open string.
pub const CATEGORIES: &[&str] = &["Collection", "Showcase", "Detail"];

/// A persisted portfolio entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    /// Unique, URL-safe, fixed at creation.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub year: String,
    /// Public URL of the thumbnail image.
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied fields for a new project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub year: String,
    pub thumbnail: String,
}

impl ProjectDraft {
    /// Every field is required; whitespace-only counts as missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("year", &self.year),
            ("thumbnail", &self.thumbnail),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            year: self.year.trim().to_string(),
            thumbnail: self.thumbnail.trim().to_string(),
        }
    }
}

/// `"Ethereal Forms"` at millis `1700000000000` → `"ethereal-forms-1700000000000"`.
pub fn slug_for(title: &str, suffix: i64) -> String {
    let base: String = title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("{base}-{suffix}")
}

/// Slug using the current time as the disambiguating suffix.
pub fn new_slug(title: &str, now: DateTime<Utc>) -> String {
    slug_for(title, now.timestamp_millis())
}

// ───────────────────────────────────────── demo content ──────

/// `(slug, title, category, year, description)` for the demo collection.
pub const DEMO_PROJECTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "ethereal-forms",
        "Ethereal Forms",
        "Collection",
        "2024",
        "An exploration of weightless structures suspended in darkness. Forms emerge and dissolve, questioning the boundaries between presence and absence.",
    ),
    (
        "silent-geometry",
        "Silent Geometry",
        "Showcase",
        "2024",
        "Geometric compositions in muted tones. Each shape exists in quiet conversation with empty space, creating rhythms of visual silence.",
    ),
    (
        "dark-matter",
        "Dark Matter",
        "Collection",
        "2023",
        "Studies in the invisible. These works examine what lies between, the unseen forces that shape form without revealing themselves.",
    ),
    (
        "void-symphony",
        "Void Symphony",
        "Detail",
        "2023",
        "A meditation on emptiness as composition. The void becomes the primary instrument, orchestrating moments of visual resonance.",
    ),
    (
        "obsidian-dreams",
        "Obsidian Dreams",
        "Showcase",
        "2023",
        "Deep blacks and glinting edges. These pieces explore the reflective nature of darkness and the dreams that emerge from it.",
    ),
    (
        "frozen-light",
        "Frozen Light",
        "Collection",
        "2022",
        "Light captured in stillness. A study of luminescence suspended in time, where photons become sculpture.",
    ),
    (
        "abstract-echoes",
        "Abstract Echoes",
        "Detail",
        "2022",
        "Reverberations of form across space. Each echo slightly altered, creating visual conversations between iterations.",
    ),
    (
        "temporal-shift",
        "Temporal Shift",
        "Collection",
        "2022",
        "Time made visible. These works compress and expand temporal experience, revealing the elasticity of moments.",
    ),
];
