//! Error taxonomy for the data layer.
//!
//! Animation code never returns these; it degrades to fallback values.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

/// Repository failures.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("invalid stored data: {0}")]
    InvalidData(String),
    #[error("project not found: {0}")]
    NotFound(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Object store failures.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("object `{0}` already exists")]
    Conflict(String),
    #[error("unsupported content type `{0}`; only images may be uploaded")]
    UnsupportedType(String),
    #[error("upload i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("no admin account is configured")]
    NotConfigured,
    #[error("an authenticated session is required")]
    Unauthenticated,
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("{0} is handled by the external identity provider")]
    Unsupported(&'static str),
}

/// Any data-layer failure.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
