//! Object storage for uploaded thumbnails.
//!
//! [`FsObjectStore`] keeps objects as files under one directory and hands
//! out public URLs rooted at a configurable base.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::error::UploadError;

pub trait ObjectStore {
    /// Store `bytes` under a collision-free key derived from `filename`
    /// and return its public URL.
    fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError>;

    /// Local file backing a public URL, if this store owns it.
    fn resolve(&self, url: &str) -> Option<PathBuf>;
}

/// Keep ASCII alphanumerics and `.` only.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// `<random token>-<sanitized name>`.
pub fn object_key(filename: &str) -> String {
    format!("{}-{}", Uuid::new_v4().simple(), sanitize_filename(filename))
}

/// Content-based MIME detection; only images pass.
///
/// Falls back to the image decoder's signature table when the system MIME
/// database has no opinion.
fn sniff_image(bytes: &[u8]) -> Result<String, UploadError> {
    let mime = tree_magic_mini::from_u8(bytes);
    if mime.starts_with("image/") {
        return Ok(mime.to_string());
    }
    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .map_err(|_| UploadError::UnsupportedType(mime.to_string()))
}

pub struct FsObjectStore {
    root: PathBuf,
    public_base: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            public_base,
        }
    }

    /// Write under an explicit key; `upload` picks the key for you.
    pub fn put(&self, key: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let mime = sniff_image(bytes)?;

        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(key);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(UploadError::Conflict(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            // Don't leave a truncated object behind.
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }

        tracing::info!(key, mime = %mime, bytes = bytes.len(), "object stored");
        Ok(format!("{}/{}", self.public_base, key))
    }
}

impl ObjectStore for FsObjectStore {
    fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError> {
        self.put(&object_key(filename), bytes)
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let Some(rest) = url.strip_prefix(self.public_base.as_str()) else {
            // Thumbnails may also point straight at a local file.
            let local = Path::new(url);
            return local.is_file().then(|| local.to_path_buf());
        };
        let key = rest.strip_prefix('/')?;
        if key.is_empty() || key.contains('/') || key.contains("..") {
            return None;
        }
        let path = self.root.join(key);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG signature + IHDR prefix; enough for magic sniffing.
    const PNG: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0,
        0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0,
    ];

    #[test]
    fn sanitize_keeps_alphanumerics_and_dots() {
        assert_eq!(sanitize_filename("my photo (1).JPG"), "myphoto1.JPG");
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("日本.png"), ".png");
        assert_eq!(sanitize_filename("///"), "upload");
    }

    #[test]
    fn keys_are_prefixed_with_a_random_token() {
        let a = object_key("a.png");
        let b = object_key("a.png");
        assert_ne!(a, b);
        let (token, name) = a.split_once('-').unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(name, "a.png");
    }

    #[test]
    fn upload_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path().join("objects"), "https://cdn.example.com/");
        let url = store.upload("cover image.png", PNG).unwrap();
        assert!(url.starts_with("https://cdn.example.com/"));
        assert!(url.ends_with("-coverimage.png"));

        let path = store.resolve(&url).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), PNG);
        assert!(store.resolve("https://elsewhere.example.com/x.png").is_none());
        assert!(store.resolve("https://cdn.example.com/../secret").is_none());
    }

    #[test]
    fn existing_key_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "/objects");
        store.put("fixed.png", PNG).unwrap();
        assert!(matches!(
            store.put("fixed.png", PNG),
            Err(UploadError::Conflict(k)) if k == "fixed.png"
        ));
    }

    #[test]
    fn non_images_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path(), "/objects");
        let err = store.upload("notes.txt", b"just some text\n").unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
