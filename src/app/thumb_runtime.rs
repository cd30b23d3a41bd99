//! Background thumbnail decoding to keep the UI thread responsive.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

/// Longest edge kept after decoding; cards never need more.
const MAX_EDGE: u32 = 320;

pub struct ThumbUpdate {
    /// The project's thumbnail URL, used as the cache key.
    pub url: String,
    pub result: Result<Arc<image::RgbaImage>, String>,
}

pub fn spawn_decode(tx: mpsc::UnboundedSender<ThumbUpdate>, url: String, path: PathBuf) {
    std::thread::spawn(move || {
        let result = image::open(&path)
            .map(|img| Arc::new(img.thumbnail(MAX_EDGE, MAX_EDGE).to_rgba8()))
            .map_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "thumbnail decode failed");
                e.to_string()
            });
        let _ = tx.send(ThumbUpdate { url, result });
    });
}
