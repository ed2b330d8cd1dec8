use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use iced::widget::image::Handle;

use crate::error::ApiError;

pub const DEFAULT_IMAGE_BASE: &str = "https://phimimg.com";
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/300x450/141414/b3b3b3?text=No+Image";

/// Resolves a catalog image path to a fetchable URL.
///
/// Absolute URLs pass through, bare paths are joined to the image CDN and an
/// empty path maps to the placeholder.
pub fn image_url(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::from(PLACEHOLDER_IMAGE);
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn simple_hash(s: &str) -> String {
    let mut hash: u64 = 5381;
    for byte in s.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    format!("{:016x}", hash)
}

fn default_cache_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".cache")
            .join("phimdeck")
            .join("images")
    })
}

pub async fn fetch_image_bytes(url: String) -> Result<Vec<u8>, ApiError> {
    let response = reqwest::get(&url).await?;
    match response.status().as_u16() {
        404 => return Err(ApiError::NotFound),
        s if s >= 400 => return Err(ApiError::Status(s)),
        _ => {}
    }
    Ok(response.bytes().await?.to_vec())
}

/// In-memory image handles backed by a flat on-disk cache.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    base_url: String,
    handles: HashMap<String, Handle>,
    pending: HashSet<String>,
    cache_directory: Option<PathBuf>,
}

impl ImageCache {
    pub fn new(base_url: &str) -> Self {
        Self::with_directory(base_url, default_cache_dir())
    }

    pub fn with_directory(base_url: &str, cache_directory: Option<PathBuf>) -> Self {
        if let Some(ref dir) = cache_directory {
            if let Err(error) = std::fs::create_dir_all(dir) {
                tracing::warn!(%error, dir = %dir.display(), "image cache directory unavailable");
            }
        }
        Self {
            base_url: base_url.to_string(),
            handles: HashMap::new(),
            pending: HashSet::new(),
            cache_directory,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        image_url(&self.base_url, path)
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.handles.get(url)
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.pending.remove(&url);
        self.handles.insert(url, handle);
    }

    pub fn fail(&mut self, url: &str) {
        self.pending.remove(url);
    }

    /// Marks `url` as requested; returns `false` if it is already loaded or
    /// in flight.
    pub fn begin_load(&mut self, url: &str) -> bool {
        if self.handles.contains_key(url) || self.pending.contains(url) {
            return false;
        }
        self.pending.insert(url.to_string());
        true
    }

    pub fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_directory
            .as_ref()
            .map(|dir| dir.join(simple_hash(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_rewrites_relative_paths_only() {
        let base = "https://phimimg.com/";
        assert_eq!(
            image_url(base, "upload/vod/poster.jpg"),
            "https://phimimg.com/upload/vod/poster.jpg"
        );
        assert_eq!(
            image_url(base, "https://img.example/a.jpg"),
            "https://img.example/a.jpg"
        );
        assert_eq!(image_url(base, "  "), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn begin_load_deduplicates_requests() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ImageCache::with_directory(DEFAULT_IMAGE_BASE, Some(dir.path().to_path_buf()));
        let url = cache.url_for("upload/a.jpg");

        assert!(cache.begin_load(&url));
        assert!(!cache.begin_load(&url));
        cache.fail(&url);
        assert!(cache.begin_load(&url));

        cache.insert(url.clone(), Handle::from_bytes(vec![0u8; 4]));
        assert!(!cache.begin_load(&url));
        assert!(cache.get(&url).is_some());
    }

    #[test]
    fn cache_paths_are_stable_per_url() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::with_directory(DEFAULT_IMAGE_BASE, Some(dir.path().to_path_buf()));
        let a = cache.cache_path("https://phimimg.com/a.jpg");
        assert_eq!(a, cache.cache_path("https://phimimg.com/a.jpg"));
        assert_ne!(a, cache.cache_path("https://phimimg.com/b.jpg"));
        assert!(a.unwrap().starts_with(dir.path()));
    }
}
