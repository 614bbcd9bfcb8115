//! URL-keyed image cache for collage slots.
//!
//! Decoding happens outside the core. The cache only records what is known
//! about each URL so a slot can render a placeholder while loading, and so
//! the same URL is never fetched twice.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageState {
    Loading,
    Loaded { width: f64, height: f64 },
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, url: &str) -> Option<ImageState> {
        self.entries.get(url).copied()
    }

    /// Natural size of a loaded image.
    pub fn loaded_size(&self, url: &str) -> Option<(f64, f64)> {
        match self.entries.get(url) {
            Some(ImageState::Loaded { width, height }) => Some((*width, *height)),
            _ => None,
        }
    }

    /// Mark `url` as requested. Returns `true` when the caller must start a
    /// fetch, `false` when the URL is already loading, loaded, or failed.
    pub fn request(&mut self, url: &str) -> bool {
        if url.is_empty() || self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), ImageState::Loading);
        true
    }

    /// Record the outcome of a fetch. Returns `true` when the state changed,
    /// meaning composites showing this URL should be re-rendered.
    pub fn resolve(&mut self, url: &str, result: Result<(f64, f64), String>) -> bool {
        let next = match result {
            Ok((width, height)) if width > 0.0 && height > 0.0 => ImageState::Loaded { width, height },
            Ok(_) => {
                log::warn!("image {url} decoded with an empty size");
                ImageState::Failed
            }
            Err(err) => {
                log::warn!("image {url} failed to load: {err}");
                ImageState::Failed
            }
        };
        self.entries.insert(url.to_string(), next) != Some(next)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_only_once() {
        let mut cache = ImageCache::new();
        assert!(cache.request("a.png"));
        assert!(!cache.request("a.png"));
        assert_eq!(cache.state("a.png"), Some(ImageState::Loading));
    }

    #[test]
    fn resolve_reports_change() {
        let mut cache = ImageCache::new();
        cache.request("a.png");
        assert!(cache.resolve("a.png", Ok((640.0, 480.0))));
        assert!(!cache.resolve("a.png", Ok((640.0, 480.0))));
        assert_eq!(cache.loaded_size("a.png"), Some((640.0, 480.0)));
    }

    #[test]
    fn failures_are_cached() {
        let mut cache = ImageCache::new();
        cache.request("b.png");
        cache.resolve("b.png", Err("404".into()));
        assert_eq!(cache.state("b.png"), Some(ImageState::Failed));
        assert!(!cache.request("b.png"));
    }
}
