//! In-memory blobs and object-scoped references to them
//!
//! A [`BlobStore`] hands out `blob:` URLs for byte buffers so that the engine
//! and the surface can resolve them later. Each URL is owned by an
//! [`ObjectUrl`] guard and stops resolving as soon as the guard is dropped.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// MIME type of SVG documents
pub const SVG_MIME: &str = "image/svg+xml";

/// MIME type of PNG images
pub const PNG_MIME: &str = "image/png";

const URL_PREFIX: &str = "blob:qrforge/";

/// Immutable bytes tagged with a content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    mime: String,
}

impl Blob {
    /// Wrap bytes with the given MIME type
    pub fn new(bytes: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// Blob contents
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Declared content type
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Shared registry of live object URLs
#[derive(Clone, Default)]
pub struct BlobStore {
    entries: Arc<Mutex<HashMap<String, Blob>>>,
}

impl BlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return the guard owning its URL.
    pub fn create_object_url(&self, blob: Blob) -> ObjectUrl {
        let url = format!("{URL_PREFIX}{}", Uuid::new_v4());
        tracing::trace!(%url, mime = blob.mime(), bytes = blob.len(), "Created object URL");
        self.lock().insert(url.clone(), blob);
        ObjectUrl {
            url,
            store: self.clone(),
        }
    }

    /// Look up the blob behind a URL, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Number of URLs currently registered
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url).is_some() {
            tracing::trace!(%url, "Revoked object URL");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning handle for a registered `blob:` URL; revokes it on drop
pub struct ObjectUrl {
    url: String,
    store: BlobStore,
}

impl ObjectUrl {
    /// The URL string
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_resolves_until_dropped() {
        let store = BlobStore::new();
        let url = store.create_object_url(Blob::new(&b"<svg/>"[..], SVG_MIME));
        let key = url.as_str().to_string();

        assert!(key.starts_with("blob:qrforge/"));
        let blob = store.resolve(&key).expect("live blob");
        assert_eq!(blob.mime(), SVG_MIME);
        assert_eq!(blob.bytes().as_ref(), b"<svg/>");

        drop(url);
        assert!(store.resolve(&key).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn urls_are_unique() {
        let store = BlobStore::new();
        let a = store.create_object_url(Blob::new(Bytes::new(), PNG_MIME));
        let b = store.create_object_url(Blob::new(Bytes::new(), PNG_MIME));
        assert_ne!(a.as_str(), b.as_str());
        assert_eq!(store.live_count(), 2);
    }
}
