//! Revocable handles to in-memory image bytes.
//!
//! A [`LocalReference`] plays the part of a browser object URL: something a
//! view can point at to display bytes without copying them. References are
//! deliberately not `Clone`, and [`ReferenceRegistry::revoke`] takes the
//! handle by value, so a reference can be revoked at most once.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LocalReference {
    id: Uuid,
}

impl LocalReference {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for LocalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:nobg/{}", self.id)
    }
}

/// Bytes behind a live reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime_type: String,
}

/// Owner of every live reference.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    entries: HashMap<Uuid, Blob>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, bytes: Bytes, mime_type: impl Into<String>) -> LocalReference {
        let id = Uuid::new_v4();
        let blob = Blob {
            bytes,
            mime_type: mime_type.into(),
        };
        log::debug!(
            "Created reference {} ({} bytes, {})",
            id,
            blob.bytes.len(),
            blob.mime_type
        );
        self.entries.insert(id, blob);
        LocalReference { id }
    }

    pub fn get(&self, reference: &LocalReference) -> Option<&Blob> {
        self.entries.get(&reference.id)
    }

    /// Release the bytes behind `reference`.
    ///
    /// Returns `false` if the registry no longer knew the reference.
    pub fn revoke(&mut self, reference: LocalReference) -> bool {
        let removed = self.entries.remove(&reference.id).is_some();
        if removed {
            log::debug!("Revoked reference {}", reference.id);
        } else {
            log::warn!("Reference {} was not live when revoked", reference.id);
        }
        removed
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of references that have not been revoked yet
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}
