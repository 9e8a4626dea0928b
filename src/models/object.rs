//! Represents an object (file) returned by a bucket listing.

use serde::{Deserialize, Serialize};

/// A single object within a listed page.
///
/// Only the object name is exposed; entries keep the order the storage backend
/// returned them in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full object name (path-like identifier within the bucket).
    pub name: String,
}

impl ObjectEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
