//! The storage backend seam: anything that can fetch one page of object names.

use async_trait::async_trait;

use crate::{errors::ListingResult, models::object::ObjectEntry};

/// One page as returned by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedPage {
    /// Entries in backend order.
    pub entries: Vec<ObjectEntry>,
    /// Token for the following page; empty when the listing is exhausted.
    pub next_token: String,
}

/// Lists objects of a single, preconfigured bucket.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch at most `limit` entries under `prefix`, resuming at
    /// `continuation_token` (empty for the first page).
    async fn list_page(
        &self,
        prefix: &str,
        limit: u32,
        continuation_token: &str,
    ) -> ListingResult<ListedPage>;

    /// Check that the backend can be reached with the configured credentials.
    async fn ready(&self) -> ListingResult<()> {
        Ok(())
    }
}
