//! PageTokenStore — remembers which continuation token follows each page.
//!
//! The entry for page `p` is the token that produced page `p + 1`. Entries are
//! overwritten on every request for `p` and live for the whole process.

use dashmap::DashMap;
use std::sync::Arc;

/// Shared, concurrent page-number to continuation-token map.
///
/// Cloning yields another handle onto the same map.
#[derive(Clone, Debug, Default)]
pub struct PageTokenStore {
    tokens: Arc<DashMap<u32, String>>,
}

impl PageTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the token that follows `page`.
    pub fn put(&self, page: u32, token: impl Into<String>) {
        self.tokens.insert(page, token.into());
    }

    /// Token that follows `page`, if that page was ever fetched.
    pub fn get(&self, page: u32) -> Option<String> {
        self.tokens.get(&page).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_was_put() {
        let store = PageTokenStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(1), None);

        store.put(1, "T1");
        assert_eq!(store.get(1).as_deref(), Some("T1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let store = PageTokenStore::new();
        store.put(3, "old");
        store.put(3, "new");
        assert_eq!(store.get(3).as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_tokens_are_stored() {
        let store = PageTokenStore::new();
        store.put(7, "");
        assert_eq!(store.get(7).as_deref(), Some(""));
    }

    #[test]
    fn clones_share_state() {
        let store = PageTokenStore::new();
        let other = store.clone();
        other.put(2, "shared");
        assert_eq!(store.get(2).as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn concurrent_writers_never_tear_values() {
        let store = PageTokenStore::new();
        let mut handles = Vec::new();
        for writer in 0..16u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for page in 0..64u32 {
                    store.put(page, format!("w{writer}-p{page}"));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 64);
        for page in 0..64u32 {
            let token = store.get(page).unwrap();
            assert!(token.starts_with('w'));
            assert!(token.ends_with(&format!("-p{page}")));
        }
    }
}
