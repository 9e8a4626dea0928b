//! src/services/listing_service.rs
//!
//! ListingService — turns the backend's token-based listing into numbered
//! pages with next/previous links. The backend only ever hands out the *next*
//! token, so the previous link is rebuilt from the `PageTokenStore`: the token
//! that leads to page `p - 1` was stored when page `p - 2` was fetched.

use std::sync::Arc;

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::{
    errors::ListingResult,
    models::listing::{ListingRequest, ListingResponse},
    services::{lister::ObjectLister, page_tokens::PageTokenStore},
};

/// Pagination coordinator shared by all requests.
#[derive(Clone)]
pub struct ListingService {
    lister: Arc<dyn ObjectLister>,
    tokens: PageTokenStore,
    prefix: String,
    public_url: String,
}

impl ListingService {
    /// `public_url` is the scheme and authority prepended to generated links,
    /// e.g. `http://localhost:8080`.
    pub fn new(
        lister: Arc<dyn ObjectLister>,
        tokens: PageTokenStore,
        prefix: impl Into<String>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            lister,
            tokens,
            prefix: prefix.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn lister(&self) -> &Arc<dyn ObjectLister> {
        &self.lister
    }

    /// Fetch exactly one page and derive its navigation links.
    ///
    /// `path` is the request path the links point back to.
    pub async fn list_page(
        &self,
        path: &str,
        request: ListingRequest,
    ) -> ListingResult<ListingResponse> {
        let ListingRequest { page, limit, .. } = request;
        debug!(
            page,
            limit,
            has_token = request.continuation_token.is_some(),
            "listing page"
        );

        let listed = self
            .lister
            .list_page(&self.prefix, limit, request.token())
            .await
            .inspect_err(|err| warn!(page, limit, "upstream listing failed: {err}"))?;

        self.tokens.put(page, listed.next_token.clone());

        let next_page = (!listed.next_token.is_empty()).then(|| {
            let next = u64::from(page) + 1;
            self.link(path, next, limit, Some(listed.next_token.as_str()))
        });
        let prev_page = self.previous_link(path, page, limit);

        let total = listed.entries.len();
        debug!(page, total, cached_pages = self.tokens.len(), "page listed");

        Ok(ListingResponse {
            limit,
            next_page,
            page,
            prev_page,
            results: listed.entries,
            total,
        })
    }

    fn previous_link(&self, path: &str, page: u32, limit: u32) -> Option<String> {
        match page {
            0 | 1 => None,
            // The first page is always fetched without a token.
            2 => Some(self.link(path, 1, limit, None)),
            _ => {
                let token = self.tokens.get(page - 2)?;
                Some(self.link(path, u64::from(page - 1), limit, Some(token.as_str())))
            }
        }
    }

    fn link(&self, path: &str, page: u64, limit: u32, token: Option<&str>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        if let Some(token) = token {
            query.append_pair("pageToken", token);
        }
        format!("{}{}?{}", self.public_url, path, query.finish())
    }
}
