//! Request and response shapes for `GET /list`.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::object::ObjectEntry;

/// Page size used when `limit` is absent, unparsable, or not positive.
/// Values that do not fit in a `u32` count as unparsable.
pub const DEFAULT_LIMIT: u32 = 10;

/// Page number used when `page` is absent, unparsable, or not positive.
/// Values that do not fit in a `u32` count as unparsable.
pub const DEFAULT_PAGE: u32 = 1;

/// Raw query parameters as they arrive on the wire.
///
/// Values are kept as strings so malformed input can be corrected to defaults
/// instead of being rejected.
#[derive(Debug, Default)]
pub struct ListingQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub page_token: Option<String>,
}

impl ListingQuery {
    /// Parse a raw query string. The first occurrence of each key wins and
    /// unknown keys are ignored; invalid percent-encoding is decoded lossily.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            let slot = match key.as_ref() {
                "limit" => &mut query.limit,
                "page" => &mut query.page,
                "pageToken" => &mut query.page_token,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// A normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// 1-based page number used for navigation links.
    pub page: u32,
    /// Maximum number of entries to fetch.
    pub limit: u32,
    /// Backend continuation token; `None` for the first page.
    pub continuation_token: Option<String>,
}

impl ListingRequest {
    pub fn new(page: u32, limit: u32, continuation_token: Option<String>) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            continuation_token: continuation_token.filter(|t| !t.is_empty()),
        }
    }

    /// The token to hand to the backend; empty means "start from the beginning".
    pub fn token(&self) -> &str {
        self.continuation_token.as_deref().unwrap_or("")
    }
}

impl From<ListingQuery> for ListingRequest {
    fn from(q: ListingQuery) -> Self {
        Self {
            page: parse_positive(q.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(q.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
            continuation_token: q.page_token.filter(|t| !t.is_empty()),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// One page of listing results plus navigation links.
///
/// Absent links serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingResponse {
    pub limit: u32,
    pub next_page: Option<String>,
    pub page: u32,
    pub prev_page: Option<String>,
    pub results: Vec<ObjectEntry>,
    /// Number of entries in `results`; never a bucket-wide count.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, page: Option<&str>, token: Option<&str>) -> ListingQuery {
        ListingQuery {
            limit: limit.map(String::from),
            page: page.map(String::from),
            page_token: token.map(String::from),
        }
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let req = ListingRequest::from(ListingQuery::default());
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
        assert_eq!(req.continuation_token, None);
        assert_eq!(req.token(), "");
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        for bad in ["abc", "", "-3", "0", "1.5", "99999999999"] {
            let req = ListingRequest::from(query(Some(bad), Some(bad), None));
            assert_eq!(req.limit, DEFAULT_LIMIT, "limit for {bad:?}");
            assert_eq!(req.page, DEFAULT_PAGE, "page for {bad:?}");
        }
    }

    #[test]
    fn valid_values_are_kept() {
        let req = ListingRequest::from(query(Some("25"), Some(" 4 "), Some("tok")));
        assert_eq!(req.limit, 25);
        assert_eq!(req.page, 4);
        assert_eq!(req.token(), "tok");
    }

    #[test]
    fn empty_page_token_is_treated_as_absent() {
        let req = ListingRequest::from(query(None, None, Some("")));
        assert_eq!(req.continuation_token, None);
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let raw = "limit=5&limit=6&page=2&page=x&pageToken=a&pageToken=b";
        let q = ListingQuery::parse(Some(raw));
        assert_eq!(q.limit.as_deref(), Some("5"));
        assert_eq!(q.page.as_deref(), Some("2"));
        assert_eq!(q.page_token.as_deref(), Some("a"));
    }

    #[test]
    fn garbled_query_strings_parse_leniently() {
        for raw in ["%zz=1&&=&limit", "limit=%FF", "&&&", "page==3"] {
            let req = ListingRequest::from(ListingQuery::parse(Some(raw)));
            assert_eq!(req.limit, DEFAULT_LIMIT, "limit for {raw:?}");
            assert_eq!(req.page, DEFAULT_PAGE, "page for {raw:?}");
        }
        let req = ListingRequest::from(ListingQuery::parse(None));
        assert_eq!(req, ListingRequest::new(1, 10, None));
    }

    #[test]
    fn token_is_percent_decoded() {
        let q = ListingQuery::parse(Some("pageToken=Cg%2Ba%2Fb%3D%3D&unknown=1"));
        assert_eq!(q.page_token.as_deref(), Some("Cg+a/b=="));
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let req = ListingRequest::from(query(Some("5000000000"), Some("5000000000"), None));
        assert_eq!(req.page, DEFAULT_PAGE);
        assert_eq!(req.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn constructor_normalizes_zeroes() {
        let req = ListingRequest::new(0, 0, Some(String::new()));
        assert_eq!(req, ListingRequest::new(1, 10, None));
    }

    #[test]
    fn response_serializes_absent_links_as_null() {
        let resp = ListingResponse {
            limit: 10,
            next_page: None,
            page: 1,
            prev_page: None,
            results: vec![],
            total: 0,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "limit": 10,
                "next_page": null,
                "page": 1,
                "prev_page": null,
                "results": [],
                "total": 0
            })
        );
    }
}
