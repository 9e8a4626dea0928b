//! src/services/gcs.rs
//!
//! GcsLister — lists a Google Cloud Storage bucket through the JSON API
//! (`GET /storage/v1/b/{bucket}/o`). Requests are anonymous unless a
//! service-account key file is configured, in which case a signed JWT
//! assertion is exchanged for a bearer token that is cached until shortly
//! before it expires.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::{
    errors::{ListingError, ListingResult},
    models::object::ObjectEntry,
    services::lister::{ListedPage, ObjectLister},
};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a service-account key file this lister needs.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_stale(&self) -> bool {
        Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Body of a `storage#objects` listing response. Both fields are omitted by
/// the API when empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectsResponse {
    #[serde(default)]
    items: Vec<ObjectEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Lists one bucket through the GCS JSON API.
pub struct GcsLister {
    http: Client,
    objects_url: Url,
    credentials_file: Option<PathBuf>,
    cached_token: RwLock<Option<AccessToken>>,
}

impl GcsLister {
    /// Build a lister for `bucket` served from `endpoint`.
    ///
    /// Fails only when `endpoint` is not a usable base URL.
    pub fn new(
        http: Client,
        endpoint: &str,
        bucket: &str,
        credentials_file: Option<PathBuf>,
    ) -> Result<Self, url::ParseError> {
        let mut objects_url = Url::parse(endpoint)?;
        objects_url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o"]);

        Ok(Self {
            http,
            objects_url,
            credentials_file,
            cached_token: RwLock::new(None),
        })
    }

    /// Bearer token for the next request, or `None` for anonymous access.
    async fn access_token(&self) -> ListingResult<Option<String>> {
        let Some(path) = self.credentials_file.as_deref() else {
            return Ok(None);
        };

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| !t.is_stale()) {
                return Ok(Some(token.token.clone()));
            }
        }

        let mut cached = self.cached_token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| !t.is_stale()) {
            return Ok(Some(token.token.clone()));
        }

        let fresh = self.fetch_access_token(path).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(Some(token))
    }

    async fn fetch_access_token(&self, path: &Path) -> ListingResult<AccessToken> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ListingError::Credentials(format!("reading {}: {e}", path.display()))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            ListingError::Credentials(format!("parsing {}: {e}", path.display()))
        })?;

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: READ_ONLY_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ListingError::Credentials(format!("invalid private key: {e}")))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| ListingError::Credentials(format!("signing assertion: {e}")))?;

        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];
        let response = self
            .http
            .post(&key.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(|e| ListingError::Credentials(format!("token exchange: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Credentials(format!(
                "token exchange failed with status {status}: {body}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ListingError::Credentials(format!("decoding token response: {e}")))?;

        info!(account = %key.client_email, "obtained storage access token");
        Ok(AccessToken {
            token: body.access_token,
            expires_at: Utc::now()
                + Duration::seconds(body.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}

#[async_trait]
impl ObjectLister for GcsLister {
    async fn list_page(
        &self,
        prefix: &str,
        limit: u32,
        continuation_token: &str,
    ) -> ListingResult<ListedPage> {
        let mut url = self.objects_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("maxResults", &limit.to_string())
                .append_pair("fields", "items(name),nextPageToken");
            if !prefix.is_empty() {
                query.append_pair("prefix", prefix);
            }
            if !continuation_token.is_empty() {
                query.append_pair("pageToken", continuation_token);
            }
        }

        let mut request = self.http.get(url);
        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ListingError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Upstream(format!(
                "storage responded with status {status}: {body}"
            )));
        }

        let body: ObjectsResponse = response
            .json()
            .await
            .map_err(|e| ListingError::Upstream(format!("decoding listing response: {e}")))?;

        debug!(
            count = body.items.len(),
            has_next = body.next_page_token.is_some(),
            "storage page fetched"
        );

        Ok(ListedPage {
            entries: body.items,
            next_token: body.next_page_token.unwrap_or_default(),
        })
    }

    async fn ready(&self) -> ListingResult<()> {
        self.access_token().await.map(|_| ())
    }
}
