//! HTTP handler for paginated bucket listings.
//! Query parsing is lenient; all pagination logic lives in `ListingService`.

use crate::{
    errors::AppError,
    models::listing::{ListingQuery, ListingRequest, ListingResponse},
    services::listing_service::ListingService,
};
use axum::{
    Json,
    extract::{OriginalUri, RawQuery, State},
};

/// `GET /list` — one page of object names, supports ?limit=&page=&pageToken=
pub async fn list_objects(
    State(service): State<ListingService>,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListingResponse>, AppError> {
    let request = ListingRequest::from(ListingQuery::parse(raw.as_deref()));
    let response = service.list_page(uri.path(), request).await?;
    Ok(Json(response))
}
