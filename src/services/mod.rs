//! Listing services: the pagination coordinator, its token store, and the
//! storage backends it reads from.

pub mod gcs;
pub mod lister;
pub mod listing_service;
pub mod page_tokens;
