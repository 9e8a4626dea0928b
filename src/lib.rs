//! Paginated, read-only listing API over a Google Cloud Storage bucket.
//!
//! The storage backend only hands out opaque "next page" tokens; this crate
//! turns them into numbered pages with next/previous links.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
