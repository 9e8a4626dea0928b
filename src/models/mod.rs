//! Data models exchanged between the HTTP layer and the listing service.
//!
//! Everything here is plain data: requests are normalized on construction and
//! responses serialize straight to the JSON shape clients consume.

pub mod listing;
pub mod object;
