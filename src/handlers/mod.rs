pub mod health_handlers;
pub mod listing_handlers;
