//! Host process for the address allocation engine: config, HTTP surface and
//! housekeeping for the in-memory cooldown cache.

pub mod api;
pub mod config;
pub mod services;
pub mod types;

pub use api::{create_router, ip::AppState};
