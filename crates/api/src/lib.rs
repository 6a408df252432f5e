//! xswap API
//!
//! Axum routes and middleware exposing price and quote aggregation over HTTP.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
