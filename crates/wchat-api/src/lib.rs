//! # wchat-api
//!
//! HTTP layer for W-Chat built on Axum.
//!
//! Provides the WebSocket upgrade endpoint that feeds the realtime engine,
//! health endpoints, the CORS layer, and `ApiError` → HTTP mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
