//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the jukebox and syncer endpoints
//! - Request handlers (playlist trigger, record start/stop, snapshot events)
//! - Health, version and debug endpoints
//! - CORS and request tracing middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
