//! HTTP API layer for tanvan.
//!
//! This crate provides the JSON API:
//!
//! - **Endpoints**: accounts, timelines, the social graph, articles,
//!   discussions, password reset and the static content pages
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token session resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
