//! API Module
//!
//! HTTP handlers and routing for inspecting a JSON-valued cache store.
//!
//! # Endpoints
//! - `PUT /cache`, `DELETE /cache`
//! - `GET /cache/:key`, `DELETE /cache/:key`
//! - `GET /keys`, `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
