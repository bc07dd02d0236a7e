//! API Module
//!
//! HTTP handlers and routing exposing a cache store over JSON.
//!
//! # Endpoints
//! - `/entries/:key` - Read, write and delete single entries
//! - `/entries/:key/{exists,increment,decrement}` - Presence checks and counters
//! - `/entries?pattern=` - Pattern delete and namespace clear
//! - `/cleanup`, `/stats`, `/health` - Maintenance and observability

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
