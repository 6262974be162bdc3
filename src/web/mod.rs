//! HTTP surface for Filedrop.
//!
//! Routes requests to the file store service and renders its results as
//! JSON (or raw bytes for downloads).

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
