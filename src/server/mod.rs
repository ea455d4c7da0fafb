//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires a [`RequestStore`](crate::core::store::RequestStore)
//! and a [`ServiceConfig`](crate::config::ServiceConfig) into the request
//! routes, with tracing and CORS layers.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{build_request_routes, with_http_layers};
