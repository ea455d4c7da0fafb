//! Request lifecycle module
//!
//! The engine ([`RequestService`]) and the HTTP handlers that expose it.

pub mod handlers;
pub mod service;

pub use handlers::{
    AppState, create_request, delete_request, health, list_requests, update_request_status,
};
pub use service::RequestService;
