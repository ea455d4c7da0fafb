//! # Request Tracker
//!
//! A request lifecycle and query service for building RESTful APIs in Rust.
//!
//! ## Features
//!
//! - **Validated Intake**: Declarative field rules turn a raw JSON payload into a typed record
//! - **Status Transitions**: Configurable modifiability gate with a compare-and-swap write
//! - **Paginated Queries**: Whitelisted sorting, status filtering and page metadata
//! - **Uniform Envelope**: Every response is `{success, message, data?, pagination?, errors?}`
//! - **Pluggable Storage**: In-memory store by default, MongoDB behind `mongodb_backend`
//! - **Configuration-Based**: YAML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use request_tracker::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(ServiceConfig::default())
//!     .with_store(InMemoryRequestStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod lifecycle;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        envelope::{Envelope, ResponseAssembler},
        error::{FieldValidationError, RequestError, RequestResult, ValidationError},
        query::{PageMeta, QueryPage, RequestFilter, RequestQuery, SortField, SortOrder, SortSpec},
        request::{NewRequest, Request, RequestStatus},
        store::{RequestStore, StatusWrite},
        transition::StatusPolicy,
        validation::{EntityValidationConfig, ValidatableEntity, Validated},
    };

    // === Lifecycle ===
    pub use crate::lifecycle::{AppState, RequestService};

    // === Storage ===
    pub use crate::storage::InMemoryRequestStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoRequestStore;

    // === Config ===
    pub use crate::config::{
        Environment, PaginationConfig, ServerConfig, ServiceConfig, StorageBackend, StorageConfig,
    };

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
