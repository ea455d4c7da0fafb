//! Persistence collaborator for request records
//!
//! The lifecycle engine only talks to storage through this trait. It never
//! sees a backend's native query builder.

use crate::core::query::{RequestFilter, SortSpec};
use crate::core::request::{Request, RequestStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Outcome of a conditional status write
#[derive(Debug, Clone, PartialEq)]
pub enum StatusWrite {
    /// The stored status matched `expected`; this is the record after the write
    Updated(Request),
    /// The stored status no longer matched `expected`
    Conflict { current: RequestStatus },
    /// No record with this id
    Missing,
}

/// Storage operations required by the lifecycle engine
///
/// Implementations must make `update_status` atomic per record: the
/// comparison against `expected` and the write happen as one step.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert a new record and return it as stored
    async fn create(&self, request: Request) -> Result<Request>;

    /// Get a record by id
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Request>>;

    /// Hard-delete a record, returning it if it existed
    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Request>>;

    /// Set `status` and `updated_at` only if the stored status equals `expected`
    async fn update_status(
        &self,
        id: &Uuid,
        expected: RequestStatus,
        new_status: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusWrite>;

    /// Matching records in `sort` order, skipping `skip` and taking at most `limit`
    async fn find(
        &self,
        filter: &RequestFilter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Request>>;

    /// Number of matching records, ignoring pagination
    async fn count(&self, filter: &RequestFilter) -> Result<u64>;
}
