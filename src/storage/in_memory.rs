//! In-memory implementation of RequestStore for testing and development

use crate::core::query::{RequestFilter, SortSpec};
use crate::core::request::{Request, RequestStatus};
use crate::core::store::{RequestStore, StatusWrite};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory request store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// the lock is never held across an await point.
#[derive(Clone)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<Uuid, Request>>>,
}

impl InMemoryRequestStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(requests.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn create(&self, request: Request) -> Result<Request> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if requests.contains_key(&request.id) {
            return Err(anyhow!("Request {} already exists", request.id));
        }

        requests.insert(request.id, request.clone());

        Ok(request)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Request>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(requests.get(id).cloned())
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Request>> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(requests.remove(id))
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: RequestStatus,
        new_status: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusWrite> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(request) = requests.get_mut(id) else {
            return Ok(StatusWrite::Missing);
        };

        if request.status != expected {
            return Ok(StatusWrite::Conflict {
                current: request.status,
            });
        }

        request.status = new_status;
        request.updated_at = at;

        Ok(StatusWrite::Updated(request.clone()))
    }

    async fn find(
        &self,
        filter: &RequestFilter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Request>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<Request> = requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        drop(requests);

        matching.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, filter: &RequestFilter) -> Result<u64> {
        let requests = self
            .requests
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(requests.values().filter(|r| filter.matches(r)).count() as u64)
    }
}
