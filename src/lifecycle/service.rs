//! The request lifecycle engine
//!
//! `RequestService` owns the operation semantics: it stamps records on
//! create, runs the modifiability gate before a status change, and turns a
//! list query into a page with metadata. Storage sits behind [`RequestStore`].

use crate::config::PaginationConfig;
use crate::core::error::{RequestError, RequestResult, ValidationError};
use crate::core::query::{PageMeta, QueryPage, RequestQuery};
use crate::core::request::{NewRequest, Request, RequestStatus};
use crate::core::store::{RequestStore, StatusWrite};
use crate::core::transition::StatusPolicy;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn RequestStore>,
    policy: StatusPolicy,
    pagination: PaginationConfig,
}

impl RequestService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self {
            store,
            policy: StatusPolicy::default(),
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Persist a validated draft with a fresh id and `createdAt == updatedAt`
    pub async fn create(&self, draft: NewRequest) -> RequestResult<Request> {
        let request = Request::from_draft(draft, Utc::now());
        let created = self.store.create(request).await?;

        tracing::info!(
            request_id = %created.id,
            user_id = %created.user_id,
            status = %created.status,
            "request created"
        );

        Ok(created)
    }

    /// Hard-delete a record and return it
    pub async fn delete(&self, id: &Uuid) -> RequestResult<Request> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or(RequestError::NotFound { id: *id })?;

        tracing::info!(request_id = %id, "request deleted");

        Ok(deleted)
    }

    /// Change the status of a record
    ///
    /// Order of checks: the status argument must be present, the record must
    /// exist, the gate must accept its current status, the new value must be
    /// a known status. The write is conditional on the status read here.
    pub async fn update_status(
        &self,
        id: &Uuid,
        status: Option<&str>,
    ) -> RequestResult<Request> {
        let raw = status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingArgument {
                argument: "status".to_string(),
            })?;

        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(RequestError::NotFound { id: *id })?;

        if !self.policy.can_be_modified(current.status) {
            return Err(RequestError::NotModifiable {
                status: current.status,
            });
        }

        let new_status: RequestStatus = raw.parse()?;

        // Wall clock may step back; never let updatedAt precede the stored value
        let at = Utc::now().max(current.updated_at);

        match self
            .store
            .update_status(id, current.status, new_status, at)
            .await?
        {
            StatusWrite::Updated(updated) => {
                tracing::info!(
                    request_id = %id,
                    from = %current.status,
                    to = %updated.status,
                    "request status updated"
                );
                Ok(updated)
            }
            StatusWrite::Conflict { current: found } => {
                tracing::warn!(
                    request_id = %id,
                    expected = %current.status,
                    found = %found,
                    "concurrent status change detected"
                );
                Err(RequestError::Conflict {
                    id: *id,
                    expected: current.status,
                    current: found,
                })
            }
            StatusWrite::Missing => Err(RequestError::NotFound { id: *id }),
        }
    }

    /// One page of a user's records plus pagination metadata
    ///
    /// The page and the total count are fetched concurrently.
    pub async fn list(&self, user_id: &str, query: &RequestQuery) -> RequestResult<QueryPage> {
        let compiled = query.compile(user_id, &self.pagination)?;

        let (records, total) = futures::try_join!(
            self.store.find(
                &compiled.filter,
                &compiled.sort,
                compiled.skip(),
                compiled.limit
            ),
            self.store.count(&compiled.filter),
        )?;

        tracing::debug!(
            user_id = %user_id,
            page = compiled.page,
            limit = compiled.limit,
            total,
            returned = records.len(),
            "requests listed"
        );

        Ok(QueryPage {
            records,
            pagination: PageMeta::new(compiled.page, compiled.limit, total),
        })
    }
}
