//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoRequestStore`, a [`RequestStore`] backed by the `requests`
//! collection of a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! request-tracker = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. The `id` field is mapped to MongoDB's
//! `_id` convention and stored as a UUID string. `createdAt` and `updatedAt`
//! are stored as BSON dates (millisecond precision) so that sorting on them
//! is chronological.

use crate::core::query::{RequestFilter, SortOrder, SortSpec};
use crate::core::request::{Request, RequestStatus};
use crate::core::store::{RequestStore, StatusWrite};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database, IndexModel};
use uuid::Uuid;

/// Collection holding request records
pub const COLLECTION: &str = "requests";

const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` and BSON dates back to RFC 3339 strings.
fn document_to_json(mut doc: Document) -> Result<serde_json::Value> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    for field in TIMESTAMP_FIELDS {
        let millis = match doc.get(field) {
            Some(Bson::DateTime(at)) => at.timestamp_millis(),
            _ => continue,
        };
        let at = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| anyhow!("Timestamp {} out of range in field {}", millis, field))?;
        doc.insert(field, at.to_rfc3339());
    }

    Ok(Bson::Document(doc).into_relaxed_extjson())
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn date_bson(at: &DateTime<Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_millis(at.timestamp_millis()))
}

fn request_to_document(request: &Request) -> Result<Document> {
    let json =
        serde_json::to_value(request).map_err(|e| anyhow!("Failed to serialize request: {}", e))?;
    let mut doc = json_to_document(json)?;

    doc.insert("createdAt", date_bson(&request.created_at));
    doc.insert("updatedAt", date_bson(&request.updated_at));

    Ok(doc)
}

fn document_to_request(doc: Document) -> Result<Request> {
    let json = document_to_json(doc)?;
    serde_json::from_value(json)
        .map_err(|e| anyhow!("Failed to deserialize request from document: {}", e))
}

fn filter_document(filter: &RequestFilter) -> Document {
    let mut doc = doc! { "userID": filter.user_id.as_str() };
    if let Some(status) = filter.status {
        doc.insert("status", status.as_str());
    }
    doc
}

fn sort_document(sort: &SortSpec) -> Document {
    let direction = match sort.order {
        SortOrder::Asc => 1,
        SortOrder::Desc => -1,
    };
    let mut doc = Document::new();
    doc.insert(sort.field.as_str(), direction);
    doc.insert("_id", 1);
    doc
}

// ---------------------------------------------------------------------------
// MongoRequestStore
// ---------------------------------------------------------------------------

/// Request store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use request_tracker::storage::MongoRequestStore;
///
/// let store = MongoRequestStore::connect("mongodb://localhost:27017", "requests").await?;
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoRequestStore {
    database: Database,
}

impl MongoRequestStore {
    /// Create a store on an existing database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to `uri` and use the database named `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create the `userID` index used by list queries.
    ///
    /// Idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder().keys(doc! { "userID": 1 }).build();

        self.collection()
            .create_index(index)
            .await
            .map_err(|e| anyhow!("Failed to create indexes on requests collection: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl RequestStore for MongoRequestStore {
    /// Insert the record and read it back, so the returned timestamps carry
    /// the stored precision.
    async fn create(&self, request: Request) -> Result<Request> {
        let doc = request_to_document(&request)?;
        let id_bson = uuid_bson(&request.id);

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create request: {}", e))?;

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| anyhow!("Failed to read back created request: {}", e))?
            .ok_or_else(|| anyhow!("Request not found after insert"))?;

        document_to_request(stored)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Request>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get request: {}", e))?;

        doc.map(document_to_request).transpose()
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<Option<Request>> {
        let doc = self
            .collection()
            .find_one_and_delete(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete request: {}", e))?;

        doc.map(document_to_request).transpose()
    }

    /// The filter on `{_id, status}` makes the compare and the write a
    /// single server-side operation.
    async fn update_status(
        &self,
        id: &Uuid,
        expected: RequestStatus,
        new_status: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusWrite> {
        let updated = self
            .collection()
            .find_one_and_update(
                doc! { "_id": uuid_bson(id), "status": expected.as_str() },
                doc! { "$set": { "status": new_status.as_str(), "updatedAt": date_bson(&at) } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update request status: {}", e))?;

        if let Some(doc) = updated {
            return Ok(StatusWrite::Updated(document_to_request(doc)?));
        }

        match self.find_by_id(id).await? {
            Some(current) => Ok(StatusWrite::Conflict {
                current: current.status,
            }),
            None => Ok(StatusWrite::Missing),
        }
    }

    async fn find(
        &self,
        filter: &RequestFilter,
        sort: &SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Request>> {
        // The driver sends skip as an i64; no collection holds more records
        if i64::try_from(skip).is_err() {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let cursor = self
            .collection()
            .find(filter_document(filter))
            .sort(sort_document(sort))
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| anyhow!("Failed to list requests: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect requests: {}", e))?;

        docs.into_iter().map(document_to_request).collect()
    }

    async fn count(&self, filter: &RequestFilter) -> Result<u64> {
        self.collection()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count requests: {}", e))
    }
}
