//! The request record and its status lifecycle

use crate::core::error::RequestError;
use crate::core::validation::{EntityValidationConfig, ValidatableEntity, filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    #[default]
    Active,
    InProgress,
    Done,
    Canceled,
}

impl RequestStatus {
    /// All statuses, in the order they are listed in messages
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Active,
        RequestStatus::Done,
        RequestStatus::Canceled,
        RequestStatus::InProgress,
    ];

    /// Wire name of the status (`inProgress`, not `in_progress`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Active => "active",
            RequestStatus::InProgress => "inProgress",
            RequestStatus::Done => "done",
            RequestStatus::Canceled => "canceled",
        }
    }

    /// Comma-separated list of the allowed wire names
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| RequestError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// A persisted request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub full_name: String,
    pub telephone: String,
    pub sum: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// Materialize a validated draft into a record with a fresh id and timestamps
    pub fn from_draft(draft: NewRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            full_name: draft.full_name,
            telephone: draft.telephone,
            sum: draft.sum,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated, normalized payload ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub full_name: String,
    pub telephone: String,
    pub sum: f64,
    #[serde(default)]
    pub status: RequestStatus,
}

impl ValidatableEntity for NewRequest {
    fn validation_config() -> EntityValidationConfig {
        let statuses: Vec<String> = RequestStatus::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        EntityValidationConfig::new()
            .field("userID", |f| {
                f.validate(validators::required())
                    .validate(validators::string())
            })
            .field("fullName", |f| {
                f.filter(filters::trim())
                    .validate(validators::required())
                    .validate(validators::string())
            })
            .field("telephone", |f| {
                f.validate(validators::required())
                    .validate(validators::string())
                    .validate(validators::phone())
            })
            .field("sum", |f| {
                f.validate(validators::required())
                    .validate(validators::number())
                    .validate(validators::min_value(0.0))
            })
            .field("status", |f| {
                f.filter(filters::default_if_blank(json!(RequestStatus::default().as_str())))
                    .validate(validators::one_of(statuses))
            })
    }
}
