//! Query parameters, compiled queries and pagination metadata

use crate::config::PaginationConfig;
use crate::core::error::{RequestError, RequestResult, ValidationError};
use crate::core::request::{Request, RequestStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Raw list parameters as they arrive in the URL query string
///
/// Everything is kept as a string so that malformed numbers fall back to
/// defaults instead of rejecting the request.
///
/// # Example
/// ```text
/// GET /api/requests/u-42?status=active&sortBy=sum&sortOrder=asc&page=2&limit=5
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl RequestQuery {
    /// Compile into a filter, a sort and a page window for `user_id`
    pub fn compile(&self, user_id: &str, limits: &PaginationConfig) -> RequestResult<CompiledQuery> {
        // Blank means no filter; anything else must be an exact status name
        let status = match self.status.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(raw.parse::<RequestStatus>()?),
            _ => None,
        };

        let field = match non_blank(&self.sort_by) {
            Some(raw) => raw.parse::<SortField>()?,
            None => SortField::CreatedAt,
        };

        let order = match non_blank(&self.sort_order) {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        let page = parse_positive(&self.page).unwrap_or(1);
        let limit = parse_positive(&self.limit)
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit.max(1));

        Ok(CompiledQuery {
            filter: RequestFilter {
                user_id: user_id.to_string(),
                status,
            },
            sort: SortSpec { field, order },
            page,
            limit,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a page/limit value: unparsable is `None`, zero is raised to 1
fn parse_positive(value: &Option<String>) -> Option<u64> {
    non_blank(value)
        .and_then(|s| s.parse::<u64>().ok())
        .map(|n| n.max(1))
}

/// Which records a query selects
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFilter {
    pub user_id: String,
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    /// Filter on owner only
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            status: None,
        }
    }

    pub fn matches(&self, request: &Request) -> bool {
        request.user_id == self.user_id && self.status.is_none_or(|s| s == request.status)
    }
}

/// Record fields a list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    FullName,
    Telephone,
    Sum,
    Status,
    UserId,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::FullName,
        SortField::Telephone,
        SortField::Sum,
        SortField::Status,
        SortField::UserId,
    ];

    /// Document field name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::FullName => "fullName",
            SortField::Telephone => "telephone",
            SortField::Sum => "sum",
            SortField::Status => "status",
            SortField::UserId => "userID",
        }
    }

    fn compare(&self, a: &Request, b: &Request) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::FullName => a.full_name.cmp(&b.full_name),
            SortField::Telephone => a.telephone.cmp(&b.telephone),
            SortField::Sum => a.sum.total_cmp(&b.sum),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::UserId => a.user_id.cmp(&b.user_id),
        }
    }
}

impl FromStr for SortField {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                RequestError::Validation(ValidationError::FieldError {
                    field: "sortBy".to_string(),
                    message: format!("sortBy must be one of: {}", allowed.join(", ")),
                })
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort key and direction; ties are broken by ascending id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    pub fn compare(&self, a: &Request, b: &Request) -> Ordering {
        let primary = self.field.compare(a, b);
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// A list query ready to run against a store
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: RequestFilter,
    pub sort: SortSpec,
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
}

impl CompiledQuery {
    /// Number of records before the requested page
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of records together with its metadata
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub records: Vec<Request>,
    pub pagination: PageMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (starts at 1)
    pub page: u64,

    /// Number of items per page
    pub limit: u64,

    /// Total number of matching items, ignoring pagination
    pub total: u64,

    /// Total number of pages
    pub pages: u64,
}

impl PageMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);

        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}
