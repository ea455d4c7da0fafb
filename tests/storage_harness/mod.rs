//! Shared test harness for storage backend testing
//!
//! Provides request fixtures with millisecond-precision timestamps (the
//! precision every backend stores) and the contract suites generated by
//! `request_store_tests!` and `rest_integration_tests!`.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod rest_tests;

use axum::Router;
use chrono::{DateTime, Utc};
use request_tracker::config::ServiceConfig;
use request_tracker::core::request::{Request, RequestStatus};
use request_tracker::core::store::RequestStore;
use request_tracker::server::ServerBuilder;
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helper functions - Request creation
// ---------------------------------------------------------------------------

/// A fixed instant `offset_secs` seconds after a base time
pub fn ts(offset_secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000 + offset_secs * 1000)
        .expect("timestamp in range")
}

/// Create an active `Request` with a random id, owned by `user_id`
pub fn create_test_request(user_id: &str, full_name: &str, sum: f64) -> Request {
    create_test_request_at(user_id, full_name, sum, ts(0))
}

/// Create an active `Request` whose timestamps are both `at`
pub fn create_test_request_at(
    user_id: &str,
    full_name: &str,
    sum: f64,
    at: DateTime<Utc>,
) -> Request {
    Request {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        full_name: full_name.to_string(),
        telephone: "+7 (900) 123-45-67".to_string(),
        sum,
        status: RequestStatus::Active,
        created_at: at,
        updated_at: at,
    }
}

/// Generate `n` requests for `user_id` with distinct sums and creation times
///
/// Item `i` has `sum = 10 * i` and was created `i` seconds after the base.
pub fn sample_batch(user_id: &str, n: usize) -> Vec<Request> {
    (0..n)
        .map(|i| {
            create_test_request_at(
                user_id,
                &format!("Customer {}", i),
                (i as f64) * 10.0,
                ts(i as i64),
            )
        })
        .collect()
}

/// JSON payload accepted by `POST /api/requests`
pub fn create_payload(user_id: &str, sum: f64) -> serde_json::Value {
    serde_json::json!({
        "userID": user_id,
        "fullName": "Ivan Petrov",
        "telephone": "+7 (900) 123-45-67",
        "sum": sum,
    })
}

// ---------------------------------------------------------------------------
// Router helpers
// ---------------------------------------------------------------------------

/// Full application router over `store` with `config`
pub fn build_test_router(store: Arc<dyn RequestStore>, config: ServiceConfig) -> Router {
    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .build()
        .expect("router should build")
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert that two records carry identical fields
pub fn assert_same_request(actual: &Request, expected: &Request) {
    assert_eq!(
        actual, expected,
        "Expected request {:?}, got {:?}",
        expected, actual
    );
}

/// Assert that the sums of `records` are exactly `expected`, in order
pub fn assert_sums(records: &[Request], expected: &[f64]) {
    let sums: Vec<f64> = records.iter().map(|r| r.sum).collect();
    assert_eq!(sums, expected, "unexpected page contents");
}
