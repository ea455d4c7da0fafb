//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that validate
//! a `RequestStore` through full REST round-trips:
//! JSON → HTTP request → handler → RequestService → RequestStore → envelope.

/// Generate a REST integration test suite for a storage backend.
///
/// `$store_factory` must produce an `impl RequestStore + 'static`.
///
/// # Generated Tests
///
/// ## Create
/// - `test_rest_create` - POST 201 + record in `data`, status defaults to active
/// - `test_rest_create_negative_sum` - 400 with the `sum` message in `errors`
/// - `test_rest_create_reports_every_field` - one message per invalid field
/// - `test_rest_create_malformed_json` - 400
///
/// ## List
/// - `test_rest_list_round_trip` - created record comes back identical
/// - `test_rest_list_empty_user` - 404, `data: []`, `pagination.total == 0`
/// - `test_rest_list_pagination_and_sort`
/// - `test_rest_list_huge_page_number` - `page = u64::MAX` is an empty 404 page
/// - `test_rest_list_status_filter`
/// - `test_rest_list_rejects_unknown_sort_field` / `..._unknown_status`
///
/// ## Update status
/// - `test_rest_update_status` - 200, `updatedAt >= createdAt`
/// - `test_rest_update_invalid_status` - 400 listing the allowed values
/// - `test_rest_update_padded_status` - `" done "` is not a status
/// - `test_rest_update_missing_status` - 400 `status is not specified`
/// - `test_rest_update_unknown_id` - 404
///
/// ## Delete
/// - `test_rest_delete_twice` - 200 then 404
/// - `test_rest_invalid_id` - 400 on PATCH and DELETE
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use chrono::{DateTime, Utc};
            use request_tracker::config::ServiceConfig;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let store = $store_factory;
                let router = build_test_router(Arc::new(store), ServiceConfig::default());
                TestServer::try_new(router).unwrap()
            }

            async fn create(server: &TestServer, user_id: &str, sum: f64) -> Value {
                let response = server
                    .post("/api/requests")
                    .json(&create_payload(user_id, sum))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                body["data"].clone()
            }

            fn timestamp(value: &Value) -> DateTime<Utc> {
                value.as_str().unwrap().parse().unwrap()
            }

            // ==============================================================
            // Create
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let response = server
                    .post("/api/requests")
                    .json(&json!({
                        "userID": "u-1",
                        "fullName": "  Anna Smirnova ",
                        "telephone": "+7 (900) 000-11-22",
                        "sum": 250.75
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["message"], "Request created successfully");

                let data = &body["data"];
                assert_eq!(data["userID"], "u-1");
                assert_eq!(data["fullName"], "Anna Smirnova");
                assert_eq!(data["telephone"], "+7 (900) 000-11-22");
                assert_eq!(data["sum"], 250.75);
                assert_eq!(data["status"], "active");
                uuid::Uuid::parse_str(data["id"].as_str().unwrap()).unwrap();
                assert_eq!(data["createdAt"], data["updatedAt"]);
            }

            #[tokio::test]
            async fn test_rest_create_with_status() {
                let server = make_server().await;

                let mut payload = create_payload("u-1", 10.0);
                payload["status"] = json!("inProgress");
                let response = server.post("/api/requests").json(&payload).await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_eq!(body["data"]["status"], "inProgress");
            }

            #[tokio::test]
            async fn test_rest_create_negative_sum() {
                let server = make_server().await;

                let response = server
                    .post("/api/requests")
                    .json(&create_payload("u-1", -5.0))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["message"], "Validation failed");
                let errors = body["errors"].as_array().unwrap();
                assert_eq!(errors.len(), 1);
                assert!(errors[0].as_str().unwrap().contains("sum"));
            }

            #[tokio::test]
            async fn test_rest_create_reports_every_field() {
                let server = make_server().await;

                let response = server
                    .post("/api/requests")
                    .json(&json!({ "telephone": "call me", "status": "completed" }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                let errors = body["errors"].as_array().unwrap();
                assert_eq!(errors.len(), 5, "errors: {:?}", errors);
            }

            #[tokio::test]
            async fn test_rest_create_malformed_json() {
                let server = make_server().await;

                let response = server
                    .post("/api/requests")
                    .text("{\"userID\": ")
                    .content_type("application/json")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
            }

            // ==============================================================
            // List
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_round_trip() {
                let server = make_server().await;
                let created = create(&server, "round-trip", 99.9).await;

                let response = server.get("/api/requests/round-trip").await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["data"], json!([created.clone()]));
                assert_eq!(
                    body["pagination"],
                    json!({ "page": 1, "limit": 10, "total": 1, "pages": 1 })
                );
                assert!(timestamp(&created["updatedAt"]) >= timestamp(&created["createdAt"]));
            }

            #[tokio::test]
            async fn test_rest_list_empty_user() {
                let server = make_server().await;

                let response = server.get("/api/requests/nobody").await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["data"], json!([]));
                assert_eq!(body["pagination"]["total"], 0);
                assert_eq!(body["pagination"]["pages"], 0);
            }

            #[tokio::test]
            async fn test_rest_list_pagination_and_sort() {
                let server = make_server().await;
                for sum in [5.0, 1.0, 4.0, 2.0, 3.0] {
                    create(&server, "pager", sum).await;
                }

                let response = server
                    .get("/api/requests/pager")
                    .add_query_param("sortBy", "sum")
                    .add_query_param("sortOrder", "asc")
                    .add_query_param("page", "2")
                    .add_query_param("limit", "2")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                let sums: Vec<f64> = body["data"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r["sum"].as_f64().unwrap())
                    .collect();
                assert_eq!(sums, vec![3.0, 4.0]);
                assert_eq!(
                    body["pagination"],
                    json!({ "page": 2, "limit": 2, "total": 5, "pages": 3 })
                );
            }

            #[tokio::test]
            async fn test_rest_list_page_past_end() {
                let server = make_server().await;
                create(&server, "short", 1.0).await;

                let response = server
                    .get("/api/requests/short")
                    .add_query_param("page", "5")
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["data"], json!([]));
                assert_eq!(body["pagination"]["total"], 1);
            }

            #[tokio::test]
            async fn test_rest_list_huge_page_number() {
                let server = make_server().await;
                create(&server, "huge", 1.0).await;

                let response = server
                    .get("/api/requests/huge")
                    .add_query_param("page", u64::MAX.to_string())
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["data"], json!([]));
                assert_eq!(body["pagination"]["total"], 1);
            }

            #[tokio::test]
            async fn test_rest_list_status_filter() {
                let server = make_server().await;
                let first = create(&server, "filter", 1.0).await;
                create(&server, "filter", 2.0).await;

                server
                    .patch(&format!("/api/requests/{}", first["id"].as_str().unwrap()))
                    .json(&json!({ "status": "done" }))
                    .await
                    .assert_status_ok();

                let response = server
                    .get("/api/requests/filter")
                    .add_query_param("status", "done")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["data"].as_array().unwrap().len(), 1);
                assert_eq!(body["data"][0]["id"], first["id"]);
                assert_eq!(body["pagination"]["total"], 1);
            }

            #[tokio::test]
            async fn test_rest_list_rejects_unknown_sort_field() {
                let server = make_server().await;

                let response = server
                    .get("/api/requests/u-1")
                    .add_query_param("sortBy", "$where")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_list_rejects_unknown_status() {
                let server = make_server().await;

                let response = server
                    .get("/api/requests/u-1")
                    .add_query_param("status", "archived")
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert!(body["message"].as_str().unwrap().contains("inProgress"));
            }

            // ==============================================================
            // Update status
            // ==============================================================

            #[tokio::test]
            async fn test_rest_update_status() {
                let server = make_server().await;
                let created = create(&server, "u-1", 1.0).await;
                let id = created["id"].as_str().unwrap();

                let response = server
                    .patch(&format!("/api/requests/{}", id))
                    .json(&json!({ "status": "canceled" }))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["data"]["status"], "canceled");
                assert_eq!(body["data"]["createdAt"], created["createdAt"]);
                assert!(
                    timestamp(&body["data"]["updatedAt"]) >= timestamp(&body["data"]["createdAt"])
                );
            }

            #[tokio::test]
            async fn test_rest_update_invalid_status() {
                let server = make_server().await;
                let created = create(&server, "u-1", 1.0).await;

                let response = server
                    .patch(&format!("/api/requests/{}", created["id"].as_str().unwrap()))
                    .json(&json!({ "status": "completed" }))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                let message = body["message"].as_str().unwrap();
                for status in ["active", "done", "canceled", "inProgress"] {
                    assert!(message.contains(status), "{} lacks {}", message, status);
                }
            }

            #[tokio::test]
            async fn test_rest_update_padded_status() {
                let server = make_server().await;
                let created = create(&server, "u-1", 1.0).await;
                let path = format!("/api/requests/{}", created["id"].as_str().unwrap());

                server
                    .patch(&path)
                    .json(&json!({ "status": " done " }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                let response = server.get("/api/requests/u-1").await;
                let body: Value = response.json();
                assert_eq!(body["data"][0]["status"], "active");
            }

            #[tokio::test]
            async fn test_rest_update_missing_status() {
                let server = make_server().await;
                let created = create(&server, "u-1", 1.0).await;

                let response = server
                    .patch(&format!("/api/requests/{}", created["id"].as_str().unwrap()))
                    .json(&json!({}))
                    .await;

                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["message"], "status is not specified");
            }

            #[tokio::test]
            async fn test_rest_update_unknown_id() {
                let server = make_server().await;

                let response = server
                    .patch(&format!("/api/requests/{}", uuid::Uuid::new_v4()))
                    .json(&json!({ "status": "done" }))
                    .await;

                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["message"], "Request not found");
            }

            // ==============================================================
            // Delete
            // ==============================================================

            #[tokio::test]
            async fn test_rest_delete_twice() {
                let server = make_server().await;
                let created = create(&server, "u-1", 1.0).await;
                let path = format!("/api/requests/{}", created["id"].as_str().unwrap());

                let response = server.delete(&path).await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["data"], created);

                let response = server.delete(&path).await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_invalid_id() {
                let server = make_server().await;

                let response = server.delete("/api/requests/not-an-id").await;
                response.assert_status(StatusCode::BAD_REQUEST);

                let response = server
                    .patch("/api/requests/not-an-id")
                    .json(&json!({ "status": "done" }))
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["message"], "Invalid request ID");
            }
        }
    };
}
