//! REST integration tests parameterized by store backend.
//!
//! The `rest_integration_tests!` macro builds the full router on top of the
//! given store and drives it through `axum_test::TestServer`
//! (HTTP → guard → handler → RecordStore → response).

/// Generate REST integration tests for a `RecordStore` backend.
///
/// `$factory` must evaluate to an empty store implementing `RecordStore + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration {
            use super::*;
            use axum::http::{HeaderName, HeaderValue, StatusCode};
            use axum_test::TestServer;
            use invoice_verify::server::ServerBuilder;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let app = ServerBuilder::new()
                    .with_store($factory)
                    .with_admin_key(TEST_ADMIN_KEY)
                    .build()
                    .expect("Failed to build app");
                TestServer::try_new(app).expect("Failed to create test server")
            }

            async fn create(server: &TestServer, number: &str) -> Value {
                let resp = server
                    .post("/admin/invoices")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&invoice_body(number))
                    .await;
                resp.assert_status(StatusCode::CREATED);
                resp.json()
            }

            // ==============================================================
            // Public lookup
            // ==============================================================

            #[tokio::test]
            async fn test_rest_verify_found() {
                let server = make_server().await;
                create(&server, "INV-001").await;

                let resp = server
                    .get("/api/verify")
                    .add_query_param("invoice_number", "INV-001")
                    .await;
                resp.assert_status_ok();

                let body: Value = resp.json();
                assert_eq!(body["found"], true);
                assert_eq!(body["invoice"]["invoice_number"], "INV-001");
                assert_eq!(body["invoice"]["bank_account_number"], "0012345678");
            }

            #[tokio::test]
            async fn test_rest_verify_not_found_is_logged() {
                let server = make_server().await;

                let resp = server
                    .get("/api/verify")
                    .add_query_param("invoice_number", "INV-404")
                    .add_header(
                        HeaderName::from_static("x-forwarded-for"),
                        HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
                    )
                    .await;
                resp.assert_status(StatusCode::NOT_FOUND);
                let body: Value = resp.json();
                assert_eq!(body["code"], "NOT_FOUND");

                let logs: Value = server
                    .get("/admin/logs")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await
                    .json();
                assert_eq!(logs[0]["invoice_number"], "INV-404");
                assert_eq!(logs[0]["ip_address"], "203.0.113.9");
            }

            #[tokio::test]
            async fn test_rest_verify_malformed_not_logged() {
                let server = make_server().await;

                let resp = server
                    .get("/api/verify")
                    .add_query_param("invoice_number", "INV 001; DROP")
                    .await;
                resp.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = resp.json();
                assert_eq!(body["code"], "INVALID_FORMAT");

                let resp = server.get("/api/verify").await;
                resp.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = resp.json();
                assert_eq!(body["code"], "MISSING_PARAMETER");

                let logs: Value = server
                    .get("/admin/logs")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await
                    .json();
                assert!(logs.as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_verify_long_forwarded_for_is_bounded() {
                let server = make_server().await;
                let long = "a".repeat(100);

                let resp = server
                    .get("/api/verify")
                    .add_query_param("invoice_number", "INV-404")
                    .add_header(
                        HeaderName::from_static("x-forwarded-for"),
                        HeaderValue::from_str(&long).unwrap(),
                    )
                    .await;
                resp.assert_status(StatusCode::NOT_FOUND);

                let logs: Value = server
                    .get("/admin/logs")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await
                    .json();
                assert_eq!(logs[0]["ip_address"], "a".repeat(64));
            }

            // ==============================================================
            // Admin CRUD
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create_and_list() {
                let server = make_server().await;
                let created = create(&server, "INV-001").await;
                assert!(created["id"].as_i64().is_some());
                create(&server, "INV-002").await;

                let resp = server
                    .get("/admin/invoices")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await;
                resp.assert_status_ok();
                let body: Value = resp.json();
                let numbers: Vec<&str> = body
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|inv| inv["invoice_number"].as_str().unwrap())
                    .collect();
                assert_eq!(numbers, vec!["INV-002", "INV-001"]);
            }

            #[tokio::test]
            async fn test_rest_create_duplicate_conflict() {
                let server = make_server().await;
                create(&server, "INV-001").await;

                let resp = server
                    .post("/admin/invoices")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&invoice_body("INV-001"))
                    .await;
                resp.assert_status(StatusCode::CONFLICT);
                let body: Value = resp.json();
                assert_eq!(body["code"], "CONSTRAINT_VIOLATION");
            }

            #[tokio::test]
            async fn test_rest_create_validation_errors() {
                let server = make_server().await;

                let resp = server
                    .post("/admin/invoices")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&json!({ "invoice_number": "bad number", "bank_name": " " }))
                    .await;
                resp.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = resp.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                let fields: Vec<&str> = body["details"]["fields"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|f| f["field"].as_str().unwrap())
                    .collect();
                assert_eq!(
                    fields,
                    vec!["invoice_number", "bank_name", "bank_account_number"]
                );
            }

            #[tokio::test]
            async fn test_rest_get_update_delete() {
                let server = make_server().await;
                let id = create(&server, "INV-001").await["id"].as_i64().unwrap();

                let resp = server
                    .get(&format!("/admin/invoices/{}", id))
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await;
                resp.assert_status_ok();

                let resp = server
                    .put(&format!("/admin/invoices/{}", id))
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&json!({
                        "invoice_number": "INV-001",
                        "bank_name": "Second <Bank>",
                        "bank_account_number": "777"
                    }))
                    .await;
                resp.assert_status_ok();
                let body: Value = resp.json();
                assert_eq!(body["bank_name"], "Second Bank");
                assert_eq!(body["beneficiary_name"], Value::Null);

                let resp = server
                    .delete(&format!("/admin/invoices/{}", id))
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await;
                resp.assert_status_ok();
                let body: Value = resp.json();
                assert_eq!(body["id"], id);

                let resp = server
                    .get(&format!("/admin/invoices/{}", id))
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await;
                resp.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete_with_body_key() {
                let server = make_server().await;
                let form_id = create(&server, "INV-001").await["id"].as_i64().unwrap();
                let json_id = create(&server, "INV-002").await["id"].as_i64().unwrap();

                server
                    .delete(&format!("/admin/invoices/{}", form_id))
                    .form(&[("key", "wrong")])
                    .await
                    .assert_status(StatusCode::FORBIDDEN);

                let resp = server
                    .delete(&format!("/admin/invoices/{}", form_id))
                    .form(&[("key", TEST_ADMIN_KEY)])
                    .await;
                resp.assert_status_ok();
                let body: Value = resp.json();
                assert_eq!(body["invoice_number"], "INV-001");

                let resp = server
                    .delete(&format!("/admin/invoices/{}", json_id))
                    .json(&json!({ "key": TEST_ADMIN_KEY }))
                    .await;
                resp.assert_status_ok();
                let body: Value = resp.json();
                assert_eq!(body["invoice_number"], "INV-002");

                let remaining: Value = server
                    .get("/admin/invoices")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await
                    .json();
                assert!(remaining.as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_unknown_id_not_found() {
                let server = make_server().await;

                let resp = server
                    .delete("/admin/invoices/987654")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .await;
                resp.assert_status(StatusCode::NOT_FOUND);

                let resp = server
                    .put("/admin/invoices/987654")
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&invoice_body("INV-001"))
                    .await;
                resp.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_update_onto_taken_number() {
                let server = make_server().await;
                create(&server, "INV-001").await;
                let id = create(&server, "INV-002").await["id"].as_i64().unwrap();

                let resp = server
                    .put(&format!("/admin/invoices/{}", id))
                    .add_query_param("key", TEST_ADMIN_KEY)
                    .json(&invoice_body("INV-001"))
                    .await;
                resp.assert_status(StatusCode::CONFLICT);
            }

            // ==============================================================
            // Admin gate
            // ==============================================================

            #[tokio::test]
            async fn test_rest_admin_routes_require_key() {
                let server = make_server().await;

                server
                    .get("/admin/invoices")
                    .await
                    .assert_status(StatusCode::FORBIDDEN);
                server
                    .get("/admin/logs")
                    .add_query_param("key", "wrong")
                    .await
                    .assert_status(StatusCode::FORBIDDEN);

                let resp = server
                    .post("/admin/invoices")
                    .json(&json!({ "bank_name": "" }))
                    .await;
                resp.assert_status(StatusCode::FORBIDDEN);
                let body: Value = resp.json();
                assert_eq!(body["code"], "ACCESS_DENIED");
                assert!(body.get("details").is_none());
            }
        }
    };
}
