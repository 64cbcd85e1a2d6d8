//! Shared helpers for integration tests: a mock PostgREST endpoint.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-anon-key";

/// Sample rows shaped like the `transactions` table.
pub fn sample_transactions() -> serde_json::Value {
    json!([
        {
            "id": "5f0c1a2e-0000-4000-8000-000000000001",
            "amount": 49.95,
            "store_id": "store-1",
            "customer_id": null,
            "product_id": "sku-42",
            "external_id": "100000123",
            "transaction_date": "2024-02-14",
            "created_at": "2024-02-14T10:00:00Z"
        }
    ])
}

/// Mount the row fetch, count, schema and ranged-filter endpoints.
pub async fn mount_tables(server: &MockServer, rows: serde_json::Value, total: u64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/transactions"))
        .and(query_param("select", "id"))
        .and(query_param("limit", "1"))
        .and(header("apikey", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "t-1"}])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transactions"))
        .and(header("Prefer", "count=exact"))
        .and(query_param("limit", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", format!("*/{total}").as_str())
                .set_body_json(json!([])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/information_schema.columns"))
        .and(query_param("table_name", "eq.transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"column_name": "id", "data_type": "uuid"},
            {"column_name": "transaction_date", "data_type": "timestamp with time zone"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/transactions"))
        .and(query_param("select", "*"))
        .and(query_param("transaction_date", "gte.2023-01-01"))
        .and(query_param("transaction_date", "lte.2025-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

/// Mount the `version` RPC with the given status.
pub async fn mount_version(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200)
            .set_body_json(json!("PostgreSQL 15.6 on aarch64-unknown-linux-gnu"))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({
            "code": "PGRST202",
            "message": "Could not find the function public.version without parameters",
            "details": null,
            "hint": null
        }))
    };
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/version"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// A server where every check passes.
pub async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    mount_tables(&server, sample_transactions(), 1).await;
    mount_version(&server, 200).await;
    server
}
