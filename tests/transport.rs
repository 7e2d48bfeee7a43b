mod common;

use blockchain_api_client::{ApiClient, ApiError, ClientConfig, QueryString};
use common::*;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_merges_access_token_over_caller_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .and(query_param("format", "json"))
        .and(query_param("api_code", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, Some("secret"));

    let mut qs = QueryString::new();
    qs.add("format", "json").unwrap();
    qs.add("api_code", "stale").unwrap();
    let value: Value = client.get("stats", Some(qs)).await.unwrap();

    assert_eq!(value, json!({ "ok": true }));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("format=json&api_code=secret"));
}

#[tokio::test]
async fn get_appends_to_a_route_with_embedded_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/unspent"))
        .and(query_param("active", ADDRESS))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let mut qs = QueryString::new();
    qs.add("format", "json").unwrap();
    let value: u64 = client
        .get(&format!("unspent?active={}", ADDRESS), Some(qs))
        .await
        .unwrap();

    assert_eq!(value, 42);
}

#[tokio::test]
async fn get_with_uses_the_supplied_deserializer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/q/getblockcount"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  812345\n"))
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let height = client
        .get_with("q/getblockcount", None, |payload| {
            payload
                .trim()
                .parse::<u64>()
                .map_err(|e| ApiError::FailedParsingResponse(e.to_string()))
        })
        .await
        .unwrap();

    assert_eq!(height, 812_345);
}

#[tokio::test]
async fn empty_route_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let client = client_for(&server, None);

    let err = client.get::<Value>("", None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRoute));
    let err = client.post::<_, Value>("", "x", false).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRoute));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn error_envelope_with_ok_status_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rawtx/deadbeef"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"error\":\"Transaction not found\"}"),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let err = client.transaction("deadbeef").await.unwrap_err();

    assert_eq!(err.server_message(), Some("Transaction not found"));
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn block_not_found_body_is_an_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rawblock/0000"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Block Not Found"))
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let err = client.block("0000").await.unwrap_err();

    assert!(err.is_server_message("Block Not Found"));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn failing_status_reports_reason_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latestblock"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let err = client.latest_block().await.unwrap_err();

    assert_eq!(err.to_string(), "Service Unavailable: try later");
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn undecodable_payload_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latestblock"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let err = client.latest_block().await.unwrap_err();

    assert!(matches!(err, ApiError::FailedParsingResponse(_)));
}

#[tokio::test]
async fn post_sends_url_encoded_json_with_literal_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/merchant/send"))
        .and(query_param("api_code", "secret"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_json(json!({ "to": "1abc", "amount": 1000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tx_hash": "ff" })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, Some("secret"));

    let res: Value = client
        .post(
            "merchant/send",
            &json!({ "to": "1abc", "amount": 1000 }),
            false,
        )
        .await
        .unwrap();

    assert_eq!(res["tx_hash"], "ff");
}

#[tokio::test]
async fn push_transaction_uses_a_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pushtx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Transaction Submitted"))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    client.push_transaction("0100000001abcd").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("application/x-www-form-urlencoded"));
    assert!(body.contains("\"0100000001abcd\""));
}

#[tokio::test]
async fn push_transaction_surfaces_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pushtx"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Parse: exception"))
        .mount(&server)
        .await;
    let client = client_for(&server, None);

    let err = client.push_transaction("zz").await.unwrap_err();
    assert_eq!(
        err.server_message(),
        Some("Internal Server Error: Parse: exception")
    );

    let err = client.push_transaction("").await.unwrap_err();
    assert!(matches!(err, ApiError::ArgumentNull("raw_tx_hex")));
}

#[tokio::test]
async fn unreachable_service_is_reported() {
    init_logger();
    let client = ApiClient::with_base_url("http://127.0.0.1:9", None).unwrap();

    let err = client.latest_block().await.unwrap_err();

    assert!(matches!(err, ApiError::ServiceUnreachable(_)));
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latestblock"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    init_logger();
    let client = ApiClient::from_config(&ClientConfig {
        base_url: server.uri(),
        api_code: None,
        timeout: Duration::from_millis(50),
    })
    .unwrap();

    let err = client.latest_block().await.unwrap_err();

    assert!(matches!(err, ApiError::ServiceUnreachable(_)));
}
