mod common;

use axum::http::Method;
use common::{call, spawn_proxy, spawn_registrar, StubRegistrar, AUTH};
use serde_json::{json, Value};

const AVAILABILITY: &str =
    r#"{"results":[{"domainName":"example.com","purchasable":true,"purchasePrice":12.99}]}"#;

#[tokio::test(flavor = "multi_thread")]
async fn availability_is_relayed_byte_for_byte() {
    let stub = StubRegistrar::new(200, AVAILABILITY);
    let registrar = spawn_registrar(stub.clone()).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/check-availability"),
        Some(r#"{"domainNames":["example.com"]}"#),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, AVAILABILITY);

    let seen = stub.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/domains:checkAvailability");
    assert_eq!(seen[0].authorization.as_deref(), Some(AUTH));
    let forwarded: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(forwarded, json!({ "domainNames": ["example.com"] }));
}

#[tokio::test(flavor = "multi_thread")]
async fn availability_upstream_error_is_generic_500() {
    let stub = StubRegistrar::new(503, r#"{"message":"maintenance"}"#);
    let registrar = spawn_registrar(stub).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/check-availability"),
        Some(r#"{"domainNames":["example.com"]}"#),
    )
    .await;

    assert_eq!(status, 500);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].is_string());
    assert!(!body.to_string().contains("maintenance"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_registrar_is_500() {
    let proxy = spawn_proxy("http://127.0.0.1:1").await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/check-availability"),
        Some(r#"{"domainNames":["example.com"]}"#),
    )
    .await;
    assert_eq!(status, 500);
    assert!(serde_json::from_str::<Value>(&body).unwrap()["error"].is_string());

    let (status, _) = call("GET", format!("{proxy}/api/tlds"), None).await;
    assert_eq!(status, 500);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_availability_body_is_400() {
    let stub = StubRegistrar::new(200, "{}");
    let registrar = spawn_registrar(stub.clone()).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/check-availability"),
        Some(r#"{"domains":"example.com"}"#),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "error": "Malformed payload" })
    );
    assert!(stub.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn tlds_are_relayed() {
    let tlds = r#"{"tlds":[{"tld":"com","registrationPrice":10.99}]}"#;
    let stub = StubRegistrar::new(200, tlds);
    let registrar = spawn_registrar(stub.clone()).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call("GET", format!("{proxy}/api/tlds"), None).await;

    assert_eq!(status, 200);
    assert_eq!(body, tlds);
    let seen = stub.requests();
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/tlds");
    assert_eq!(seen[0].authorization.as_deref(), Some(AUTH));
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_builds_purchase_payload() {
    let stub = StubRegistrar::new(200, r#"{"domain":{"domainName":"example.com"},"order":42}"#);
    let registrar = spawn_registrar(stub.clone()).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/domain/register"),
        Some(r#"{"domainName":"example.com","years":1,"purchasePrice":"12.99","useWhoisPrivacy":true,"useSSL":true}"#),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, r#"{"domain":{"domainName":"example.com"},"order":42}"#);

    let seen = stub.requests();
    assert_eq!(seen[0].path, "/domains");
    let payload: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(
        payload,
        json!({
            "domain": { "domainName": "example.com" },
            "purchasePrice": 12.99,
            "years": 1,
            "addons": [{ "type": "privacy" }, { "type": "ssl", "product": "RapidSSL" }]
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_failure_forwards_registrar_body_as_400() {
    let stub = StubRegistrar::new(402, r#"{"error":"insufficient_funds"}"#);
    let registrar = spawn_registrar(stub).await;
    let proxy = spawn_proxy(&registrar).await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/domain/register"),
        Some(r#"{"domainName":"example.com","years":1,"useWhoisPrivacy":false,"useSSL":false}"#),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body, r#"{"error":"insufficient_funds"}"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_transport_failure_is_400_with_message() {
    let proxy = spawn_proxy("http://127.0.0.1:1").await;

    let (status, body) = call(
        "POST",
        format!("{proxy}/api/domain/register"),
        Some(r#"{"domainName":"example.com"}"#),
    )
    .await;

    assert_eq!(status, 400);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("unreachable"));
}
