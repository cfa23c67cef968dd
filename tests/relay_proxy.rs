//! End-to-end tests: real relay server, mock upstream over TCP.

use serde_json::{json, Value};

use green_api_relay::client::{Credentials, RelayClient};

mod common;
use common::MockReply;

const ID: &str = "1101000001";
const TOKEN: &str = "d75b3a66374942c5b3c019c698abc2067e151558acbd412345";

fn relay_url(addr: std::net::SocketAddr, method: &str) -> String {
    format!("http://{}/api/green-api/{}/{}/{}", addr, ID, method, TOKEN)
}

#[tokio::test]
async fn test_json_reply_relayed_verbatim() {
    let (upstream, mut seen) = common::start_mock_upstream(MockReply::json(200, r#"{"ok":true}"#)).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .json(&json!({"httpMethod": "GET", "data": null}))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);

    let request = seen.recv().await.unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, format!("/waInstance{}/getSettings/{}", ID, TOKEN));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request.body.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_status_not_reinterpreted() {
    let (upstream, _seen) =
        common::start_mock_upstream(MockReply::json(401, r#"{"error":"Unauthorized"}"#)).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getStateInstance"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Unauthorized"}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_data_forwarded() {
    let (upstream, mut seen) =
        common::start_mock_upstream(MockReply::json(200, r#"{"idMessage":"3EB0C767D097B7C7C030"}"#)).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let data = json!({"chatId": "12345678901@c.us", "message": "hello"});
    let res = common::http_client()
        .post(relay_url(relay, "sendMessage"))
        .json(&json!({"httpMethod": "POST", "data": data}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["idMessage"], "3EB0C767D097B7C7C030");

    let request = seen.recv().await.unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, format!("/waInstance{}/sendMessage/{}", ID, TOKEN));
    let forwarded: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(forwarded, data);

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_reply_truncated() {
    let page = format!("<html><body>{}</body></html>", "Bad Gateway ".repeat(30));
    assert!(page.len() > 300);

    let (upstream, _seen) = common::start_mock_upstream(MockReply::html(502, &page)).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid API response");
    assert!(body["message"].as_str().unwrap().contains("502"));
    assert_eq!(body["details"], format!("{}...", &page[..200]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_short_non_json_reply_not_truncated() {
    let (upstream, _seen) = common::start_mock_upstream(MockReply {
        status: 200,
        content_type: None,
        body: "OK".into(),
    })
    .await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid API response");
    assert_eq!(body["details"], "OK");

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_json_reply() {
    let (upstream, _seen) = common::start_mock_upstream(MockReply::json(200, "{\"ok\":")).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid API response");
    assert!(body["details"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "network error");
    let details = body["details"].as_str().unwrap();
    assert!(!details.is_empty());
    assert!(!details.contains(TOKEN));

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_parameters() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::http_client();

    for path in [
        format!("/api/green-api/{}//{}", ID, TOKEN),
        format!("/api/green-api/{}/getSettings/", ID),
        format!("/api/green-api//123/getSettings/{}", TOKEN),
        "/api/green-api".to_string(),
        "/api/green-api/".to_string(),
    ] {
        let res = client
            .post(format!("http://{}{}", relay, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400, "path {}", path);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid request", "path {}", path);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_placeholder_credentials_never_reach_upstream() {
    let (upstream, mut seen) = common::start_mock_upstream(MockReply::json(200, "{}")).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::http_client();

    for (id, token) in [("123", TOKEN), (ID, "asd")] {
        let res = client
            .post(format!("http://{}/api/green-api/{}/sendMessage/{}", relay, id, token))
            .json(&json!({"httpMethod": "POST", "data": {"chatId": "1@c.us"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid credentials");
    }

    assert!(seen.try_recv().is_err());
    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_request_body() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(relay_url(relay, "getSettings"))
        .header("content-type", "application/json")
        .body("{httpMethod:")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid request");

    shutdown.trigger();
}

#[tokio::test]
async fn test_placeholder_wins_over_malformed_body() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(format!("http://{}/api/green-api/123/getSettings/{}", relay, TOKEN))
        .header("content-type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid credentials");

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_json_error() {
    let (upstream, mut seen) = common::start_mock_upstream(MockReply::json(200, "{}")).await;
    let mut config = common::relay_config(upstream);
    config.relay.max_body_bytes = 64;
    let (relay, shutdown) = common::start_relay(config).await;

    let res = common::http_client()
        .post(relay_url(relay, "sendMessage"))
        .json(&json!({"httpMethod": "POST", "data": {"message": "x".repeat(1024)}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid request");
    assert!(seen.try_recv().is_err());

    shutdown.trigger();
}

#[tokio::test]
async fn test_encoded_slash_stays_in_token() {
    let (upstream, mut seen) = common::start_mock_upstream(MockReply::json(200, "{}")).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .post(format!("http://{}/api/green-api/{}/getSettings/a%2Fb", relay, ID))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let request = seen.recv().await.unwrap();
    assert_eq!(request.path, format!("/waInstance{}/getSettings/a%2Fb", ID));

    shutdown.trigger();
}

#[tokio::test]
async fn test_health() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let res = common::http_client()
        .get(format!("http://{}/health", relay))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_header() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::http_client();

    let res = client.get(format!("http://{}/health", relay)).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(generated.len(), 36);

    let res = client
        .get(format!("http://{}/health", relay))
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-42");

    shutdown.trigger();
}

#[tokio::test]
async fn test_static_assets() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;
    let client = common::http_client();

    let css = client.get(format!("http://{}/styles.css", relay)).send().await.unwrap();
    assert_eq!(css.status(), 200);
    assert_eq!(css.headers()["content-type"], "text/css");

    let js = client.get(format!("http://{}/script.js", relay)).send().await.unwrap();
    assert_eq!(js.status(), 200);
    assert_eq!(js.headers()["content-type"], "application/javascript");

    let index = client.get(format!("http://{}/", relay)).send().await.unwrap();
    assert_eq!(index.status(), 200);
    assert!(index.text().await.unwrap().contains("GREEN-API"));

    let missing = client.get(format!("http://{}/missing.css", relay)).send().await.unwrap();
    assert_eq!(missing.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_debug_listing_disabled_by_default() {
    let upstream = common::refused_addr().await;
    let mut config = common::relay_config(upstream);
    config.static_files.enabled = false;
    let (relay, shutdown) = common::start_relay(config).await;

    let res = common::http_client()
        .get(format!("http://{}/debug/files", relay))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_debug_listing() {
    let upstream = common::refused_addr().await;
    let mut config = common::relay_config(upstream);
    config.static_files.debug_listing = true;
    let (relay, shutdown) = common::start_relay(config).await;

    let res = common::http_client()
        .get(format!("http://{}/debug/files", relay))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["cssExists"], true);
    assert_eq!(body["jsExists"], true);
    assert!(body["files"].as_array().unwrap().iter().any(|f| f == "index.html"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_send_message_through_relay() {
    let (upstream, mut seen) =
        common::start_mock_upstream(MockReply::json(200, r#"{"idMessage":"ABC"}"#)).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let client = RelayClient::new(
        &format!("http://{}", relay),
        Credentials::new(ID, TOKEN).unwrap(),
    )
    .unwrap();

    let reply = client.send_message("+1 (234) 567-8901", "hello").await.unwrap();
    assert!(reply.is_success());
    assert_eq!(reply.body, json!({"idMessage": "ABC"}));

    let request = seen.recv().await.unwrap();
    assert_eq!(request.method, "POST");
    let forwarded: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(forwarded["chatId"], "12345678901@c.us");
    assert_eq!(forwarded["message"], "hello");

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_surfaces_relay_errors() {
    let upstream = common::refused_addr().await;
    let (relay, shutdown) = common::start_relay(common::relay_config(upstream)).await;

    let client = RelayClient::new(
        &format!("http://{}", relay),
        Credentials::new("123", TOKEN).unwrap(),
    )
    .unwrap();

    let reply = client.get_settings().await.unwrap();
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body["error"], "invalid credentials");

    shutdown.trigger();
}
