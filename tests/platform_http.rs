//! HTTP platform client against a mock server: envelope decoding and
//! failure classification.

use herald::platform::{Draft, HttpPlatformClient, PlatformClient, PlatformError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpPlatformClient {
    HttpPlatformClient::new("test-bearer")
        .unwrap()
        .with_base_url(&server.uri())
}

#[tokio::test]
async fn me_is_decoded_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "id": "42", "username": "ninedttt" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let me = client.me().await.unwrap();
    assert_eq!(me.id, "42");
    assert_eq!(me.username, "ninedttt");

    // Second call served from the cache, not the server (expect(1)).
    let again = client.me().await.unwrap();
    assert_eq!(again.id, "42");
}

#[tokio::test]
async fn publish_sends_text_and_reply_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_partial_json(serde_json::json!({
            "text": "hello grid",
            "reply": { "in_reply_to_tweet_id": "m7" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": { "id": "p1" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let post = client
        .publish(&Draft::new("hello grid").in_reply_to("m7"))
        .await
        .unwrap();
    assert_eq!(post.id, "p1");
}

#[tokio::test]
async fn duplicate_content_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"detail":"You are not allowed to create a Tweet with duplicate content."}"#,
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .publish(&Draft::new("same thing"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::DuplicateContent));
}

#[tokio::test]
async fn rate_limit_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("anything", 20).await.unwrap_err();
    assert!(matches!(err, PlatformError::RateLimited(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn empty_mention_timeline_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/42/mentions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let mentions = client_for(&server).mentions("42", 50).await.unwrap();
    assert!(mentions.is_empty());
}

#[tokio::test]
async fn mentions_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/42/mentions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "id": "m1", "author_id": "u1", "text": "@ninedttt gm" },
                { "id": "m2", "author_id": "u2", "text": "@ninedttt help" }
            ]
        })))
        .mount(&server)
        .await;

    let mentions = client_for(&server).mentions("42", 50).await.unwrap();
    assert_eq!(mentions.len(), 2);
    assert_eq!(mentions[0].id, "m1");
    assert_eq!(mentions[1].text, "@ninedttt help");
}
