use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_client(base_url: &str) -> ChannelClient {
    ChannelClient::new(base_url, 5, RetryPolicy::immediate())
        .expect("client construction should not fail")
}

#[test]
fn build_url_encodes_query_parameters() {
    let client = test_client("http://localhost:1234/");
    let url = client
        .build_url("/api/v1/search", &[("keyword", "智能水杯".to_owned())])
        .unwrap();
    assert!(url.as_str().starts_with("http://localhost:1234/api/v1/search?keyword="));
    assert!(!url.as_str().contains('杯'), "query must be percent-encoded: {url}");
}

#[test]
fn build_url_rejects_garbage_base() {
    let client = test_client("not-a-url");
    let err = client.build_url("/x", &[]).unwrap_err();
    assert!(matches!(err, ChannelError::InvalidUrl { .. }));
}

#[tokio::test]
async fn returns_parsed_json_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/ping"))
        .and(query_param("a", "b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let body = client
        .get_json("/api/v1/ping", &[("a", "b".to_owned())], "tok", &mut tracker)
        .await
        .unwrap();

    assert_eq!(body["ok"], json!(true));
    assert_eq!(tracker.api_calls, 1);
    assert!(!tracker.rate_limited);
}

#[tokio::test]
async fn persistent_rate_limit_stops_after_retry_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/limited"))
        .respond_with(ResponseTemplate::new(429))
        .expect(4) // 1 initial attempt + 3 retries, then give up
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let err = client
        .get_json("/api/v1/limited", &[], "tok", &mut tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, ChannelError::RateLimited { attempts: 4, .. }));
    assert_eq!(tracker.api_calls, 4);
    assert!(tracker.rate_limited);
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let body = client
        .get_json("/api/v1/flaky", &[], "tok", &mut tracker)
        .await
        .unwrap();

    assert_eq!(body["ok"], json!(1));
    assert_eq!(tracker.api_calls, 3);
    assert!(!tracker.rate_limited);
}

#[tokio::test]
async fn persistent_server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let err = client
        .get_json("/api/v1/down", &[], "tok", &mut tracker)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChannelError::UpstreamServer {
            status: 500,
            attempts: 4,
            ..
        }
    ));
}

#[tokio::test]
async fn client_error_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // no retry for non-429 4xx
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let err = client
        .get_json("/api/v1/missing", &[], "tok", &mut tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, ChannelError::UnexpectedStatus { status: 404, .. }));
    assert_eq!(tracker.api_calls, 1);
}

#[tokio::test]
async fn invalid_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut tracker = CallTracker::default();
    let err = client
        .get_json("/api/v1/garbled", &[], "tok", &mut tracker)
        .await
        .unwrap_err();

    assert!(matches!(err, ChannelError::Deserialize { .. }));
}
