//! Contract tests for ResilientCaller over the real HTTP transport.
//!
//! ## Behavior Tested
//!
//! | Remote behavior | Expected resolution |
//! |-----------------|---------------------|
//! | 200 immediately | Success, 1 attempt |
//! | 429 then 200 | Success, 2 attempts, `Retry-After` honored |
//! | 429 with `retryPolicy` body then 200 | Success, 2 attempts |
//! | 429 persistently | Stopped, last 429 surfaced unmodified |
//! | 429 with retry disabled | Stopped after exactly 1 request |

use std::sync::Arc;

use cedula_resilience::{
    CallOutcome, CallRequest, Environment, HttpTransport, HttpTransportConfig, ResilientCaller,
    RetryConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn caller_for(server: &MockServer, config: RetryConfig) -> ResilientCaller {
    let transport = HttpTransport::new(
        HttpTransportConfig::new(server.uri().parse().expect("mock server URI"))
            .with_timeout_secs(5),
    )
    .expect("transport builds");
    ResilientCaller::new(Arc::new(transport), config)
}

fn fast_test_config() -> RetryConfig {
    RetryConfig::new()
        .with_initial_delay_ms(5)
        .with_environment(Environment::Test)
}

#[tokio::test]
async fn resolves_immediately_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/otp/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "sent",
            "channel": "sms"
        })))
        .mount(&server)
        .await;

    let caller = caller_for(&server, fast_test_config());
    let request = CallRequest::post("/v1/otp/request", serde_json::json!({"channel": "sms"}));
    let resolved = caller.execute(&request).await.expect("transport ok");

    assert_eq!(resolved.outcome, CallOutcome::Success);
    assert_eq!(resolved.attempts, 1);
    assert_eq!(resolved.response.status, 200);
    assert!(resolved.response.body.contains("sent"));
}

#[tokio::test]
async fn honors_retry_after_header_then_recovers() {
    let server = MockServer::start().await;
    // first request is throttled with an immediate retry hint
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_string("slow down"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "verified"
        })))
        .mount(&server)
        .await;

    let config = RetryConfig::new()
        .with_initial_delay_ms(5)
        .with_environment(Environment::Production);
    let caller = caller_for(&server, config);
    let resolved = caller
        .execute(&CallRequest::get("/v1/otp/status"))
        .await
        .expect("transport ok");

    assert_eq!(resolved.outcome, CallOutcome::Success);
    assert_eq!(resolved.attempts, 2);
    assert_eq!(resolved.response.status, 200);
}

#[tokio::test]
async fn honors_server_retry_policy_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "message": "rate limit exceeded",
            "retryPolicy": {"initialDelay": "PT0S", "maxDelay": "PT0S"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let config = RetryConfig::new()
        .with_initial_delay_ms(5)
        .with_environment(Environment::Staging);
    let caller = caller_for(&server, config);
    let resolved = caller
        .execute(&CallRequest::get("/v1/otp/status"))
        .await
        .expect("transport ok");

    assert_eq!(resolved.outcome, CallOutcome::Success);
    assert_eq!(resolved.attempts, 2);
}

#[tokio::test]
async fn persistent_throttling_surfaces_last_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string(r#"{"message":"rate limit exceeded"}"#),
        )
        .expect(3)
        .mount(&server)
        .await;

    let caller = caller_for(&server, fast_test_config());
    let resolved = caller
        .execute(&CallRequest::get("/v1/otp/status"))
        .await
        .expect("transport ok");

    // exhaustion is a reportable outcome, not an error
    assert_eq!(resolved.outcome, CallOutcome::Stopped);
    assert_eq!(resolved.attempts, 3);
    assert_eq!(resolved.response.status, 429);
    assert!(resolved.response.body.contains("rate limit exceeded"));
}

#[tokio::test]
async fn disabled_retry_stops_after_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/otp/status"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let caller = caller_for(&server, RetryConfig::disabled());
    let resolved = caller
        .execute(&CallRequest::get("/v1/otp/status"))
        .await
        .expect("transport ok");

    assert_eq!(resolved.outcome, CallOutcome::Stopped);
    assert_eq!(resolved.attempts, 1);
    assert_eq!(resolved.response.status, 429);
}

#[tokio::test]
async fn request_headers_and_body_reach_the_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/otp/request"))
        .and(wiremock::matchers::header("X-Trace-Id", "trace-123"))
        .and(wiremock::matchers::body_json(
            serde_json::json!({"channel": "email"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let caller = caller_for(&server, fast_test_config());
    let request = CallRequest::post("/v1/otp/request", serde_json::json!({"channel": "email"}))
        .with_header("X-Trace-Id", "trace-123");
    let resolved = caller.execute(&request).await.expect("transport ok");
    assert!(resolved.is_success());
}
