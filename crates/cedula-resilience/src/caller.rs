//! The resilient caller.
//!
//! Drives one logical call through the attempt loop:
//! `Idle -> Attempting -> {Success, RateLimited -> Attempting, Stopped}`.
//! Each transition is decided by the pure [`RetryPolicyEngine`]; this module
//! owns only the side effects — issuing the request, the scoped sleep, and
//! the cancellation boundary.
//!
//! A persistent 429 is a reportable business outcome, not a fault: after
//! the attempt bound the last response is returned with its status intact,
//! never converted into an error. Only transport-level failures (the call
//! could not be made at all) propagate as [`TransportError`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::policy::{RetryDecision, RetryPolicyEngine};
use crate::transport::{CallRequest, CallResponse, Transport, TransportError};

/// How a resilient call reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// A non-throttling response arrived.
    Success,
    /// Attempts were exhausted (or retry was disabled) while the remote
    /// kept throttling; the last 429 is the final response.
    Stopped,
    /// The backoff sleep was cancelled; the last response obtained is
    /// returned as a partial result.
    Cancelled,
}

/// The terminal result of one logical call.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// The last response received, whatever its status.
    pub response: CallResponse,
    /// How many attempts were issued (1-based).
    pub attempts: u32,
    /// How the loop terminated.
    pub outcome: CallOutcome,
}

impl ResolvedCall {
    /// Whether the loop ended on a non-throttling response.
    pub fn is_success(&self) -> bool {
        self.outcome == CallOutcome::Success
    }
}

/// Drives a request through the transport until the policy engine says the
/// call is resolved.
///
/// Holds no per-call state: one caller serves any number of concurrent
/// logical calls, and nothing is locked across the backoff sleep.
#[derive(Clone)]
pub struct ResilientCaller {
    transport: Arc<dyn Transport>,
    engine: RetryPolicyEngine,
}

impl ResilientCaller {
    /// A caller over `transport` governed by `config`.
    pub fn new(transport: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self {
            transport,
            engine: RetryPolicyEngine::new(config),
        }
    }

    /// The policy engine governing this caller.
    pub fn engine(&self) -> &RetryPolicyEngine {
        &self.engine
    }

    /// Execute the request to resolution with no external cancellation.
    pub async fn execute(&self, request: &CallRequest) -> Result<ResolvedCall, TransportError> {
        self.execute_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Execute the request to resolution; if `cancel` fires during a
    /// backoff sleep, the loop stops immediately and the last response is
    /// returned as a partial result.
    pub async fn execute_cancellable(
        &self,
        request: &CallRequest,
        cancel: &CancellationToken,
    ) -> Result<ResolvedCall, TransportError> {
        let endpoint = request.endpoint();
        let mut attempt: u32 = 1;
        loop {
            let response = self.transport.send(request).await?;
            match self.engine.decide(attempt, &response) {
                RetryDecision::Complete => {
                    debug!(endpoint = %endpoint, attempt, status = response.status, "call resolved");
                    return Ok(ResolvedCall {
                        response,
                        attempts: attempt,
                        outcome: CallOutcome::Success,
                    });
                }
                RetryDecision::Stop => {
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        "still throttled with no attempts left; surfacing last response"
                    );
                    return Ok(ResolvedCall {
                        response,
                        attempts: attempt,
                        outcome: CallOutcome::Stopped,
                    });
                }
                RetryDecision::Backoff { delay, source } => {
                    debug!(
                        endpoint = %endpoint,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %source,
                        "throttled; backing off before next attempt"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            attempt += 1;
                        }
                        _ = cancel.cancelled() => {
                            warn!(endpoint = %endpoint, attempt, "cancelled during backoff");
                            return Ok(ResolvedCall {
                                response,
                                attempts: attempt,
                                outcome: CallOutcome::Cancelled,
                            });
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    /// Replays a scripted sequence of responses; the last entry repeats if
    /// the caller keeps asking.
    struct ScriptedTransport {
        script: Mutex<VecDeque<CallResponse>>,
        last: CallResponse,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<CallResponse>) -> Self {
            let last = responses.last().expect("script must not be empty").clone();
            Self {
                script: Mutex::new(responses.into()),
                last,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, _request: &CallRequest) -> Result<CallResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| self.last.clone()))
        }
    }

    fn ok() -> CallResponse {
        CallResponse {
            status: 200,
            headers: vec![],
            body: r#"{"status":"sent"}"#.to_string(),
        }
    }

    fn throttled() -> CallResponse {
        CallResponse {
            status: 429,
            headers: vec![],
            body: String::new(),
        }
    }

    fn fast_config() -> RetryConfig {
        RetryConfig::new()
            .with_initial_delay_ms(10)
            .with_environment(Environment::Test)
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let caller = ResilientCaller::new(transport.clone(), fast_config());

        let resolved = caller.execute(&CallRequest::get("/v1/otp")).await.unwrap();
        assert!(resolved.is_success());
        assert_eq!(resolved.attempts, 1);
        assert_eq!(resolved.response.status, 200);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_throttling() {
        let transport = Arc::new(ScriptedTransport::new(vec![throttled(), ok()]));
        let caller = ResilientCaller::new(transport.clone(), fast_config());

        let resolved = caller.execute(&CallRequest::get("/v1/otp")).await.unwrap();
        assert_eq!(resolved.outcome, CallOutcome::Success);
        assert_eq!(resolved.attempts, 2);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_last_throttled_response() {
        let transport = Arc::new(ScriptedTransport::new(vec![throttled()]));
        let caller = ResilientCaller::new(transport.clone(), fast_config());

        let resolved = caller.execute(&CallRequest::get("/v1/otp")).await.unwrap();
        assert_eq!(resolved.outcome, CallOutcome::Stopped);
        assert_eq!(resolved.attempts, 3);
        assert_eq!(resolved.response.status, 429);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn disabled_retry_makes_a_single_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![throttled()]));
        let caller = ResilientCaller::new(transport.clone(), RetryConfig::disabled());

        let resolved = caller.execute(&CallRequest::get("/v1/otp")).await.unwrap();
        assert_eq!(resolved.outcome, CallOutcome::Stopped);
        assert_eq!(resolved.attempts, 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn non_throttling_error_statuses_resolve_immediately() {
        let transport = Arc::new(ScriptedTransport::new(vec![CallResponse {
            status: 503,
            headers: vec![],
            body: String::new(),
        }]));
        let caller = ResilientCaller::new(transport.clone(), fast_config());

        let resolved = caller.execute(&CallRequest::get("/v1/otp")).await.unwrap();
        // only 429 is the throttling signal; everything else is terminal
        assert_eq!(resolved.outcome, CallOutcome::Success);
        assert_eq!(resolved.response.status, 503);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_returns_partial_result() {
        // long backoff so the cancel lands mid-sleep
        let config = RetryConfig::new()
            .with_initial_delay_ms(60_000)
            .with_environment(Environment::Test)
            .with_max_attempts(5);
        let transport = Arc::new(ScriptedTransport::new(vec![throttled()]));
        let caller = ResilientCaller::new(transport.clone(), config);

        let cancel = CancellationToken::new();
        let task = {
            let caller = caller.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                caller
                    .execute_cancellable(&CallRequest::get("/v1/otp"), &cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let resolved = task.await.expect("task completed").unwrap();
        assert_eq!(resolved.outcome, CallOutcome::Cancelled);
        assert_eq!(resolved.attempts, 1);
        assert_eq!(resolved.response.status, 429);
        assert_eq!(transport.calls(), 1);
    }
}
