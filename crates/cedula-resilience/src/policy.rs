//! Retry policy engine.
//!
//! A pure decision function: given the attempt number and the previous
//! attempt's response, decide whether to retry and how long to wait first.
//! No clock, no sleeping, no I/O — the caller owns side effects, which is
//! what makes the policy unit-testable without real time passing.
//!
//! ## Delay precedence for throttled responses
//!
//! 1. Retry disabled → stop after the single attempt.
//! 2. Attempts exhausted → stop; the last response is surfaced unmodified.
//! 3. Low-volume environments (local/dev/test) → always plain exponential
//!    backoff. Server-advertised delays are tuned for production rate
//!    tables and would stall a test run for minutes.
//! 4. Otherwise reconcile the structured `retryPolicy` body object
//!    (`maxDelay` preferred over `initialDelay`) with the `Retry-After`
//!    header (integer seconds, honored only at or below the ceiling);
//!    when both are present the smaller wins. Malformed values fall back
//!    silently to exponential backoff.
//! 5. Whatever the source, the delay is clamped to [`DELAY_CEILING`] so
//!    automated runs stay bounded.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::RetryConfig;
use crate::transport::CallResponse;

/// Hard ceiling on any single retry delay (5 minutes).
pub const DELAY_CEILING: Duration = Duration::from_secs(300);

/// Where a chosen delay came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelaySource {
    /// Computed `initial_delay * 2^(attempt-1)`.
    ExponentialBackoff,
    /// The structured `retryPolicy` object in the response body.
    ServerPolicy,
    /// The `Retry-After` response header.
    RetryAfterHeader,
}

impl fmt::Display for DelaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExponentialBackoff => write!(f, "exponential-backoff"),
            Self::ServerPolicy => write!(f, "server-policy"),
            Self::RetryAfterHeader => write!(f, "retry-after-header"),
        }
    }
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// The outcome was not throttling; the call is complete.
    Complete,
    /// Do not retry: attempts exhausted or retry disabled. The last
    /// response stands as the final result.
    Stop,
    /// Wait `delay`, then attempt again.
    Backoff {
        /// How long to wait before the next attempt.
        delay: Duration,
        /// Which of the three delay sources produced the wait.
        source: DelaySource,
    },
}

/// The server-advertised retry policy, as sent in 429 response bodies.
///
/// Delay fields are ISO-8601 durations (e.g. `"PT10M"`). They stay raw
/// strings here; parsing happens at decision time so a malformed value can
/// fall back silently instead of failing deserialization of the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerRetryPolicy {
    /// Suggested first-retry delay.
    pub initial_delay: Option<String>,
    /// Suggested maximum delay; preferred over `initial_delay` when both
    /// are present.
    pub max_delay: Option<String>,
}

impl ServerRetryPolicy {
    /// The delay this policy advertises, preferring `maxDelay`.
    /// Malformed values are logged at debug level and ignored.
    pub fn advertised_delay(&self) -> Option<Duration> {
        for (field, raw) in [
            ("maxDelay", self.max_delay.as_deref()),
            ("initialDelay", self.initial_delay.as_deref()),
        ] {
            let Some(raw) = raw else { continue };
            match parse_iso8601_duration(raw) {
                Some(delay) => return Some(delay),
                None => {
                    debug!(field, value = raw, "unparseable retryPolicy duration; ignoring");
                }
            }
        }
        None
    }
}

/// Decides retry behavior from configuration alone; owns no mutable state,
/// so one engine serves any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct RetryPolicyEngine {
    config: RetryConfig,
}

impl RetryPolicyEngine {
    /// Engine over the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Decide what to do after `attempt` (1-based) produced `response`.
    pub fn decide(&self, attempt: u32, response: &CallResponse) -> RetryDecision {
        if !response.is_throttled() {
            return RetryDecision::Complete;
        }
        if !self.config.enabled {
            debug!("retry disabled; surfacing throttled response");
            return RetryDecision::Stop;
        }
        if attempt >= self.config.max_attempts {
            return RetryDecision::Stop;
        }

        let exponential = self.exponential_delay(attempt);
        let (delay, source) = if self.config.environment.is_low_volume() {
            // Server-advertised delays reflect production rate tables;
            // honoring them in a test environment stalls the run.
            (exponential, DelaySource::ExponentialBackoff)
        } else {
            let advertised = response
                .server_retry_policy()
                .and_then(|policy| policy.advertised_delay());
            let header = self.header_delay(response);
            match (advertised, header) {
                (Some(policy), Some(header)) if header <= policy => {
                    (header, DelaySource::RetryAfterHeader)
                }
                (Some(policy), _) => (policy, DelaySource::ServerPolicy),
                (None, Some(header)) => (header, DelaySource::RetryAfterHeader),
                (None, None) => (exponential, DelaySource::ExponentialBackoff),
            }
        };

        RetryDecision::Backoff {
            delay: delay.min(DELAY_CEILING),
            source,
        }
    }

    /// `initial_delay * 2^(attempt-1)`, saturating; the ceiling clamp in
    /// [`RetryPolicyEngine::decide`] bounds the result anyway.
    pub fn exponential_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        Duration::from_millis(self.config.initial_delay_ms.saturating_mul(1 << exponent))
    }

    /// `Retry-After` as a duration, honored only at or below the ceiling.
    fn header_delay(&self, response: &CallResponse) -> Option<Duration> {
        let raw = response.retry_after()?;
        match parse_retry_after_secs(raw) {
            Some(delay) if delay <= DELAY_CEILING => Some(delay),
            Some(delay) => {
                debug!(
                    retry_after_secs = delay.as_secs(),
                    "Retry-After exceeds the delay ceiling; ignoring"
                );
                None
            }
            None => {
                debug!(value = raw, "unparseable Retry-After header; ignoring");
                None
            }
        }
    }
}

/// Parse a `Retry-After` value in integer-seconds form.
pub fn parse_retry_after_secs(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Parse an ISO-8601 duration of the form `PnDTnHnMnS` (any subset of the
/// designators, integer values, optional fractional seconds).
///
/// Returns `None` for anything else — including negative durations, week
/// designators, and empty `P`/`PT` — so malformed server hints degrade to
/// exponential backoff rather than an error.
pub fn parse_iso8601_duration(raw: &str) -> Option<Duration> {
    let rest = raw.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };
    if date_part.is_empty() && time_part.map_or(true, str::is_empty) {
        return None;
    }

    let mut millis: u64 = 0;

    if !date_part.is_empty() {
        let days_raw = date_part.strip_suffix('D')?;
        let days: u64 = days_raw.parse().ok()?;
        millis = millis.checked_add(days.checked_mul(86_400_000)?)?;
    }

    if let Some(time_part) = time_part {
        let mut rest = time_part;
        let mut seen_any = false;
        for (designator, scale) in [('H', 3_600_000u64), ('M', 60_000), ('S', 1_000)] {
            let Some(end) = rest.find(designator) else { continue };
            let number = &rest[..end];
            let value_millis = if designator == 'S' {
                parse_seconds_with_fraction(number)?
            } else {
                number.parse::<u64>().ok()?.checked_mul(scale)?
            };
            millis = millis.checked_add(value_millis)?;
            rest = &rest[end + 1..];
            seen_any = true;
        }
        if !rest.is_empty() || !seen_any {
            return None;
        }
    }

    Some(Duration::from_millis(millis))
}

/// `"2"` or `"2.5"` seconds, to milliseconds.
fn parse_seconds_with_fraction(number: &str) -> Option<u64> {
    match number.split_once('.') {
        None => number.parse::<u64>().ok()?.checked_mul(1_000),
        Some((whole, frac)) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let whole: u64 = whole.parse().ok()?;
            let frac_millis: u64 = format!("{frac:0<3}")[..3].parse().ok()?;
            whole.checked_mul(1_000)?.checked_add(frac_millis)
        }
    }
}
