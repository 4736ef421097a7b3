//! # cedula-resilience — Rate-Limit-Aware Retry Engine
//!
//! Governs retrying a single logical HTTP call when the remote service
//! signals throttling (429), reconciling three independent delay sources —
//! fixed exponential backoff, the server-advertised `retryPolicy` object,
//! and the `Retry-After` header — into one chosen wait.
//!
//! ## Architecture
//!
//! - [`RetryPolicyEngine`] is the pure decision function: attempt number
//!   and previous response in, [`RetryDecision`] out. No clock, no I/O.
//! - [`ResilientCaller`] owns the side effects: issuing requests through a
//!   [`Transport`], the scoped backoff sleep, and the cancellation
//!   boundary.
//! - [`HttpTransport`] is the `reqwest` implementation of the transport
//!   seam; tests script their own.
//!
//! ## Contract with callers
//!
//! Callers always receive a [`ResolvedCall`] carrying a real response and
//! must inspect its status themselves: a persistent 429 after the attempt
//! bound is a business outcome, never converted into an error. Only
//! transport-level failures surface as [`TransportError`].

pub mod caller;
pub mod config;
pub mod http;
pub mod policy;
pub mod transport;

pub use caller::{CallOutcome, ResilientCaller, ResolvedCall};
pub use config::{ConfigError, Environment, RetryConfig};
pub use http::{HttpTransport, HttpTransportConfig};
pub use policy::{
    parse_iso8601_duration, parse_retry_after_secs, DelaySource, RetryDecision,
    RetryPolicyEngine, ServerRetryPolicy, DELAY_CEILING,
};
pub use transport::{
    CallRequest, CallResponse, HttpMethod, Transport, TransportError, THROTTLED_STATUS,
};
