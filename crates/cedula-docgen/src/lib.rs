//! # cedula-docgen — Synthetic Document-Number Generation
//!
//! Produces unique, checksum-valid national document numbers under
//! concurrent callers, with no coordination beyond process memory.
//!
//! ## How a number is born
//!
//! 1. A candidate base is derived from a blend of the wall clock, a
//!    once-per-process fingerprint, and a shared counter advanced on every
//!    attempt. The blend spreads candidates across the numeric range; it is
//!    deliberately not cryptographic.
//! 2. The scheme's check-digit algorithm (`cedula-core`) completes the
//!    candidate into canonical form.
//! 3. The candidate is claimed against the per-scheme used-identifier
//!    registry in a single atomic check-and-insert. A lost race is just
//!    another collision.
//! 4. After 1000 failed attempts the generator falls back once to the
//!    monotonic nanosecond clock and accepts that candidate
//!    unconditionally — forward progress over exhaustive uniqueness.
//!
//! ## State
//!
//! All state lives in an explicitly constructed [`DocumentNumberGenerator`]
//! (no module-level singletons). Share one instance per process behind an
//! `Arc`; [`DocumentNumberGenerator::reset`] clears a scheme's used-set and
//! the shared counter between independent test runs.

pub mod fingerprint;
pub mod generator;
pub mod registry;

pub use fingerprint::process_fingerprint;
pub use generator::{DocumentNumberGenerator, MAX_COLLISION_ATTEMPTS};
pub use registry::UsedIdentifierRegistry;
