//! # Error Hierarchy
//!
//! Structured error types for the Cedula Stack core, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every variant carries the offending input and enough context to diagnose
//! the failure without reproducing it. A validation failure is a fatal
//! precondition violation: it is returned immediately and never retried,
//! padded, or coerced.

use thiserror::Error;

use crate::scheme::DocumentScheme;

/// Validation errors for document-number inputs.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The base digit sequence has the wrong length for the scheme.
    #[error("invalid base length for {scheme}: expected {expected} digits, got {actual}")]
    InvalidBaseLength {
        /// The scheme whose precondition was violated.
        scheme: DocumentScheme,
        /// Digits the scheme requires.
        expected: usize,
        /// Digits actually supplied.
        actual: usize,
    },

    /// The base contains a character that is not an ASCII digit.
    #[error("non-digit character in {scheme} base: \"{value}\"")]
    NonDigitBase {
        /// The scheme being computed.
        scheme: DocumentScheme,
        /// The offending input.
        value: String,
    },

    /// A full identifier does not have the scheme's canonical shape.
    #[error("malformed {scheme} identifier: \"{value}\" ({reason})")]
    Malformed {
        /// The scheme the value claimed to be.
        scheme: DocumentScheme,
        /// The offending input.
        value: String,
        /// What about the shape was wrong.
        reason: String,
    },

    /// Recomputing the check digits did not reproduce the stored ones.
    #[error("check digit mismatch for {scheme}: \"{value}\" (expected \"{expected}\")")]
    CheckDigitMismatch {
        /// The scheme whose rule was applied.
        scheme: DocumentScheme,
        /// The full identifier that failed.
        value: String,
        /// The check digits the rule actually produces.
        expected: String,
    },

    /// The value is well-formed but falls in a range the issuing authority
    /// never assigns (SSN area/group/serial exclusions, EIN prefix
    /// blacklist, CUIT kind prefixes).
    #[error("structurally excluded {scheme} value: \"{value}\" ({reason})")]
    StructurallyExcluded {
        /// The scheme whose assignment rules exclude the value.
        scheme: DocumentScheme,
        /// The offending input.
        value: String,
        /// Which exclusion rule fired.
        reason: String,
    },

    /// A scheme name could not be parsed.
    #[error("unknown document scheme: \"{0}\"")]
    UnknownScheme(String),
}
