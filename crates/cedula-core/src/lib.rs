#![deny(missing_docs)]

//! # cedula-core — Foundational Types for the Cedula Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One closed [`DocumentScheme`] enum.** Nine variants, exhaustive
//!    `match` everywhere. An unknown scheme is unrepresentable, so checksum
//!    dispatch can never be asked about a scheme it does not know.
//!
//! 2. **[`Identifier`] values are valid by construction.** The only public
//!    constructors run the scheme's full check-digit (or structural)
//!    verification. Holding an `Identifier` is proof the number would pass
//!    the downstream validator.
//!
//! 3. **Check-digit math is pure.** Every function in [`checksum`] maps the
//!    same input to the same output with no side effects, so validation can
//!    run independently of generation.
//!
//! 4. **Time is injected.** The [`Clock`] trait abstracts the wall and
//!    monotonic clocks so generation is deterministic under test.

pub mod checksum;
pub mod clock;
pub mod error;
pub mod identifier;
pub mod scheme;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ValidationError;
pub use identifier::Identifier;
pub use scheme::{Country, DocumentScheme};
