//! # National Check-Digit Algorithms
//!
//! Pure, deterministic functions mapping a base digit sequence to a
//! checksum-complete canonical identifier, one country module per
//! jurisdiction:
//!
//! - [`brazil`] — CPF and CNPJ (mod-11, positional weights)
//! - [`argentina`] — CUIT (mod-11) and DNI (structural)
//! - [`chile`] — RUT (mod-11 with the `K` sentinel)
//! - [`bolivia`] — CI and NIT (mod-11, cycled weights)
//! - [`usa`] — SSN and EIN (structural exclusion rules)
//!
//! Every `compute_*` function validates input length up front and returns
//! [`ValidationError`] on violation — wrong-length input is a fatal
//! precondition failure, never silently padded. Every `validate_*` function
//! re-derives the check digits from the base and is usable on externally
//! supplied numbers, independent of generation.

pub mod argentina;
pub mod bolivia;
pub mod brazil;
pub mod chile;
pub mod usa;

use crate::error::ValidationError;
use crate::identifier::Identifier;
use crate::scheme::DocumentScheme;

/// Compute the canonical checksum-complete identifier for `base` under
/// `scheme`.
///
/// The base must be exactly [`DocumentScheme::base_len`] ASCII digits
/// (for RUT, 1 to 8 digits are accepted; shorter historical numbers are
/// valid). Structural schemes (SSN, EIN, CUIT kind prefix) additionally
/// reject bases the issuing authority never assigns.
pub fn compute(scheme: DocumentScheme, base: &str) -> Result<Identifier, ValidationError> {
    let canonical = match scheme {
        DocumentScheme::Cpf => brazil::compute_cpf(base)?,
        DocumentScheme::Cnpj => brazil::compute_cnpj(base)?,
        DocumentScheme::Cuit => argentina::compute_cuit(base)?,
        DocumentScheme::Dni => argentina::compute_dni(base)?,
        DocumentScheme::Rut => chile::compute_rut(base)?,
        DocumentScheme::Ci => bolivia::compute_ci(base)?,
        DocumentScheme::Nit => bolivia::compute_nit(base)?,
        DocumentScheme::Ssn => usa::compute_ssn(base)?,
        DocumentScheme::Ein => usa::compute_ein(base)?,
    };
    Ok(Identifier::from_validated(scheme, canonical))
}

/// Validate a canonical identifier string against `scheme`'s rules.
///
/// This is the downstream validator's view: it accepts any number whose
/// check digits (or structure) satisfy the scheme, whether or not this
/// process generated it.
pub fn validate(scheme: DocumentScheme, value: &str) -> Result<(), ValidationError> {
    match scheme {
        DocumentScheme::Cpf => brazil::validate_cpf(value),
        DocumentScheme::Cnpj => brazil::validate_cnpj(value),
        DocumentScheme::Cuit => argentina::validate_cuit(value),
        DocumentScheme::Dni => argentina::validate_dni(value),
        DocumentScheme::Rut => chile::validate_rut(value),
        DocumentScheme::Ci => bolivia::validate_ci(value),
        DocumentScheme::Nit => bolivia::validate_nit(value),
        DocumentScheme::Ssn => usa::validate_ssn(value),
        DocumentScheme::Ein => usa::validate_ein(value),
    }
}

/// Parse `input` as exactly `expected` ASCII digits, returning their values.
pub(crate) fn digit_values(
    scheme: DocumentScheme,
    input: &str,
    expected: usize,
) -> Result<Vec<u8>, ValidationError> {
    if input.len() != expected {
        return Err(ValidationError::InvalidBaseLength {
            scheme,
            expected,
            actual: input.len(),
        });
    }
    digits_of(scheme, input)
}

/// Parse `input` as ASCII digits of any length, returning their values.
pub(crate) fn digits_of(
    scheme: DocumentScheme,
    input: &str,
) -> Result<Vec<u8>, ValidationError> {
    input
        .chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| ValidationError::NonDigitBase {
                    scheme,
                    value: input.to_string(),
                })
        })
        .collect()
}

/// Positional weighted sum of `digits` against `weights` (same length).
pub(crate) fn weighted_sum(digits: &[u8], weights: &[u8]) -> u32 {
    digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * u32::from(w))
        .sum()
}
