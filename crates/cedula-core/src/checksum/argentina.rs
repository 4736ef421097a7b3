//! Argentina — CUIT check digit and DNI structure.
//!
//! A CUIT is a two-digit kind prefix (20/23/24/27 for persons, 30/33/34 for
//! entities), an eight-digit number, and one mod-11 check digit. A DNI is
//! eight digits with no check digit at all; validity is purely structural.

use super::{digit_values, weighted_sum};
use crate::error::ValidationError;
use crate::scheme::DocumentScheme;

/// AFIP-assigned kind prefixes a CUIT may start with.
pub const CUIT_KINDS: [u8; 7] = [20, 23, 24, 27, 30, 33, 34];

/// CUIT check-digit weights over the 10 base digits.
const CUIT_WEIGHTS: [u8; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Compute a CUIT from its 10 base digits (kind prefix + 8-digit number).
///
/// Check digit is `11 - (sum mod 11)`, with 11 resolving to 0 and 10 to 9.
/// (AFIP reassigns the kind prefix when the remainder is 10; synthetic
/// numbers keep the kind and use 9, which validates under the same rule.)
pub fn compute_cuit(base: &str) -> Result<String, ValidationError> {
    let digits = digit_values(DocumentScheme::Cuit, base, 10)?;
    let kind = digits[0] * 10 + digits[1];
    if !CUIT_KINDS.contains(&kind) {
        return Err(ValidationError::StructurallyExcluded {
            scheme: DocumentScheme::Cuit,
            value: base.to_string(),
            reason: format!("kind prefix {kind:02} is never assigned"),
        });
    }
    let check = match 11 - (weighted_sum(&digits, &CUIT_WEIGHTS) % 11) {
        11 => 0,
        10 => 9,
        n => n,
    };
    Ok(format!("{base}{check}"))
}

/// Validate a canonical 11-digit CUIT.
pub fn validate_cuit(value: &str) -> Result<(), ValidationError> {
    if value.len() != 11 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Malformed {
            scheme: DocumentScheme::Cuit,
            value: value.to_string(),
            reason: "expected 11 digits".to_string(),
        });
    }
    let expected = compute_cuit(&value[..10])?;
    if expected != value {
        return Err(ValidationError::CheckDigitMismatch {
            scheme: DocumentScheme::Cuit,
            value: value.to_string(),
            expected: expected[10..].to_string(),
        });
    }
    Ok(())
}

/// Rewrite the kind prefix of a 10-digit CUIT base to an assigned one,
/// leaving the eight-digit number untouched. Bases already carrying a valid
/// kind pass through unchanged. Generation support.
pub fn normalize_cuit(base: &str) -> Result<String, ValidationError> {
    let digits = digit_values(DocumentScheme::Cuit, base, 10)?;
    let kind = digits[0] * 10 + digits[1];
    if CUIT_KINDS.contains(&kind) {
        return Ok(base.to_string());
    }
    let replacement = CUIT_KINDS[usize::from(kind) % CUIT_KINDS.len()];
    Ok(format!("{replacement:02}{}", &base[2..]))
}

/// A DNI has no check digit; "compute" is structural validation only.
pub fn compute_dni(base: &str) -> Result<String, ValidationError> {
    digit_values(DocumentScheme::Dni, base, 8)?;
    Ok(base.to_string())
}

/// Validate a canonical 8-digit DNI.
pub fn validate_dni(value: &str) -> Result<(), ValidationError> {
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Malformed {
            scheme: DocumentScheme::Dni,
            value: value.to_string(),
            reason: "expected 8 digits".to_string(),
        });
    }
    Ok(())
}
