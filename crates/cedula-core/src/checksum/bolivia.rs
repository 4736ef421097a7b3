//! Bolivia — CI and NIT check digits.
//!
//! Both use the same mod-11 rule with weights cycling 2 through 9 from the
//! rightmost base digit: `11 - remainder`, with 11 resolving to 0 and 10 to 1.
//! A CI has a 7-digit base, a NIT a 9-digit base; one check digit each.

use super::{digit_values, weighted_sum};
use crate::error::ValidationError;
use crate::scheme::DocumentScheme;

/// Mod-11 check digit with weights cycling 2..=9 from the rightmost digit.
fn mod11_cycled(digits: &[u8]) -> u8 {
    let reversed: Vec<u8> = digits.iter().rev().copied().collect();
    let weights: Vec<u8> = (0..reversed.len()).map(|i| 2 + (i % 8) as u8).collect();
    match 11 - (weighted_sum(&reversed, &weights) % 11) {
        11 => 0,
        10 => 1,
        n => n as u8,
    }
}

/// Compute a canonical 8-digit CI from its 7 base digits.
pub fn compute_ci(base: &str) -> Result<String, ValidationError> {
    let digits = digit_values(DocumentScheme::Ci, base, 7)?;
    Ok(format!("{base}{}", mod11_cycled(&digits)))
}

/// Validate a canonical 8-digit CI.
pub fn validate_ci(value: &str) -> Result<(), ValidationError> {
    validate_single_digit(DocumentScheme::Ci, value, 8, compute_ci)
}

/// Compute a canonical 10-digit NIT from its 9 base digits.
pub fn compute_nit(base: &str) -> Result<String, ValidationError> {
    let digits = digit_values(DocumentScheme::Nit, base, 9)?;
    Ok(format!("{base}{}", mod11_cycled(&digits)))
}

/// Validate a canonical 10-digit NIT.
pub fn validate_nit(value: &str) -> Result<(), ValidationError> {
    validate_single_digit(DocumentScheme::Nit, value, 10, compute_nit)
}

fn validate_single_digit(
    scheme: DocumentScheme,
    value: &str,
    total_len: usize,
    compute: impl Fn(&str) -> Result<String, ValidationError>,
) -> Result<(), ValidationError> {
    if value.len() != total_len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Malformed {
            scheme,
            value: value.to_string(),
            reason: format!("expected {total_len} digits"),
        });
    }
    let expected = compute(&value[..total_len - 1])?;
    if expected != value {
        return Err(ValidationError::CheckDigitMismatch {
            scheme,
            value: value.to_string(),
            expected: expected[total_len - 1..].to_string(),
        });
    }
    Ok(())
}
