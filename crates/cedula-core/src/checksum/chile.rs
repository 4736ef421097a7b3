//! Chile — RUT check digit.
//!
//! The RUT check digit is computed mod 11 with weights cycling 2,3,4,5,6,7
//! from the rightmost base digit. `11 - remainder` resolves to the literal
//! character `K` when it lands on 10 and to `0` when it lands on 11 (Registro
//! Civil rule). Canonical form is `"NNNNNNNN-C"`.

use super::digits_of;
use crate::error::ValidationError;
use crate::scheme::DocumentScheme;

/// Compute the RUT check character for a base of 1 to 8 digits.
pub fn check_char(base: &str) -> Result<char, ValidationError> {
    let digits = base_digits(base)?;
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (2 + (i as u32 % 6)))
        .sum();
    Ok(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        n => char::from(b'0' + n as u8),
    })
}

/// Compute a canonical RUT (`"12345670-K"`) from its base digits.
pub fn compute_rut(base: &str) -> Result<String, ValidationError> {
    let check = check_char(base)?;
    Ok(format!("{base}-{check}"))
}

/// Validate a canonical RUT of the form `"NNNNNNNN-C"`.
pub fn validate_rut(value: &str) -> Result<(), ValidationError> {
    let (base, check) = value.rsplit_once('-').ok_or_else(|| malformed(value, "missing check separator"))?;
    let mut chars = check.chars();
    let (check_char_given, rest) = (chars.next(), chars.next());
    let check_char_given = match (check_char_given, rest) {
        (Some(c), None) if c.is_ascii_digit() || c == 'K' => c,
        _ => return Err(malformed(value, "check must be one digit or K")),
    };
    let expected = check_char(base)?;
    if expected != check_char_given {
        return Err(ValidationError::CheckDigitMismatch {
            scheme: DocumentScheme::Rut,
            value: value.to_string(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}

fn base_digits(base: &str) -> Result<Vec<u8>, ValidationError> {
    if base.is_empty() || base.len() > 8 {
        return Err(malformed(base, "expected 1 to 8 base digits"));
    }
    digits_of(DocumentScheme::Rut, base)
}

fn malformed(value: &str, reason: &str) -> ValidationError {
    ValidationError::Malformed {
        scheme: DocumentScheme::Rut,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
