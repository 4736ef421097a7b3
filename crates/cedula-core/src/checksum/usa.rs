//! United States — SSN and EIN structural rules.
//!
//! Neither scheme carries a check digit; validity is a set of assignment
//! exclusions. An SSN is area(3)-group(2)-serial(4) where area 000, 666 and
//! 900-999, group 00, and serial 0000 are never issued. An EIN is a
//! two-digit campus prefix plus seven digits, with a fixed blacklist of
//! prefixes the IRS does not assign. Canonical forms: 9 contiguous digits
//! for SSN, `"NN-NNNNNNN"` for EIN.
//!
//! The `normalize_*` helpers deterministically remap an arbitrary 9-digit
//! candidate into the assignable space (generation support); they are the
//! identity on already-valid input.

use super::digit_values;
use crate::error::ValidationError;
use crate::scheme::DocumentScheme;

/// Two-digit EIN prefixes the IRS never assigns.
pub const EIN_INVALID_PREFIXES: [u8; 17] = [
    0, 7, 8, 9, 17, 18, 19, 28, 29, 49, 69, 70, 78, 79, 89, 96, 97,
];

/// Structural validation of 9 SSN digits; returns the canonical form.
pub fn compute_ssn(base: &str) -> Result<String, ValidationError> {
    digit_values(DocumentScheme::Ssn, base, 9)?;
    let (area, group, serial) = split_ssn(base);
    let excluded = |reason: String| ValidationError::StructurallyExcluded {
        scheme: DocumentScheme::Ssn,
        value: base.to_string(),
        reason,
    };
    if area == 0 || area == 666 || area >= 900 {
        return Err(excluded(format!("area {area:03} is never assigned")));
    }
    if group == 0 {
        return Err(excluded("group 00 is never assigned".to_string()));
    }
    if serial == 0 {
        return Err(excluded("serial 0000 is never assigned".to_string()));
    }
    Ok(base.to_string())
}

/// Validate a canonical 9-digit SSN.
pub fn validate_ssn(value: &str) -> Result<(), ValidationError> {
    compute_ssn(value).map(|_| ())
}

/// Remap any 9-digit candidate into the assignable SSN space. Identity on
/// valid input; invalid components are replaced deterministically.
pub fn normalize_ssn(base: &str) -> Result<String, ValidationError> {
    digit_values(DocumentScheme::Ssn, base, 9)?;
    let (mut area, mut group, mut serial) = split_ssn(base);
    if area == 0 || area == 666 || area >= 900 {
        area = (area % 899) + 1;
        if area == 666 {
            area = 667;
        }
    }
    if group == 0 {
        group = 1;
    }
    if serial == 0 {
        serial = 1;
    }
    Ok(format!("{area:03}{group:02}{serial:04}"))
}

fn split_ssn(digits: &str) -> (u32, u32, u32) {
    // length and digit content are checked by the callers
    let area = digits[..3].parse().unwrap_or(0);
    let group = digits[3..5].parse().unwrap_or(0);
    let serial = digits[5..].parse().unwrap_or(0);
    (area, group, serial)
}

/// Structural validation of 9 EIN digits; returns the canonical
/// `"NN-NNNNNNN"` form.
pub fn compute_ein(base: &str) -> Result<String, ValidationError> {
    digit_values(DocumentScheme::Ein, base, 9)?;
    let prefix: u8 = base[..2].parse().unwrap_or(0);
    if EIN_INVALID_PREFIXES.contains(&prefix) {
        return Err(ValidationError::StructurallyExcluded {
            scheme: DocumentScheme::Ein,
            value: base.to_string(),
            reason: format!("prefix {prefix:02} is never assigned"),
        });
    }
    Ok(format!("{}-{}", &base[..2], &base[2..]))
}

/// Validate a canonical EIN of the form `"NN-NNNNNNN"`.
pub fn validate_ein(value: &str) -> Result<(), ValidationError> {
    let Some((prefix, serial)) = value.split_once('-') else {
        return Err(ValidationError::Malformed {
            scheme: DocumentScheme::Ein,
            value: value.to_string(),
            reason: "missing prefix separator".to_string(),
        });
    };
    if prefix.len() != 2 || serial.len() != 7 {
        return Err(ValidationError::Malformed {
            scheme: DocumentScheme::Ein,
            value: value.to_string(),
            reason: "expected NN-NNNNNNN".to_string(),
        });
    }
    compute_ein(&format!("{prefix}{serial}")).map(|_| ())
}

/// Advance an unassignable EIN prefix to the next assignable one. Identity
/// on valid input.
pub fn normalize_ein(base: &str) -> Result<String, ValidationError> {
    digit_values(DocumentScheme::Ein, base, 9)?;
    let mut prefix: u8 = base[..2].parse().unwrap_or(0);
    while EIN_INVALID_PREFIXES.contains(&prefix) {
        prefix = (prefix + 1) % 100;
    }
    Ok(format!("{prefix:02}{}", &base[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssn_valid_value_passes_through() {
        assert_eq!(compute_ssn("536221234").unwrap(), "536221234");
        validate_ssn("536221234").unwrap();
    }

    #[test]
    fn ssn_rejects_excluded_areas() {
        for base in ["000221234", "666221234", "900221234", "999221234"] {
            assert!(matches!(
                compute_ssn(base).unwrap_err(),
                ValidationError::StructurallyExcluded { .. }
            ));
        }
    }

    #[test]
    fn ssn_rejects_zero_group_and_serial() {
        assert!(compute_ssn("536001234").is_err());
        assert!(compute_ssn("536220000").is_err());
    }

    #[test]
    fn ssn_rejects_wrong_length() {
        assert!(compute_ssn("53622123").is_err());
    }

    #[test]
    fn normalize_ssn_is_identity_on_valid() {
        assert_eq!(normalize_ssn("536221234").unwrap(), "536221234");
    }

    #[test]
    fn normalize_ssn_repairs_all_components() {
        let fixed = normalize_ssn("000000000").unwrap();
        assert_eq!(fixed, "001010001");
        validate_ssn(&fixed).unwrap();
    }

    #[test]
    fn normalize_ssn_avoids_remapping_onto_666() {
        // area 666 remaps to 667 rather than itself
        let fixed = normalize_ssn("666221234").unwrap();
        assert_eq!(&fixed[..3], "667");
        validate_ssn(&fixed).unwrap();
    }

    #[test]
    fn normalize_ssn_repairs_high_areas() {
        for base in ["900221234", "999221234"] {
            validate_ssn(&normalize_ssn(base).unwrap()).unwrap();
        }
    }

    #[test]
    fn ein_valid_value_gets_canonical_shape() {
        assert_eq!(compute_ein("123456789").unwrap(), "12-3456789");
        validate_ein("12-3456789").unwrap();
    }

    #[test]
    fn ein_rejects_blacklisted_prefixes() {
        for base in ["003456789", "073456789", "893456789", "973456789"] {
            assert!(matches!(
                compute_ein(base).unwrap_err(),
                ValidationError::StructurallyExcluded { .. }
            ));
        }
    }

    #[test]
    fn ein_validate_rejects_bad_shape() {
        assert!(validate_ein("123456789").is_err());
        assert!(validate_ein("123-456789").is_err());
    }

    #[test]
    fn normalize_ein_advances_past_blacklist_run() {
        // 07, 08, 09 are all blacklisted; the next assignable prefix is 10
        assert_eq!(normalize_ein("073456789").unwrap(), "103456789");
    }

    #[test]
    fn normalize_ein_is_identity_on_valid() {
        assert_eq!(normalize_ein("123456789").unwrap(), "123456789");
    }

    #[test]
    fn every_normalized_prefix_is_assignable() {
        for p in 0..100u8 {
            let base = format!("{p:02}3456789");
            let fixed = normalize_ein(&base).unwrap();
            compute_ein(&fixed).expect("normalized prefix is assignable");
        }
    }
}
