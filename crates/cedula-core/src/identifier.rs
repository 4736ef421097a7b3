//! # Identifier Value Type
//!
//! An [`Identifier`] pairs a [`DocumentScheme`] with the canonical string
//! form of a checksum-valid document number. Instances are valid by
//! construction: the public constructors run the scheme's full check-digit
//! (or structural) verification, and deserialization routes through the
//! same path so invalid values are rejected at the boundary rather than
//! silently accepted.
//!
//! Canonical forms are contiguous digits except RUT (`"12345670-K"`) and
//! EIN (`"12-3456789"`). [`Identifier::formatted`] renders the
//! human-facing convention of each scheme.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::error::ValidationError;
use crate::scheme::DocumentScheme;

/// A checksum-valid document number in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    scheme: DocumentScheme,
    canonical: String,
}

impl Identifier {
    /// Parse and validate a document number.
    ///
    /// Common separators (dots, dashes, slashes, spaces) are stripped and
    /// a lower-case RUT check `k` is folded to `K` before the canonical
    /// shape is rebuilt and the scheme's verification runs.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the cleaned value does not have the
    /// scheme's shape or its check digits do not verify.
    pub fn parse(scheme: DocumentScheme, value: &str) -> Result<Self, ValidationError> {
        let cleaned: String = value
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
            .map(|c| if c == 'k' { 'K' } else { c })
            .collect();

        let canonical = match scheme {
            DocumentScheme::Rut => {
                let Some(check) = cleaned.chars().last() else {
                    return Err(ValidationError::Malformed {
                        scheme,
                        value: value.to_string(),
                        reason: "empty value".to_string(),
                    });
                };
                format!("{}-{check}", &cleaned[..cleaned.len() - check.len_utf8()])
            }
            DocumentScheme::Ein => {
                if cleaned.len() != 9 {
                    return Err(ValidationError::Malformed {
                        scheme,
                        value: value.to_string(),
                        reason: "expected 9 digits".to_string(),
                    });
                }
                format!("{}-{}", &cleaned[..2], &cleaned[2..])
            }
            _ => cleaned,
        };

        checksum::validate(scheme, &canonical)?;
        Ok(Self { scheme, canonical })
    }

    /// Construct from a canonical string that already passed the scheme's
    /// verification. Crate-internal: only the checksum module calls this.
    pub(crate) fn from_validated(scheme: DocumentScheme, canonical: String) -> Self {
        Self { scheme, canonical }
    }

    /// The document scheme this number belongs to.
    pub fn scheme(&self) -> DocumentScheme {
        self.scheme
    }

    /// The canonical string form.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The base portion: the digits the check digits were derived from.
    /// For schemes without check digits this is the digit content of the
    /// whole number.
    pub fn base(&self) -> String {
        match self.scheme {
            DocumentScheme::Rut => self
                .canonical
                .rsplit_once('-')
                .map(|(base, _)| base.to_string())
                .unwrap_or_default(),
            DocumentScheme::Ein => self.canonical.replace('-', ""),
            _ => {
                let cut = self.canonical.len() - self.scheme.check_len();
                self.canonical[..cut].to_string()
            }
        }
    }

    /// The stored check digits (`""` for schemes without any; `"K"` is
    /// possible for RUT).
    pub fn check(&self) -> String {
        match self.scheme {
            DocumentScheme::Rut => self
                .canonical
                .rsplit_once('-')
                .map(|(_, check)| check.to_string())
                .unwrap_or_default(),
            DocumentScheme::Ein => String::new(),
            _ => {
                let cut = self.canonical.len() - self.scheme.check_len();
                self.canonical[cut..].to_string()
            }
        }
    }

    /// Render the number the way it is conventionally written:
    /// `111.444.777-35` (CPF), `11.222.333/0001-81` (CNPJ),
    /// `20-12345678-6` (CUIT), `30.123.456` (DNI), `12.345.670-K` (RUT),
    /// `536-22-1234` (SSN). CI, NIT, and EIN are already conventional in
    /// canonical form.
    pub fn formatted(&self) -> String {
        let c = &self.canonical;
        match self.scheme {
            DocumentScheme::Cpf => {
                format!("{}.{}.{}-{}", &c[..3], &c[3..6], &c[6..9], &c[9..])
            }
            DocumentScheme::Cnpj => format!(
                "{}.{}.{}/{}-{}",
                &c[..2],
                &c[2..5],
                &c[5..8],
                &c[8..12],
                &c[12..]
            ),
            DocumentScheme::Cuit => format!("{}-{}-{}", &c[..2], &c[2..10], &c[10..]),
            DocumentScheme::Dni => format!("{}.{}.{}", &c[..2], &c[2..5], &c[5..]),
            DocumentScheme::Rut => match c.rsplit_once('-') {
                Some((base, check)) => format!("{}-{check}", group_thousands(base)),
                None => c.clone(),
            },
            DocumentScheme::Ssn => format!("{}-{}-{}", &c[..3], &c[3..5], &c[5..]),
            DocumentScheme::Ci | DocumentScheme::Nit | DocumentScheme::Ein => c.clone(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            scheme: DocumentScheme,
            canonical: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        Identifier::parse(raw.scheme, &raw.canonical).map_err(serde::de::Error::custom)
    }
}

/// Insert dot separators every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
