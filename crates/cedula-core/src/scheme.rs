//! # Document Schemes
//!
//! The closed set of national document-number schemes the stack can
//! synthesize. Each variant fixes the base-digit length, the number of
//! check digits, the issuing country, and (via [`crate::checksum`]) the
//! check-digit algorithm.
//!
//! | Scheme | Country | Base digits | Check digits | Rule |
//! |--------|---------|-------------|--------------|------|
//! | CPF    | Brazil        | 9  | 2 | mod-11, weights 10..2 / 11..2 |
//! | CNPJ   | Brazil        | 12 | 2 | mod-11, cycled weights |
//! | CUIT   | Argentina     | 10 | 1 | mod-11, fixed weights |
//! | DNI    | Argentina     | 8  | 0 | structural only |
//! | RUT    | Chile         | 8  | 1 | mod-11, `K` sentinel |
//! | CI     | Bolivia       | 7  | 1 | mod-11, cycled 2..=9 |
//! | NIT    | Bolivia       | 9  | 1 | mod-11, cycled 2..=9 |
//! | SSN    | United States | 9  | 0 | structural exclusions |
//! | EIN    | United States | 9  | 0 | prefix blacklist |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Issuing country of a document scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    /// Brazil (CPF, CNPJ).
    Brazil,
    /// Argentina (CUIT, DNI).
    Argentina,
    /// Chile (RUT).
    Chile,
    /// Bolivia (CI, NIT).
    Bolivia,
    /// United States (SSN, EIN).
    UnitedStates,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brazil => write!(f, "Brazil"),
            Self::Argentina => write!(f, "Argentina"),
            Self::Chile => write!(f, "Chile"),
            Self::Bolivia => write!(f, "Bolivia"),
            Self::UnitedStates => write!(f, "United States"),
        }
    }
}

/// A national document-number scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentScheme {
    /// Brazil Cadastro de Pessoas Físicas (natural persons).
    Cpf,
    /// Brazil Cadastro Nacional da Pessoa Jurídica (legal entities).
    Cnpj,
    /// Argentina Clave Única de Identificación Tributaria.
    Cuit,
    /// Argentina Documento Nacional de Identidad.
    Dni,
    /// Chile Rol Único Tributario.
    Rut,
    /// Bolivia Cédula de Identidad.
    Ci,
    /// United States Social Security Number.
    Ssn,
    /// Bolivia Número de Identificación Tributaria.
    Nit,
    /// United States Employer Identification Number.
    Ein,
}

impl DocumentScheme {
    /// Every scheme, in declaration order. Useful for table-driven tests
    /// and registry initialization.
    pub const ALL: [DocumentScheme; 9] = [
        Self::Cpf,
        Self::Cnpj,
        Self::Cuit,
        Self::Dni,
        Self::Rut,
        Self::Ci,
        Self::Ssn,
        Self::Nit,
        Self::Ein,
    ];

    /// Number of base digits the scheme's derivation starts from.
    pub fn base_len(&self) -> usize {
        match self {
            Self::Cpf => 9,
            Self::Cnpj => 12,
            Self::Cuit => 10,
            Self::Dni => 8,
            Self::Rut => 8,
            Self::Ci => 7,
            Self::Ssn => 9,
            Self::Nit => 9,
            Self::Ein => 9,
        }
    }

    /// Number of check digits appended to the base (0 for schemes whose
    /// validity is purely structural).
    pub fn check_len(&self) -> usize {
        match self {
            Self::Cpf | Self::Cnpj => 2,
            Self::Cuit | Self::Rut | Self::Ci | Self::Nit => 1,
            Self::Dni | Self::Ssn | Self::Ein => 0,
        }
    }

    /// The issuing country.
    pub fn country(&self) -> Country {
        match self {
            Self::Cpf | Self::Cnpj => Country::Brazil,
            Self::Cuit | Self::Dni => Country::Argentina,
            Self::Rut => Country::Chile,
            Self::Ci | Self::Nit => Country::Bolivia,
            Self::Ssn | Self::Ein => Country::UnitedStates,
        }
    }

    /// Upper-case short name, as the schemes are conventionally written.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Cuit => "CUIT",
            Self::Dni => "DNI",
            Self::Rut => "RUT",
            Self::Ci => "CI",
            Self::Ssn => "SSN",
            Self::Nit => "NIT",
            Self::Ein => "EIN",
        }
    }
}

impl fmt::Display for DocumentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentScheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CPF" => Ok(Self::Cpf),
            "CNPJ" => Ok(Self::Cnpj),
            "CUIT" => Ok(Self::Cuit),
            "DNI" => Ok(Self::Dni),
            "RUT" => Ok(Self::Rut),
            "CI" => Ok(Self::Ci),
            "SSN" => Ok(Self::Ssn),
            "NIT" => Ok(Self::Nit),
            "EIN" => Ok(Self::Ein),
            _ => Err(ValidationError::UnknownScheme(s.to_string())),
        }
    }
}
