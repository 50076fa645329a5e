//! Phone numbers and the countries vendors can register from.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Minimum number of local digits after the dial code.
const MIN_LOCAL_DIGITS: usize = 6;

/// Maximum number of local digits after the dial code.
const MAX_LOCAL_DIGITS: usize = 12;

/// Errors that can occur when building a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number cannot be empty")]
    Empty,
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength { min: usize, max: usize },
    #[error("unknown country: {0}")]
    UnknownCountry(String),
}

/// Countries supported by vendor onboarding, with their dial codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Country {
    #[default]
    Senegal,
    Mali,
    CoteDIvoire,
    Guinee,
    BurkinaFaso,
    Togo,
    Benin,
}

impl Country {
    pub const ALL: [Self; 7] = [
        Self::Senegal,
        Self::Mali,
        Self::CoteDIvoire,
        Self::Guinee,
        Self::BurkinaFaso,
        Self::Togo,
        Self::Benin,
    ];

    /// Display name, as stored on the vendor record.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Senegal => "Sénégal",
            Self::Mali => "Mali",
            Self::CoteDIvoire => "Côte d'Ivoire",
            Self::Guinee => "Guinée",
            Self::BurkinaFaso => "Burkina Faso",
            Self::Togo => "Togo",
            Self::Benin => "Bénin",
        }
    }

    /// ISO 3166-1 alpha-2 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Senegal => "SN",
            Self::Mali => "ML",
            Self::CoteDIvoire => "CI",
            Self::Guinee => "GN",
            Self::BurkinaFaso => "BF",
            Self::Togo => "TG",
            Self::Benin => "BJ",
        }
    }

    /// International dial code including the leading `+`.
    #[must_use]
    pub const fn dial_code(self) -> &'static str {
        match self {
            Self::Senegal => "+221",
            Self::Mali => "+223",
            Self::CoteDIvoire => "+225",
            Self::Guinee => "+224",
            Self::BurkinaFaso => "+226",
            Self::Togo => "+228",
            Self::Benin => "+229",
        }
    }

    /// Look a country up by display name or ISO code (case-insensitive).
    #[must_use]
    pub fn find(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|c| {
            c.name().eq_ignore_ascii_case(value) || c.code().eq_ignore_ascii_case(value)
        })
    }

    /// Remove this country's dial code from a stored phone number, if present.
    #[must_use]
    pub fn strip_dial_code(self, phone: &str) -> String {
        let phone = phone.trim();
        phone
            .strip_prefix(self.dial_code())
            .unwrap_or(phone)
            .trim()
            .to_owned()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Country {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| PhoneError::UnknownCountry(s.to_owned()))
    }
}

/// A phone number in international form (`+221771234567`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Build a phone number from a country and the locally typed digits.
    ///
    /// Spaces, dashes and dots are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if no digits remain, a non-digit character is present,
    /// or the digit count is outside 6..=12.
    pub fn from_local(country: Country, local: &str) -> Result<Self, PhoneError> {
        let digits: String = local
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.'))
            .collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }
        if !(MIN_LOCAL_DIGITS..=MAX_LOCAL_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength {
                min: MIN_LOCAL_DIGITS,
                max: MAX_LOCAL_DIGITS,
            });
        }

        Ok(Self(format!("{}{digits}", country.dial_code())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
