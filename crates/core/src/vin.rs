//! Vehicle Identification Number validation.
//!
//! A [`Vin`] can only be obtained through [`validate`] (or the equivalent
//! `parse` / `FromStr` / `TryFrom` entry points), so holding one proves the
//! value is 17 characters from the VIN alphabet with a correct check digit
//! at position 9.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of characters in every VIN.
pub const VIN_LENGTH: usize = 17;

/// Zero-based index of the check digit (position 9).
pub const CHECK_DIGIT_INDEX: usize = 8;

/// Positional weights for positions 1..=17. Position 9 carries weight 0.
const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Rules a raw string can violate on its way to becoming a [`Vin`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VinError {
    #[error("VIN must be exactly 17 characters, got {actual}")]
    Length { actual: usize },

    #[error(
        "VIN contains invalid character '{character}' at position {position}; \
         only A-H, J-N, P, R-Z and 0-9 are allowed"
    )]
    Charset { position: usize, character: char },

    #[error("VIN check digit mismatch: position 9 is '{actual}', expected '{expected}'")]
    CheckDigit { expected: char, actual: char },
}

impl VinError {
    /// Stable machine-readable name of the violated rule.
    pub fn code(&self) -> &'static str {
        match self {
            VinError::Length { .. } => "LengthError",
            VinError::Charset { .. } => "CharsetError",
            VinError::CheckDigit { .. } => "CheckDigitError",
        }
    }
}

/// A validated, uppercase VIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Validate `raw` and return the normalized VIN.
    pub fn parse(raw: &str) -> Result<Self, VinError> {
        validate(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// World Manufacturer Identifier (positions 1-3).
    pub fn wmi(&self) -> &str {
        &self.0[0..3]
    }

    /// Vehicle Descriptor Section (positions 4-8).
    pub fn vds(&self) -> &str {
        &self.0[3..8]
    }

    pub fn check_digit(&self) -> char {
        self.char_at(CHECK_DIGIT_INDEX)
    }

    /// Model-year code (position 10).
    pub fn year_code(&self) -> char {
        self.char_at(9)
    }

    /// Assembly plant code (position 11).
    pub fn plant_code(&self) -> char {
        self.char_at(10)
    }

    /// Production sequence number (positions 12-17).
    pub fn serial(&self) -> &str {
        &self.0[11..]
    }

    fn char_at(&self, index: usize) -> char {
        // Every byte is ASCII once validated.
        char::from(self.0.as_bytes()[index])
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Vin {
    type Err = VinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = VinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

/// Validate a raw VIN string.
///
/// Letters are matched case-insensitively and the returned VIN is uppercase.
/// Checks run in order: length, alphabet, check digit; the first violated
/// rule is reported.
pub fn validate(raw: &str) -> Result<Vin, VinError> {
    let actual = raw.chars().count();
    if actual != VIN_LENGTH {
        return Err(VinError::Length { actual });
    }

    let normalized = raw.to_ascii_uppercase();
    let mut values = [0u32; VIN_LENGTH];
    for (i, character) in normalized.chars().enumerate() {
        values[i] = transliterate(character).ok_or(VinError::Charset {
            position: i + 1,
            character,
        })?;
    }

    let expected = check_digit_from_values(&values);
    let actual = char::from(normalized.as_bytes()[CHECK_DIGIT_INDEX]);
    if expected != actual {
        return Err(VinError::CheckDigit { expected, actual });
    }

    Ok(Vin(normalized))
}

/// Compute the check digit a 17-character VIN should carry at position 9.
///
/// Whatever currently sits at position 9 is ignored. Returns `None` when
/// the input has the wrong length or uses characters outside the VIN
/// alphabet.
pub fn compute_check_digit(raw: &str) -> Option<char> {
    if raw.chars().count() != VIN_LENGTH {
        return None;
    }
    let mut values = [0u32; VIN_LENGTH];
    for (i, character) in raw.to_ascii_uppercase().chars().enumerate() {
        values[i] = if i == CHECK_DIGIT_INDEX {
            0
        } else {
            transliterate(character)?
        };
    }
    Some(check_digit_from_values(&values))
}

fn check_digit_from_values(values: &[u32; VIN_LENGTH]) -> char {
    let sum: u32 = values.iter().zip(WEIGHTS).map(|(v, w)| v * w).sum();
    match sum % 11 {
        10 => 'X',
        // Remainder is 0..=9 here.
        digit => char::from(b'0' + digit as u8),
    }
}

/// Numeric value of a VIN character, or `None` outside `[A-HJ-NPR-Z0-9]`.
fn transliterate(c: char) -> Option<u32> {
    let value = match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        _ => return None,
    };
    Some(value)
}
