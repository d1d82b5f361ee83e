// File: filescrub-core/src/validators.rs
//! Programmatic validation functions for specific sensitive data types.
//!
//! Regular expressions only describe the shape of an identifier. These checks
//! run on a candidate after it matched and reject values that have the right
//! shape but cannot be real (a failing Luhn checksum, an SSN in a range that
//! is never issued). They reduce false positives; they never add matches.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};

/// A programmatic check attached to a pattern definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Mod-10 checksum over the digits of the candidate.
    Luhn,
    /// US Social Security Number range rules.
    UsSsn,
}

impl Validator {
    /// Returns `true` when `candidate` passes this check.
    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            Validator::Luhn => is_valid_credit_card_programmatically(candidate),
            Validator::UsSsn => is_valid_ssn_programmatically(candidate),
        }
    }
}

/// Validates an SSN in the `XXX-XX-XXXX` layout against the ranges the Social
/// Security Administration never assigns.
///
/// Rejected: area `000`, `666` and `900`-`999`; group `00`; serial `0000`.
pub fn is_valid_ssn_programmatically(ssn: &str) -> bool {
    let mut parts = ssn.split('-');

    let (Some(area), Some(group), Some(serial), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }
    if !(area.bytes().chain(group.bytes()).chain(serial.bytes())).all(|b| b.is_ascii_digit()) {
        return false;
    }

    let Ok(area_num) = area.parse::<u16>() else { return false; };
    let Ok(group_num) = group.parse::<u8>() else { return false; };
    let Ok(serial_num) = serial.parse::<u16>() else { return false; };

    let invalid_area = area_num == 0 || area_num == 666 || area_num >= 900;
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}

/// Validates a string of ASCII digits using the Luhn (mod 10) algorithm.
///
/// Returns `false` for an empty string or any non-digit character.
pub fn is_valid_luhn(num_str: &str) -> bool {
    if num_str.is_empty() {
        return false;
    }

    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false; };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Strips grouping separators from a card number and applies [`is_valid_luhn`].
pub fn is_valid_credit_card_programmatically(cc_number: &str) -> bool {
    let digits: String = cc_number.chars().filter(|c| c.is_ascii_digit()).collect();
    is_valid_luhn(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luhn_accepts_known_test_numbers() {
        assert!(is_valid_luhn("4111111111111111"));
        assert!(is_valid_luhn("5555555555554444"));
        assert!(is_valid_luhn("378282246310005"));
    }

    #[test]
    fn test_luhn_rejects_bad_checksum_and_non_digits() {
        assert!(!is_valid_luhn("4111111111111112"));
        assert!(!is_valid_luhn("4111-1111"));
        assert!(!is_valid_luhn(""));
    }

    #[test]
    fn test_credit_card_ignores_grouping() {
        assert!(is_valid_credit_card_programmatically("4111 1111 1111 1111"));
        assert!(is_valid_credit_card_programmatically("4111-1111-1111-1111"));
        assert!(!is_valid_credit_card_programmatically("---"));
    }

    #[test]
    fn test_ssn_ranges() {
        assert!(is_valid_ssn_programmatically("123-45-6789"));
        assert!(is_valid_ssn_programmatically("899-01-0001"));
        assert!(!is_valid_ssn_programmatically("000-45-6789"));
        assert!(!is_valid_ssn_programmatically("666-45-6789"));
        assert!(!is_valid_ssn_programmatically("900-45-6789"));
        assert!(!is_valid_ssn_programmatically("123-00-6789"));
        assert!(!is_valid_ssn_programmatically("123-45-0000"));
        assert!(!is_valid_ssn_programmatically("123456789"));
        assert!(!is_valid_ssn_programmatically("12a-45-6789"));
    }

    #[test]
    fn test_validator_dispatch() {
        assert!(Validator::Luhn.accepts("4111111111111111"));
        assert!(!Validator::UsSsn.accepts("000-12-3456"));
    }
}
