//! GSTIN (GST identification number) format validation.
//!
//! Layout of the 15 characters:
//!
//! | Pos | Content |
//! |-----|---------|
//! | 1–2 | GST state code |
//! | 3–12 | PAN of the holder (5 letters, 4 digits, 1 letter) |
//! | 13 | Entity number for the same PAN in the state (1–9, A–Z) |
//! | 14 | Always `Z` |
//! | 15 | Mod-36 check character |

use std::fmt;

use super::states::{IndianState, state_by_code};

/// Error returned when a GSTIN fails format validation.
#[derive(Debug, Clone)]
pub struct GstinFormatError {
    /// The invalid input value.
    pub value: String,
    /// Why the value failed validation.
    pub reason: String,
}

impl fmt::Display for GstinFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid GSTIN '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for GstinFormatError {}

const CHECK_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Compute the check character for the first 14 characters of a GSTIN.
///
/// Returns `None` if the input is shorter than 14 characters or contains
/// anything outside `0-9A-Z`.
pub fn gstin_check_char(gstin: &str) -> Option<char> {
    let bytes = gstin.as_bytes();
    if bytes.len() < 14 {
        return None;
    }
    let mut sum = 0u32;
    for (i, b) in bytes[..14].iter().enumerate() {
        let value = CHECK_ALPHABET.iter().position(|c| c == b)? as u32;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }
    let check = (36 - sum % 36) % 36;
    Some(CHECK_ALPHABET[check as usize] as char)
}

/// Validate a GSTIN by format and checksum (no network call).
///
/// Input is trimmed and must be upper case. Returns the state the GSTIN
/// is registered in and the embedded PAN on success.
pub fn validate_gstin_format(
    gstin: &str,
) -> Result<(&'static IndianState, &str), GstinFormatError> {
    let gstin = gstin.trim();
    let fail = |reason: String| GstinFormatError {
        value: gstin.into(),
        reason,
    };

    if !gstin.is_ascii() {
        return Err(fail("must contain ASCII characters only".into()));
    }
    if gstin.len() != 15 {
        return Err(fail(format!("expected 15 characters, got {}", gstin.len())));
    }

    let code = &gstin[..2];
    let state = state_by_code(code).ok_or_else(|| fail(format!("unknown state code '{code}'")))?;

    let pan = &gstin[2..12];
    let pan_ok = pan.char_indices().all(|(i, c)| match i {
        0..=4 | 9 => c.is_ascii_uppercase(),
        _ => c.is_ascii_digit(),
    });
    if !pan_ok {
        return Err(fail(format!("'{pan}' is not a valid PAN")));
    }

    let entity = gstin.as_bytes()[12];
    if !(entity.is_ascii_uppercase() || (b'1'..=b'9').contains(&entity)) {
        return Err(fail("entity number must be 1-9 or A-Z".into()));
    }
    if gstin.as_bytes()[13] != b'Z' {
        return Err(fail("14th character must be 'Z'".into()));
    }

    let expected = gstin_check_char(gstin).ok_or_else(|| fail("invalid characters".into()))?;
    let actual = gstin.as_bytes()[14] as char;
    if actual != expected {
        return Err(fail(format!(
            "check character '{actual}' does not match expected '{expected}'"
        )));
    }

    Ok((state, pan))
}
