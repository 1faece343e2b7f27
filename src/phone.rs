//! Phone number normalization for stored contact details.
//!
//! Numbers are reduced to E.164: a `+`, the country code and the subscriber
//! number, at most 15 digits in total.

use crate::error::{Result, VerseError};

/// Fewest digits accepted after normalization.
const MIN_DIGITS: usize = 8;
/// E.164 upper bound.
const MAX_DIGITS: usize = 15;

/// Normalize `raw` to E.164.
///
/// Spaces, dashes, dots and parentheses are dropped. A leading `+` or `00`
/// marks an international number. A single leading `0` is a trunk prefix
/// and is replaced by `country_code`. Bare digits are taken to already carry
/// their country code.
///
/// # Errors
///
/// Returns [`VerseError::InvalidPhone`] for letters or stray symbols, an
/// invalid `country_code`, or a digit count outside E.164 limits.
pub fn normalize_phone(raw: &str, country_code: &str) -> Result<String> {
    let trimmed = raw.trim();
    let (international, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            other => {
                return Err(VerseError::InvalidPhone(format!(
                    "unexpected character {other:?} in {raw:?}"
                )));
            }
        }
    }

    let full = if international {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_owned()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{rest}", country_digits(country_code)?)
    } else {
        digits
    };

    if full.starts_with('0') {
        return Err(VerseError::InvalidPhone(format!(
            "country code cannot start with 0 in {raw:?}"
        )));
    }
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&full.len()) {
        return Err(VerseError::InvalidPhone(format!(
            "{raw:?} has {} digits, expected {MIN_DIGITS} to {MAX_DIGITS}",
            full.len()
        )));
    }
    Ok(format!("+{full}"))
}

fn country_digits(country_code: &str) -> Result<&str> {
    let code = country_code.trim().trim_start_matches('+');
    let valid = (1..=3).contains(&code.len())
        && !code.starts_with('0')
        && code.bytes().all(|b| b.is_ascii_digit());
    if valid {
        Ok(code)
    } else {
        Err(VerseError::InvalidPhone(format!(
            "bad country code {country_code:?}"
        )))
    }
}
