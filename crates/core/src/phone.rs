// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Phone number normalization, redaction and recipient ids.

use crate::error::{Error, Result};

/// Shortest accepted phone number, in digits.
pub const MIN_DIGITS: usize = 10;
/// Longest accepted phone number, in digits.
pub const MAX_DIGITS: usize = 15;
/// Domain suffix for user recipient ids.
pub const USER_DOMAIN: &str = "@s.whatsapp.net";

/// Strip everything but digits and check the length.
pub fn normalize(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(Error::InvalidPhone("phone number is required".into()));
    }

    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Err(Error::InvalidPhone(format!(
            "must have between {} and {} digits",
            MIN_DIGITS, MAX_DIGITS
        )));
    }
    Ok(digits)
}

/// Mask every digit that is followed by at least four more digits.
///
/// For a plain digit string this leaves only the last four visible.
pub fn redact(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let masked = c.is_ascii_digit()
                && chars
                    .get(i + 1..i + 5)
                    .is_some_and(|next| next.iter().all(char::is_ascii_digit));
            if masked {
                '*'
            } else {
                *c
            }
        })
        .collect()
}

/// Recipient id for a number, unless it already is one.
pub fn to_jid(number: &str) -> String {
    if number.contains(USER_DOMAIN) {
        number.to_string()
    } else {
        format!("{}{}", number, USER_DOMAIN)
    }
}

/// Account part of a recipient id, without domain or device
/// (`5511...:3@s.whatsapp.net` -> `5511...`).
pub fn user_part(jid: &str) -> &str {
    jid.split(|c| c == '@' || c == ':').next().unwrap_or(jid)
}

#[cfg(test)]
#[path = "phone_tests.rs"]
mod tests;
