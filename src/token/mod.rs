//! Bearer token issuance and validation.
//!
//! Tokens are 128-bit values drawn from the operating system CSPRNG and
//! rendered as 32 lowercase hex characters. They live in a process-local
//! [`TokenRegistry`] and are never persisted.

mod registry;

pub use registry::{IssuedToken, TokenRegistry};

use rand_core::{OsRng, RngCore};

use crate::Result;

/// Number of random bytes in a token.
pub const TOKEN_BYTES: usize = 16;

/// Length of the hex-encoded token string.
pub const TOKEN_HEX_LEN: usize = TOKEN_BYTES * 2;

/// Generate a fresh random token as a lowercase hex string.
///
/// Fails if the operating system entropy source cannot be read; a
/// predictable fallback is never used.
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Check whether a string has the shape of an issued token.
#[cfg(test)]
pub(crate) fn is_token_shaped(value: &str) -> bool {
    value.len() == TOKEN_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
