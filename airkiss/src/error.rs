//! AirKiss error types.
//!
//! The decoder itself never fails: malformed input is transient by design
//! and is retransmitted by the sender, so rejects stay internal. Errors
//! surface only on the sender side, where credentials must fit the
//! protocol's one-byte length fields. The `thiserror` crate is used for
//! ergonomic error definitions.

use thiserror::Error;

use crate::constants::MAX_TOTAL_LENGTH;

/// Errors that can occur while encoding credentials into a code stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The combined payload (`password + random byte + SSID`) does not fit
    /// the single-byte `total_length` field.
    #[error(
        "combined credential length {total} exceeds the protocol maximum of {MAX_TOTAL_LENGTH} \
         (password {pwd_len} + random byte + ssid {ssid_len})"
    )]
    CredentialsTooLong {
        total: usize,
        pwd_len: usize,
        ssid_len: usize,
    },
}
