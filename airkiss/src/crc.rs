//! AirKiss CRC-8 calculation utilities.
//!
//! AirKiss checksums every protocol structure with the Maxim/Dallas 1-Wire
//! CRC-8: reflected polynomial `0x8C` (normal form `0x31`), initial value
//! `0x00`, reflected input and output, no final XOR. This module wraps the
//! `crc` crate's `CRC_8_MAXIM_DOW` algorithm and provides a `Crc8Calculator`
//! struct for convenient reuse of the algorithm instance.

use std::fmt;

use crc::{CRC_8_MAXIM_DOW, Crc};

/// Mask applied to a CRC-8 when only its low 7 bits travel on the wire.
///
/// SeqData chunk headers carry a 7-bit checksum; the full CRC-8 is computed
/// and truncated with this mask before comparison.
pub const CRC7_MASK: u8 = 0x7F;

/// A pre-initialized AirKiss CRC-8 algorithm instance.
///
/// Intended for reuse inside a decoder, which validates one checksum per
/// parsed chunk group, to avoid re-creating `Crc<u8>` instances repeatedly.
pub struct Crc8Calculator {
    calculator: Crc<u8>,
}

impl fmt::Debug for Crc8Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crc8Calculator")
            .field("calculator", &format_args!("Crc<u8>(CRC_8_MAXIM_DOW)"))
            .finish()
    }
}

impl Crc8Calculator {
    /// Creates a new `Crc8Calculator` with the AirKiss CRC-8 algorithm.
    pub fn new() -> Self {
        Self {
            calculator: Crc::<u8>::new(&CRC_8_MAXIM_DOW),
        }
    }

    /// Calculates the AirKiss CRC-8 over `input`.
    ///
    /// # Returns
    /// The 8-bit CRC value (`0x00` to `0xFF`).
    #[inline]
    pub fn checksum(&self, input: &[u8]) -> u8 {
        self.calculator.checksum(input)
    }

    /// Calculates the 7-bit checksum used by SeqData chunk headers.
    ///
    /// Equivalent to `checksum(input) & CRC7_MASK`.
    #[inline]
    pub fn checksum7(&self, input: &[u8]) -> u8 {
        self.checksum(input) & CRC7_MASK
    }
}

impl Default for Crc8Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates the AirKiss CRC-8 directly.
///
/// Creates a new `Crc<u8>` instance on each call. For repeated calculations
/// within a single decoder, `Crc8Calculator` is preferred.
///
/// # Returns
/// The 8-bit CRC value (`0x00` to `0xFF`).
pub fn airkiss_crc8(input: &[u8]) -> u8 {
    Crc::<u8>::new(&CRC_8_MAXIM_DOW).checksum(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc8_standard_test_vector() {
        let data = b"123456789";
        let expected_crc = 0xA1;
        assert_eq!(
            airkiss_crc8(data),
            expected_crc,
            "CRC-8 mismatch for '123456789'. Expected Maxim 1-Wire check value 0xA1."
        );
        assert_eq!(CRC_8_MAXIM_DOW.check, expected_crc);
    }

    #[test]
    fn crc8_empty_input() {
        assert_eq!(airkiss_crc8(b""), 0x00);
    }

    #[test]
    fn crc8_single_bytes() {
        assert_eq!(airkiss_crc8(&[0x00]), 0x00);
        assert_eq!(airkiss_crc8(&[0xFF]), 0x35);
    }

    #[test]
    fn crc8_calculator_matches_direct() {
        let calculator = Crc8Calculator::new();
        for input in [&b""[..], b"abc", b"pass", &[0x04], &[0xFF, 0x00, 0x7A]] {
            assert_eq!(calculator.checksum(input), airkiss_crc8(input));
        }
    }

    #[test]
    fn crc7_is_low_seven_bits() {
        let calculator = Crc8Calculator::new();
        let data = b"123456789";
        assert_eq!(calculator.checksum7(data), 0xA1 & 0x7F);
        assert!(calculator.checksum7(b"anything at all") <= CRC7_MASK);
    }

    #[test]
    fn crc8_calculator_debug_format() {
        let calculator = Crc8Calculator::new();
        let debug_str = format!("{:?}", calculator);
        assert!(debug_str.contains("Crc8Calculator"));
        assert!(debug_str.contains("CRC_8_MAXIM_DOW"));
    }
}
