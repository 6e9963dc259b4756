//! SeqData chunk bookkeeping and credential reassembly.
//!
//! Each accepted chunk group contributes a 6-byte record
//! `[crc7, index, d0, d1, d2, d3]` at a bounded, dense index. Indices are
//! small and all present by the end, so a fixed-size vector of optionals
//! stands in for a sparse map. Each slot is written at most once; the
//! sender's retransmissions of an already-stored index are dropped upstream.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::constants::{CHUNK_GROUP_CODES, CHUNK_PAYLOAD_BYTES};

/// One stored chunk: checksum, index, and four payload bytes.
pub(crate) type ChunkRecord = [u8; CHUNK_GROUP_CODES];

/// A fully decoded AirKiss provisioning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    ssid: Vec<u8>,
    password: Vec<u8>,
    random_byte: u8,
    ssid_crc8: u8,
}

impl Credentials {
    /// The network SSID as raw bytes.
    ///
    /// Senders are not required to transmit UTF-8; interpretation is left
    /// to the caller. See [`ssid_lossy`](Self::ssid_lossy) for display.
    pub fn ssid(&self) -> &[u8] {
        &self.ssid
    }

    /// The network password as raw bytes. Empty for open networks.
    pub fn password(&self) -> &[u8] {
        &self.password
    }

    /// The one-byte random tag the sender chose for this session.
    ///
    /// Provisioned devices conventionally broadcast this byte back over UDP
    /// so the sender can tell which device completed configuration.
    pub fn random_byte(&self) -> u8 {
        self.random_byte
    }

    /// The SSID CRC-8 as reported by the sender in the magic code.
    ///
    /// Reported, not enforced: the decoder does not reject a record whose
    /// SSID hashes differently. Cross-check with
    /// [`airkiss_crc8`](crate::crc::airkiss_crc8) if desired.
    pub fn ssid_crc8(&self) -> u8 {
        self.ssid_crc8
    }

    /// The SSID with invalid UTF-8 replaced, for display.
    pub fn ssid_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.ssid)
    }

    /// The password with invalid UTF-8 replaced, for display.
    pub fn password_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.password)
    }
}

/// Collects chunk records for one session until every index is present.
#[derive(Debug, Clone)]
pub(crate) struct ChunkAssembly {
    total_length: u8,
    ssid_crc8: u8,
    pwd_length: u8,
    chunks: Vec<Option<ChunkRecord>>,
    stored: usize,
}

impl ChunkAssembly {
    pub(crate) fn new(total_length: u8, ssid_crc8: u8, pwd_length: u8) -> Self {
        let chunk_count = usize::from(total_length).div_ceil(CHUNK_PAYLOAD_BYTES);
        Self {
            total_length,
            ssid_crc8,
            pwd_length,
            chunks: vec![None; chunk_count],
            stored: 0,
        }
    }

    /// Number of chunk groups this session delivers.
    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.chunks.get(index).is_some_and(Option::is_some)
    }

    /// Meaningful payload bytes in the chunk at `index`.
    ///
    /// Full chunks carry four; the final chunk carries `total_length % 4`
    /// when that remainder is nonzero, and its trailing positions are
    /// neither validated nor read.
    pub(crate) fn payload_len(&self, index: usize) -> usize {
        let remainder = usize::from(self.total_length) % CHUNK_PAYLOAD_BYTES;
        if index + 1 == self.chunks.len() && remainder != 0 {
            remainder
        } else {
            CHUNK_PAYLOAD_BYTES
        }
    }

    /// Stores a validated record. The caller must have rejected duplicates.
    pub(crate) fn store(&mut self, index: usize, record: ChunkRecord) {
        debug_assert!(index < self.chunks.len());
        debug_assert!(!self.contains(index));
        if let Some(slot) = self.chunks.get_mut(index) {
            if slot.replace(record).is_none() {
                self.stored += 1;
            }
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.stored == self.chunks.len()
    }

    /// Reassembles the flat payload into credentials once every chunk is in.
    ///
    /// Layout: `password ++ [random_byte] ++ ssid`, truncated at
    /// `total_length` so pad bytes in a partial final chunk never leak into
    /// the SSID. Bounds are re-checked here; a violation (corrupted lengths
    /// that slipped past earlier checks) yields `None` and the session stays
    /// pending.
    pub(crate) fn try_reassemble(&self) -> Option<Credentials> {
        if !self.is_complete() {
            return None;
        }

        let mut data = Vec::with_capacity(self.chunks.len() * CHUNK_PAYLOAD_BYTES);
        for chunk in &self.chunks {
            data.extend_from_slice(&chunk.as_ref()?[2..]);
        }

        let total_length = usize::from(self.total_length);
        let pwd_length = usize::from(self.pwd_length);
        if pwd_length + 1 > total_length || total_length > data.len() {
            debug_assert!(false, "length fields violate reassembly bounds");
            return None;
        }

        Some(Credentials {
            password: data[..pwd_length].to_vec(),
            random_byte: data[pwd_length],
            ssid: data[pwd_length + 1..total_length].to_vec(),
            ssid_crc8: self.ssid_crc8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_count_rounds_up() {
        assert_eq!(ChunkAssembly::new(8, 0, 4).chunk_count(), 2);
        assert_eq!(ChunkAssembly::new(7, 0, 4).chunk_count(), 2);
        assert_eq!(ChunkAssembly::new(9, 0, 4).chunk_count(), 3);
        assert_eq!(ChunkAssembly::new(1, 0, 0).chunk_count(), 1);
    }

    #[test]
    fn payload_len_partial_final_chunk() {
        let assembly = ChunkAssembly::new(7, 0, 4);
        assert_eq!(assembly.payload_len(0), 4);
        assert_eq!(assembly.payload_len(1), 3);
    }

    #[test]
    fn payload_len_full_final_chunk() {
        let assembly = ChunkAssembly::new(8, 0, 4);
        assert_eq!(assembly.payload_len(1), 4);
    }

    #[test]
    fn reassembles_in_index_order() {
        // total 8 = "pass" + 0x7A + "abc"
        let mut assembly = ChunkAssembly::new(8, 0x42, 4);
        assembly.store(1, [0x3C, 1, 0x7A, b'a', b'b', b'c']);
        assert!(!assembly.is_complete());
        assert!(assembly.try_reassemble().is_none());
        assembly.store(0, [0x5F, 0, b'p', b'a', b's', b's']);
        assert!(assembly.is_complete());

        let credentials = assembly.try_reassemble().expect("complete assembly");
        assert_eq!(credentials.password(), b"pass");
        assert_eq!(credentials.random_byte(), 0x7A);
        assert_eq!(credentials.ssid(), b"abc");
        assert_eq!(credentials.ssid_crc8(), 0x42);
    }

    #[test]
    fn truncates_pad_bytes_from_partial_chunk() {
        // total 7 = "test" + 0x00 + "ab"; final chunk pads one byte
        let mut assembly = ChunkAssembly::new(7, 0x47, 4);
        assembly.store(0, [0x11, 0, b't', b'e', b's', b't']);
        assembly.store(1, [0x22, 1, 0x00, b'a', b'b', 0xEE]);

        let credentials = assembly.try_reassemble().expect("complete assembly");
        assert_eq!(credentials.password(), b"test");
        assert_eq!(credentials.random_byte(), 0x00);
        assert_eq!(credentials.ssid(), b"ab");
        assert_eq!(credentials.ssid_crc8(), 0x47);
    }

    #[test]
    fn lossy_accessors_replace_invalid_utf8() {
        let mut assembly = ChunkAssembly::new(5, 0, 0);
        assembly.store(0, [0, 0, 0x7A, 0xFF, 0xFE, b'x']);
        assembly.store(1, [0, 1, b'y', 0, 0, 0]);

        let credentials = assembly.try_reassemble().expect("complete assembly");
        assert_eq!(credentials.password(), b"");
        assert_eq!(credentials.random_byte(), 0x7A);
        assert_eq!(credentials.ssid(), &[0xFF, 0xFE, b'x', b'y']);
        assert!(credentials.ssid_lossy().contains('\u{FFFD}'));
    }
}
