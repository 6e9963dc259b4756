//! Per-sender decoder dispatch.
//!
//! Every station/BSSID pairing seen on the channel gets its own decoder;
//! only the one actually running AirKiss will ever complete, the rest stay
//! pending until the table is dropped. Frames where `ToDS == FromDS`
//! (ad-hoc and WDS traffic) are outside the protocol and are skipped.

use std::collections::HashMap;

use airkiss::{AirKissDecoder, Credentials, FrameLength, SequenceNumber};
use tracing::{debug, trace};

use crate::dot11::DataHeader;

/// Dispatch key: the sender-side station and BSSID MAC pair, ordered by
/// frame direction so both directions of one association map to distinct
/// decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey([u8; 12]);

impl SessionKey {
    /// Derives the key from a data-frame header.
    ///
    /// - `ToDS`: A1 is the BSSID, A2 the source station; key is `SA ‖ BSSID`.
    /// - `FromDS`: A2 is the BSSID, A3 the source; key is `BSSID ‖ SA`.
    ///
    /// # Returns
    /// `None` when `ToDS == FromDS`.
    pub fn from_data_header(header: &DataHeader) -> Option<Self> {
        let (first, second) = match (header.frame_control.to_ds, header.frame_control.from_ds) {
            (true, false) => (header.addr2, header.addr1),
            (false, true) => (header.addr2, header.addr3),
            _ => return None,
        };

        let mut key = [0u8; 12];
        key[..6].copy_from_slice(first.as_bytes());
        key[6..].copy_from_slice(second.as_bytes());
        Some(Self(key))
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i == 6 {
                write!(f, "/")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Maintains one [`AirKissDecoder`] per session key.
#[derive(Debug, Default)]
pub struct SessionTable {
    decoders: HashMap<SessionKey, AirKissDecoder>,
}

impl SessionTable {
    /// Creates a new, empty `SessionTable`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one data-frame observation to the decoder for its sender.
    ///
    /// Creates the decoder on first sight of a key.
    ///
    /// # Returns
    /// The decoded credentials as soon as any decoder completes.
    pub fn observe(&mut self, header: &DataHeader, frame_len: u16) -> Option<Credentials> {
        let key = SessionKey::from_data_header(header)?;
        let decoder = self.decoders.entry(key).or_insert_with(|| {
            debug!(%key, "tracking new station");
            AirKissDecoder::new()
        });

        trace!(
            %key,
            seq_no = header.sequence_number,
            frame_len,
            phase = ?decoder.phase(),
            "observation"
        );
        decoder.put(
            FrameLength::new(frame_len),
            SequenceNumber::new(header.sequence_number),
        );

        decoder.credentials().cloned()
    }

    /// Number of stations currently tracked.
    pub fn session_count(&self) -> usize {
        self.decoders.len()
    }
}
