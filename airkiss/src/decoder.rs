//! The AirKiss decoder state machine.
//!
//! One [`AirKissDecoder`] tracks one sending station. It consumes ordered
//! `(frame_len, seq_no)` observations and walks four phases:
//!
//! 1. **GuideCode** — four consecutive frames whose lengths increase by
//!    exactly one reveal the constant offset (`base_length`) that 802.11
//!    framing and encryption add over the sender's payload.
//! 2. **MagicCode** — a position-tagged quad carrying `total_length` and the
//!    SSID CRC-8.
//! 3. **PrefixCode** — a position-tagged quad carrying the password length,
//!    guarded by its own CRC-8.
//! 4. **SeqData** — 6-code groups `[crc7, index, d0..d3]` delivering the
//!    payload four bytes at a time, in any order, each guarded by a 7-bit
//!    checksum.
//!
//! The protocol is lossy by design: anything that does not parse is dropped
//! and the sender's retransmissions eventually fill the gaps. The decoder
//! therefore never fails; it either completes or stays pending, and external
//! layers enforce liveness with a timeout.

use crate::chunk::{ChunkAssembly, ChunkRecord, Credentials};
use crate::constants::*;
use crate::crc::Crc8Calculator;
use crate::signal::DoneSignal;
use crate::types::{FrameLength, SequenceNumber};
use crate::window::CodeWindow;

/// Decoder phase, exposed for inspection and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    GuideCode,
    MagicCode,
    PrefixCode,
    SeqData,
    Done,
}

/// Internal phase representation.
///
/// Fields that only become meaningful in later phases live in the variant
/// payloads, so "prefix data exists" and "the decoder is past PrefixCode"
/// are the same fact.
#[derive(Debug)]
enum Phase {
    GuideCode,
    MagicCode,
    PrefixCode { total_length: u8, ssid_crc8: u8 },
    SeqData(ChunkAssembly),
    Done(Credentials),
}

impl Phase {
    fn kind(&self) -> DecoderPhase {
        match self {
            Phase::GuideCode => DecoderPhase::GuideCode,
            Phase::MagicCode => DecoderPhase::MagicCode,
            Phase::PrefixCode { .. } => DecoderPhase::PrefixCode,
            Phase::SeqData(_) => DecoderPhase::SeqData,
            Phase::Done(_) => DecoderPhase::Done,
        }
    }
}

/// Outcome of examining a full 6-code window in SeqData.
enum GroupOutcome {
    /// The window is not aligned on a group boundary; slide and retry.
    Misaligned,
    /// A structurally valid group failed validation; drop it wholesale.
    Rejected,
    /// The group was stored.
    Stored,
}

/// Per-sender AirKiss decoder.
///
/// Not thread-safe: [`put`](Self::put) mutates internal state and must be
/// called by one owner at a time. Hold one decoder per `(source, BSSID)`
/// key and dispatch observations in capture order; gaps are detected via
/// the sequence number and heal by resetting the window.
///
/// The decoder is one-shot: once done it ignores further observations, and
/// a new session requires a new decoder.
#[derive(Debug)]
pub struct AirKissDecoder {
    phase: Phase,
    /// Offset subtracted from every frame length once learned; `-1` until
    /// the guide run completes (and afterwards, when the guide run started
    /// at code 0, meaning no offset is applied).
    base_length: i32,
    last_seq: Option<SequenceNumber>,
    /// Observations still to drop after a phase transition.
    ignore_seq_cnt: u16,
    window: CodeWindow,
    crc: Crc8Calculator,
    done: DoneSignal,
}

impl AirKissDecoder {
    /// Creates an idle decoder in the GuideCode phase.
    pub fn new() -> Self {
        Self {
            phase: Phase::GuideCode,
            base_length: -1,
            last_seq: None,
            ignore_seq_cnt: 0,
            window: CodeWindow::new(),
            crc: Crc8Calculator::new(),
            done: DoneSignal::new(),
        }
    }

    /// Feeds one observation.
    ///
    /// # Parameters
    /// - `frame_len`: observed length of the captured frame.
    /// - `seq_no`: the frame's 802.11 sequence number.
    pub fn put(&mut self, frame_len: FrameLength, seq_no: SequenceNumber) {
        if matches!(self.phase, Phase::Done(_)) {
            return;
        }

        let prev = self.last_seq.replace(seq_no);
        let discontinuous = prev.is_some_and(|p| p.wrapping_add(1) != seq_no);
        if discontinuous || self.ignore_seq_cnt > 0 {
            // Decoding depends on consecutive codes; a gap invalidates any
            // partial window.
            self.window.clear();
            if self.ignore_seq_cnt > 0 {
                self.ignore_seq_cnt -= 1;
                return;
            }
        }

        let mut code = i32::from(frame_len.value());
        if self.base_length >= 0 {
            code -= self.base_length;
        }

        if !self.window.push(code, self.window_size()) {
            return;
        }
        self.parse_window();
        self.window.slide();
    }

    /// A one-shot handle that fires when decoding completes.
    pub fn done(&self) -> DoneSignal {
        self.done.clone()
    }

    /// Whether the decoder has reached its terminal state.
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// The decoded credentials, available once [`is_done`](Self::is_done).
    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.phase {
            Phase::Done(credentials) => Some(credentials),
            _ => None,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> DecoderPhase {
        self.phase.kind()
    }

    /// The learned frame-length offset; `-1` while still in GuideCode.
    pub fn base_length(&self) -> i32 {
        self.base_length
    }

    fn window_size(&self) -> usize {
        match self.phase {
            Phase::SeqData(_) => SEQ_DATA_WINDOW_SIZE,
            _ => QUAD_WINDOW_SIZE,
        }
    }

    /// Runs the phase parser over a full window.
    fn parse_window(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::GuideCode);
        self.phase = match phase {
            Phase::GuideCode => {
                if let Some(base) = guide_base(self.window.codes()) {
                    self.base_length = base;
                    self.begin_settling(IGNORE_AFTER_GUIDE);
                    Phase::MagicCode
                } else {
                    Phase::GuideCode
                }
            }
            Phase::MagicCode => match parse_tagged_quad(self.window.codes(), MAGIC_TAG_BASE) {
                // A zero total length could never complete; treat it as
                // corruption and keep listening.
                Some((total_length, ssid_crc8)) if total_length != 0 => {
                    self.begin_settling(IGNORE_AFTER_MAGIC);
                    Phase::PrefixCode {
                        total_length,
                        ssid_crc8,
                    }
                }
                Some(_) => {
                    self.window.clear();
                    Phase::MagicCode
                }
                None => Phase::MagicCode,
            },
            Phase::PrefixCode {
                total_length,
                ssid_crc8,
            } => match parse_tagged_quad(self.window.codes(), PREFIX_TAG_BASE) {
                Some((pwd_length, pwd_length_crc8))
                    if self.crc.checksum(&[pwd_length]) == pwd_length_crc8
                        && pwd_length < total_length =>
                {
                    self.begin_settling(IGNORE_AFTER_PREFIX);
                    Phase::SeqData(ChunkAssembly::new(total_length, ssid_crc8, pwd_length))
                }
                Some(_) => {
                    // Tags lined up but the announced length failed its
                    // checks; restart collection from an empty window.
                    self.window.clear();
                    Phase::PrefixCode {
                        total_length,
                        ssid_crc8,
                    }
                }
                None => Phase::PrefixCode {
                    total_length,
                    ssid_crc8,
                },
            },
            Phase::SeqData(mut assembly) => {
                match parse_chunk_group(self.window.codes(), &mut assembly, &self.crc) {
                    GroupOutcome::Misaligned => Phase::SeqData(assembly),
                    GroupOutcome::Rejected => {
                        self.window.clear();
                        Phase::SeqData(assembly)
                    }
                    GroupOutcome::Stored => {
                        self.window.clear();
                        match assembly.try_reassemble() {
                            Some(credentials) => {
                                self.ignore_seq_cnt = 0;
                                self.done.fire();
                                Phase::Done(credentials)
                            }
                            None => Phase::SeqData(assembly),
                        }
                    }
                }
            }
            done @ Phase::Done(_) => done,
        };
    }

    /// Arms the post-transition settling window and discards stale codes.
    fn begin_settling(&mut self, ignore_cnt: u16) {
        self.ignore_seq_cnt = ignore_cnt;
        self.window.clear();
    }
}

impl Default for AirKissDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects the guide run: four codes strictly increasing by one.
///
/// # Returns
/// The learned base length (`first_code - 1`), or `None` if the window is
/// not a guide run.
fn guide_base(codes: &[i32]) -> Option<i32> {
    codes
        .windows(2)
        .all(|pair| pair[0] + 1 == pair[1])
        .then(|| codes[0] - 1)
}

/// Parses a position-tagged quad (magic or prefix code block).
///
/// Each code carries its window position (plus `tag_base`) in bits 4..9 and
/// one nibble of payload in bits 0..4. Positions 0 and 1 form the value
/// byte, positions 2 and 3 the checksum byte.
fn parse_tagged_quad(codes: &[i32], tag_base: u8) -> Option<(u8, u8)> {
    for (position, &code) in codes.iter().enumerate() {
        let expected_tag = (position as i32 + i32::from(tag_base)) << 4;
        if code & POSITION_TAG_MASK != expected_tag {
            return None;
        }
    }

    let value = (((codes[0] & NIBBLE_MASK) << 4) | (codes[1] & NIBBLE_MASK)) as u8;
    let check = (((codes[2] & NIBBLE_MASK) << 4) | (codes[3] & NIBBLE_MASK)) as u8;
    Some((value, check))
}

/// Examines a full 6-code window as a chunk group and stores it if valid.
fn parse_chunk_group(
    codes: &[i32],
    assembly: &mut ChunkAssembly,
    crc: &Crc8Calculator,
) -> GroupOutcome {
    let mut record: ChunkRecord = [0; CHUNK_GROUP_CODES];

    // Header positions: 7-bit checksum, then chunk index.
    for (slot, &code) in codes.iter().take(2).enumerate() {
        if code & CHUNK_HEADER_FLAG_MASK != CHUNK_HEADER_FLAG_VALUE {
            return GroupOutcome::Misaligned;
        }
        record[slot] = (code & CHUNK_HEADER_VALUE_MASK) as u8;
    }

    let index = usize::from(record[1]);
    if index >= assembly.chunk_count() || assembly.contains(index) {
        return GroupOutcome::Rejected;
    }

    // Data positions beyond the final chunk's meaningful bytes are pad
    // frames and carry no constraints.
    let payload_len = assembly.payload_len(index);
    for offset in 0..payload_len {
        let code = codes[2 + offset];
        if !(0..=MAX_PROTOCOL_CODE).contains(&code) || code & CHUNK_DATA_FLAG_MASK == 0 {
            return GroupOutcome::Misaligned;
        }
        record[2 + offset] = (code & CHUNK_DATA_BYTE_MASK) as u8;
    }

    if crc.checksum7(&record[1..2 + payload_len]) != record[0] {
        return GroupOutcome::Rejected;
    }

    assembly.store(index, record);
    GroupOutcome::Stored
}

#[cfg(test)]
impl AirKissDecoder {
    pub(crate) fn window_len(&self) -> usize {
        self.window.len()
    }
}
