//! Sender-side AirKiss code generation.
//!
//! Produces the 9-bit code blocks a provisioning sender modulates into
//! frame lengths: the guide run, the magic and prefix quads, and one 6-code
//! group per 4-byte payload chunk. The output is the exact inverse of what
//! [`AirKissDecoder`](crate::decoder::AirKissDecoder) parses, which makes
//! it the engine of the crate's round-trip tests; it is equally usable to
//! drive a real sender, which turns each code into a frame of length
//! `code + base`, where `base` is whatever constant its radio path adds.

use crate::constants::*;
use crate::crc::{CRC7_MASK, airkiss_crc8};
use crate::error::EncodeError;

/// Inert code transmitted between blocks.
///
/// Receivers drop a fixed number of observations after each phase
/// transition to let the sender's block repetitions drain; these filler
/// codes occupy exactly that settling window and match no phase pattern.
const PAD_CODE: u16 = 0;

/// The code blocks for one provisioning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSession {
    guide: [u16; QUAD_WINDOW_SIZE],
    magic: [u16; QUAD_WINDOW_SIZE],
    prefix: [u16; QUAD_WINDOW_SIZE],
    chunks: Vec<[u16; CHUNK_GROUP_CODES]>,
}

impl EncodedSession {
    /// The guide run: four consecutive codes the receiver learns its
    /// base length from.
    pub fn guide(&self) -> &[u16; QUAD_WINDOW_SIZE] {
        &self.guide
    }

    /// The magic quad carrying `total_length` and the SSID CRC-8.
    pub fn magic(&self) -> &[u16; QUAD_WINDOW_SIZE] {
        &self.magic
    }

    /// The prefix quad carrying the password length and its CRC-8.
    pub fn prefix(&self) -> &[u16; QUAD_WINDOW_SIZE] {
        &self.prefix
    }

    /// The 6-code chunk groups, in index order.
    pub fn chunks(&self) -> &[[u16; CHUNK_GROUP_CODES]] {
        &self.chunks
    }

    /// Flattens the session into one transmittable code sequence.
    ///
    /// Pad codes are interleaved after the guide, magic and prefix blocks
    /// to fill the receiver's post-transition settling windows, so a
    /// single pass over the stream (with consecutive sequence numbers)
    /// decodes completely.
    pub fn code_stream(&self) -> Vec<u16> {
        let mut stream = Vec::with_capacity(
            3 * QUAD_WINDOW_SIZE
                + usize::from(IGNORE_AFTER_GUIDE + IGNORE_AFTER_MAGIC + IGNORE_AFTER_PREFIX)
                + self.chunks.len() * CHUNK_GROUP_CODES,
        );
        let pads = |count: u16| std::iter::repeat(PAD_CODE).take(usize::from(count));
        stream.extend_from_slice(&self.guide);
        stream.extend(pads(IGNORE_AFTER_GUIDE));
        stream.extend_from_slice(&self.magic);
        stream.extend(pads(IGNORE_AFTER_MAGIC));
        stream.extend_from_slice(&self.prefix);
        stream.extend(pads(IGNORE_AFTER_PREFIX));
        for group in &self.chunks {
            stream.extend_from_slice(group);
        }
        stream
    }
}

/// Encodes credentials into the session's code blocks.
///
/// # Parameters
/// - `ssid`: network SSID, raw bytes.
/// - `password`: network password, raw bytes; empty for open networks.
/// - `random_byte`: the session tag echoed back by the provisioned device.
///
/// # Errors
/// - [`EncodeError::CredentialsTooLong`] - the payload exceeds the
///   protocol's 255-byte limit.
pub fn encode(ssid: &[u8], password: &[u8], random_byte: u8) -> Result<EncodedSession, EncodeError> {
    let total = password.len() + 1 + ssid.len();
    if total > MAX_TOTAL_LENGTH {
        return Err(EncodeError::CredentialsTooLong {
            total,
            pwd_len: password.len(),
            ssid_len: ssid.len(),
        });
    }
    let total_length = total as u8;
    let pwd_length = password.len() as u8;

    let mut payload = Vec::with_capacity(total);
    payload.extend_from_slice(password);
    payload.push(random_byte);
    payload.extend_from_slice(ssid);

    let chunks = payload
        .chunks(CHUNK_PAYLOAD_BYTES)
        .enumerate()
        .map(|(index, bytes)| encode_chunk_group(index as u8, bytes))
        .collect();

    Ok(EncodedSession {
        guide: [1, 2, 3, 4],
        magic: encode_tagged_quad(MAGIC_TAG_BASE, total_length, airkiss_crc8(ssid)),
        prefix: encode_tagged_quad(PREFIX_TAG_BASE, pwd_length, airkiss_crc8(&[pwd_length])),
        chunks,
    })
}

/// Encodes one byte and its checksum byte into four position-tagged codes.
fn encode_tagged_quad(tag_base: u8, value: u8, check: u8) -> [u16; QUAD_WINDOW_SIZE] {
    let tag = |position: u16| (u16::from(tag_base) + position) << 4;
    [
        tag(0) | u16::from(value >> 4),
        tag(1) | u16::from(value & 0x0F),
        tag(2) | u16::from(check >> 4),
        tag(3) | u16::from(check & 0x0F),
    ]
}

/// Encodes one payload chunk into its 6-code group.
///
/// A partial final chunk is padded up to the full group width with bare
/// data-flag codes; the receiver neither validates nor reads those
/// positions.
fn encode_chunk_group(index: u8, bytes: &[u8]) -> [u16; CHUNK_GROUP_CODES] {
    let mut tail = Vec::with_capacity(1 + bytes.len());
    tail.push(index);
    tail.extend_from_slice(bytes);
    let crc7 = airkiss_crc8(&tail) & CRC7_MASK;

    let mut group = [CHUNK_DATA_FLAG_MASK as u16; CHUNK_GROUP_CODES];
    group[0] = CHUNK_HEADER_FLAG_VALUE as u16 | u16::from(crc7);
    group[1] = CHUNK_HEADER_FLAG_VALUE as u16 | u16::from(index);
    for (slot, &byte) in bytes.iter().enumerate() {
        group[2 + slot] = CHUNK_DATA_FLAG_MASK as u16 | u16::from(byte);
    }
    group
}
