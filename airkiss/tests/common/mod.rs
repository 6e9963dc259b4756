//! Common test utilities for AirKiss decoder integration tests.
//!
//! Provides helpers for turning encoded sessions into observation streams
//! and driving decoders through them, shared across the flow and
//! resilience test files.

#![allow(dead_code)] // Not every helper is used by every test binary.

use airkiss::{AirKissDecoder, Credentials, EncodedSession, FrameLength, SequenceNumber, encode};

/// Base frame length applied to every code unless a test chooses its own.
pub const DEFAULT_BASE: u16 = 60;

/// Feeds raw codes to a decoder as `code + base` frame lengths with
/// consecutive sequence numbers.
///
/// # Returns
/// The next unused sequence number.
pub fn feed_codes(
    decoder: &mut AirKissDecoder,
    codes: &[u16],
    base: u16,
    start_seq: u16,
) -> u16 {
    let mut seq = start_seq;
    for &code in codes {
        decoder.put(FrameLength::new(code + base), SequenceNumber::new(seq));
        seq = seq.wrapping_add(1);
    }
    seq
}

/// Feeds a complete session stream to a decoder.
pub fn feed_session(
    decoder: &mut AirKissDecoder,
    session: &EncodedSession,
    base: u16,
    start_seq: u16,
) -> u16 {
    feed_codes(decoder, &session.code_stream(), base, start_seq)
}

/// Runs the full encode-then-decode pipeline for one credential tuple.
pub fn decode_credentials(ssid: &[u8], password: &[u8], random_byte: u8) -> Credentials {
    let session = encode(ssid, password, random_byte).expect("credentials fit the protocol");
    let mut decoder = AirKissDecoder::new();
    feed_session(&mut decoder, &session, DEFAULT_BASE, 1);
    assert!(
        decoder.is_done(),
        "decoder still in {:?} after a clean session stream",
        decoder.phase()
    );
    decoder.credentials().expect("done implies credentials").clone()
}

/// Drives a fresh decoder through guide + settling so it sits in MagicCode
/// with an empty window.
///
/// # Returns
/// The decoder and the next unused sequence number.
pub fn decoder_in_magic_phase(base: u16) -> (AirKissDecoder, u16) {
    let mut decoder = AirKissDecoder::new();
    let mut seq = feed_codes(&mut decoder, &[1, 2, 3, 4], base, 1);
    seq = feed_codes(&mut decoder, &[0; 10], base, seq);
    assert_eq!(decoder.phase(), airkiss::DecoderPhase::MagicCode);
    (decoder, seq)
}

/// Drives a fresh decoder into PrefixCode for the given session.
pub fn decoder_in_prefix_phase(session: &EncodedSession, base: u16) -> (AirKissDecoder, u16) {
    let (mut decoder, mut seq) = decoder_in_magic_phase(base);
    seq = feed_codes(&mut decoder, session.magic(), base, seq);
    seq = feed_codes(&mut decoder, &[0; 20], base, seq);
    assert_eq!(decoder.phase(), airkiss::DecoderPhase::PrefixCode);
    (decoder, seq)
}

/// Drives a fresh decoder into SeqData for the given session.
pub fn decoder_in_seq_data_phase(session: &EncodedSession, base: u16) -> (AirKissDecoder, u16) {
    let (mut decoder, mut seq) = decoder_in_prefix_phase(session, base);
    seq = feed_codes(&mut decoder, session.prefix(), base, seq);
    seq = feed_codes(&mut decoder, &[0; 20], base, seq);
    assert_eq!(decoder.phase(), airkiss::DecoderPhase::SeqData);
    (decoder, seq)
}
