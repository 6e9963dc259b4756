//! `airkiss`: a passive decoder for the AirKiss Wi-Fi provisioning protocol.
//!
//! AirKiss hands an SSID, a password and a one-byte random tag to an
//! unconfigured device over a side channel that survives WPA encryption:
//! the *lengths* of ordinary 802.11 data frames. A sender (typically a
//! phone) modulates bytes into frame lengths; a passive sniffer on the same
//! channel observes `(sequence_number, frame_length)` pairs per station and
//! reconstructs the credentials without decrypting a single payload.
//!
//! ## Core Concepts
//!
//! - **[`AirKissDecoder`]**: a per-sender state machine. Feed it
//!   observations with [`put`](AirKissDecoder::put); it either completes
//!   with a [`Credentials`] record or stays pending forever (external
//!   timeouts govern liveness).
//! - **[`DoneSignal`]**: a clonable one-shot handle fired on completion,
//!   pollable or awaitable with a timeout.
//! - **[`encoder`]**: the sender side of the wire format, producing the
//!   code blocks a provisioning sender modulates into frame lengths; it is
//!   also how this crate round-trip-tests itself.
//!
//! The capture side (monitor-mode interfaces, radiotap, 802.11 headers,
//! per-station dispatch) lives in the companion `airkiss-sniffer` crate;
//! this crate is pure computation with no I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use airkiss::{encode, AirKissDecoder, FrameLength, SequenceNumber};
//!
//! fn main() -> Result<(), airkiss::EncodeError> {
//!     // A sender modulates credentials into frame lengths: every frame is
//!     // `code + base` bytes long, where `base` is whatever constant its
//!     // radio path adds (headers, encryption overhead, ...).
//!     let session = encode(b"myhome", b"hunter2", 0x42)?;
//!     let base = 60u16;
//!
//!     // The sniffer replays the observed (length, sequence number) pairs
//!     // into a decoder.
//!     let mut decoder = AirKissDecoder::new();
//!     for (i, code) in session.code_stream().into_iter().enumerate() {
//!         decoder.put(
//!             FrameLength::new(code + base),
//!             SequenceNumber::new(i as u16 + 1),
//!         );
//!     }
//!
//!     assert!(decoder.done().is_fired());
//!     let credentials = decoder.credentials().expect("session complete");
//!     assert_eq!(credentials.ssid(), b"myhome");
//!     assert_eq!(credentials.password(), b"hunter2");
//!     assert_eq!(credentials.random_byte(), 0x42);
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod signal;
pub mod types;

mod chunk;
mod window;

pub use chunk::Credentials;
pub use crc::airkiss_crc8;
pub use decoder::{AirKissDecoder, DecoderPhase};
pub use encoder::{EncodedSession, encode};
pub use error::EncodeError;
pub use signal::DoneSignal;
pub use types::{FrameLength, SequenceNumber};
