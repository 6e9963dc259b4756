//! Sniffer error types.
//!
//! Everything user-visible that can go wrong lives at the capture edge:
//! the decoder core itself never fails, it only stays pending. The
//! `thiserror` crate is used for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while capturing and dispatching frames.
#[derive(Error, Debug)]
pub enum SnifferError {
    /// Opening the live capture device failed (missing interface, missing
    /// privileges, or no monitor mode support).
    #[error("failed to open capture device '{device}'")]
    CaptureOpen {
        device: String,
        #[source]
        source: pcap::Error,
    },

    /// Opening an offline capture file failed.
    #[error("failed to open capture file '{}'", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: pcap::Error,
    },

    /// The capture delivers a link type this sniffer cannot interpret.
    #[error(
        "unsupported link type {0:?}: need IEEE 802.11 frames, with or without a radiotap header \
         (is the interface in monitor mode?)"
    )]
    UnsupportedLinkType(pcap::Linktype),

    /// Reading the next packet failed for a non-transient reason.
    #[error("capture read failed")]
    CaptureRead(#[from] pcap::Error),
}
