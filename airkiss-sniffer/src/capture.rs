//! Frame acquisition via pcap.
//!
//! Supports live capture from a monitor-mode interface and offline capture
//! files. Live reads use a short kernel timeout so the caller's loop can
//! observe its global deadline between packets; offline reads report
//! exhaustion when the file ends.

use std::path::Path;

use pcap::{Active, Capture, Linktype, Offline};
use tracing::{debug, info};

use crate::error::SnifferError;
use crate::radiotap::strip_radiotap;

/// DLT_IEEE802_11: bare 802.11 frames.
const LINKTYPE_IEEE802_11: i32 = 105;
/// DLT_IEEE802_11_RADIO: 802.11 frames behind a radiotap header.
const LINKTYPE_IEEE802_11_RADIOTAP: i32 = 127;

/// Kernel-side read timeout for live captures, in milliseconds.
const READ_TIMEOUT_MS: i32 = 100;

/// Capture buffer size in bytes.
const BUFFER_SIZE: i32 = 65536;

/// Bytes captured per frame. The decoder works on frame lengths, so the
/// snaplen must exceed any frame a sender can emit; codes are 9-bit, which
/// tops payload frames out well below this.
const SNAPLEN: i32 = 1600;

/// Result of polling a frame feed once.
#[derive(Debug)]
pub enum FramePoll {
    /// One 802.11 frame, radiotap already stripped.
    Frame(Vec<u8>),
    /// Nothing arrived within the read timeout; poll again.
    Idle,
    /// The feed has no more frames (offline file fully read).
    Exhausted,
}

/// A source of 802.11 frames.
///
/// The run loop is written against this seam so tests can substitute
/// synthetic feeds for a real capture handle.
pub trait FrameFeed {
    fn next_frame(&mut self) -> Result<FramePoll, SnifferError>;
}

enum CaptureKind {
    Live(Capture<Active>),
    Offline(Capture<Offline>),
}

/// How the 802.11 frame is wrapped on this link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayer {
    /// Bare 802.11 frames.
    Dot11,
    /// Radiotap pseudo-header before each frame.
    Radiotap,
}

/// Live or offline pcap frame source.
pub struct FrameSource {
    capture: CaptureKind,
    link: LinkLayer,
}

impl FrameSource {
    /// Opens a live capture on a monitor-mode interface.
    ///
    /// # Errors
    /// - [`SnifferError::CaptureOpen`] - device missing, no permission
    /// - [`SnifferError::UnsupportedLinkType`] - not an 802.11 link
    pub fn open_interface(name: &str) -> Result<Self, SnifferError> {
        let capture = Capture::from_device(name)
            .and_then(|inactive| {
                inactive
                    .promisc(true)
                    .immediate_mode(true)
                    .snaplen(SNAPLEN)
                    .buffer_size(BUFFER_SIZE)
                    .timeout(READ_TIMEOUT_MS)
                    .open()
            })
            .map_err(|source| SnifferError::CaptureOpen {
                device: name.to_string(),
                source,
            })?;

        let link = classify_link(capture.get_datalink())?;
        info!(interface = name, link = ?link, "live capture open");
        Ok(Self {
            capture: CaptureKind::Live(capture),
            link,
        })
    }

    /// Opens an offline capture file.
    ///
    /// # Errors
    /// - [`SnifferError::FileOpen`] - unreadable or malformed file
    /// - [`SnifferError::UnsupportedLinkType`] - not an 802.11 capture
    pub fn open_file(path: &Path) -> Result<Self, SnifferError> {
        let capture = Capture::from_file(path).map_err(|source| SnifferError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let link = classify_link(capture.get_datalink())?;
        info!(path = %path.display(), link = ?link, "offline capture open");
        Ok(Self {
            capture: CaptureKind::Offline(capture),
            link,
        })
    }

    /// The link wrapping this source delivers.
    pub fn link_layer(&self) -> LinkLayer {
        self.link
    }

    fn poll(&mut self) -> Result<FramePoll, SnifferError> {
        let (packet, live) = match &mut self.capture {
            CaptureKind::Live(capture) => (capture.next_packet(), true),
            CaptureKind::Offline(capture) => (capture.next_packet(), false),
        };

        let data = match packet {
            Ok(packet) => packet.data.to_vec(),
            Err(pcap::Error::TimeoutExpired) if live => return Ok(FramePoll::Idle),
            Err(pcap::Error::NoMorePackets) => return Ok(FramePoll::Exhausted),
            Err(error) => return Err(SnifferError::CaptureRead(error)),
        };

        match self.link {
            LinkLayer::Dot11 => Ok(FramePoll::Frame(data)),
            LinkLayer::Radiotap => match strip_radiotap(&data) {
                Some(frame) => Ok(FramePoll::Frame(frame.to_vec())),
                None => {
                    debug!(len = data.len(), "dropping frame with bad radiotap header");
                    Ok(FramePoll::Idle)
                }
            },
        }
    }
}

impl FrameFeed for FrameSource {
    fn next_frame(&mut self) -> Result<FramePoll, SnifferError> {
        self.poll()
    }
}

fn classify_link(link: Linktype) -> Result<LinkLayer, SnifferError> {
    match link.0 {
        LINKTYPE_IEEE802_11 => Ok(LinkLayer::Dot11),
        LINKTYPE_IEEE802_11_RADIOTAP => Ok(LinkLayer::Radiotap),
        _ => Err(SnifferError::UnsupportedLinkType(link)),
    }
}
