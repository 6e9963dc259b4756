//! `airkiss-sniffer`: the capture side of the AirKiss decoder.
//!
//! Binds a frame source (live monitor-mode interface or offline capture
//! file) to a table of per-station [`AirKissDecoder`]s and runs until one
//! of them completes, the source runs dry, or a wall-clock timeout fires.
//!
//! The decoder core lives in the `airkiss` crate and is pure computation;
//! everything environmental — pcap, radiotap, 802.11 headers, station
//! keying, deadlines, logging — lives here.
//!
//! [`AirKissDecoder`]: airkiss::AirKissDecoder

pub mod capture;
pub mod dot11;
pub mod error;
pub mod radiotap;
pub mod session;
pub mod time;

use std::sync::Arc;
use std::time::Duration;

use airkiss::Credentials;
use tracing::{debug, info};

pub use capture::{FrameFeed, FramePoll, FrameSource};
pub use error::SnifferError;
pub use session::{SessionKey, SessionTable};
pub use time::{Clock, SystemClock};

/// Why a sniff run ended.
#[derive(Debug)]
pub enum SniffOutcome {
    /// A station completed an AirKiss session.
    Decoded(Credentials),
    /// The deadline elapsed with every decoder still pending.
    TimedOut,
    /// The frame source ran out of frames (offline captures only).
    Exhausted,
}

/// Drives a frame feed against per-station decoders until an outcome.
pub struct Sniffer<F> {
    feed: F,
    sessions: SessionTable,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl<F: FrameFeed> Sniffer<F> {
    /// Creates a sniffer over `feed` with the given give-up timeout.
    pub fn new(feed: F, timeout: Duration) -> Self {
        Self::with_clock(feed, timeout, Arc::new(SystemClock))
    }

    /// Creates a sniffer with an explicit clock, for tests.
    pub fn with_clock(feed: F, timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            feed,
            sessions: SessionTable::new(),
            timeout,
            clock,
        }
    }

    /// Runs until a decode, timeout, or feed exhaustion.
    ///
    /// # Errors
    /// - [`SnifferError`] - propagated capture failures; transient read
    ///   timeouts are not errors and keep the loop alive.
    pub fn run(&mut self) -> Result<SniffOutcome, SnifferError> {
        let deadline = self.clock.now() + self.timeout;

        loop {
            if self.clock.now() >= deadline {
                info!(
                    stations = self.sessions.session_count(),
                    "timeout with all decoders pending"
                );
                return Ok(SniffOutcome::TimedOut);
            }

            match self.feed.next_frame()? {
                FramePoll::Idle => continue,
                FramePoll::Exhausted => {
                    debug!(
                        stations = self.sessions.session_count(),
                        "capture exhausted"
                    );
                    return Ok(SniffOutcome::Exhausted);
                }
                FramePoll::Frame(frame) => {
                    if let Some(credentials) = self.handle_frame(&frame) {
                        return Ok(SniffOutcome::Decoded(credentials));
                    }
                }
            }
        }
    }

    fn handle_frame(&mut self, frame: &[u8]) -> Option<Credentials> {
        let header = dot11::parse_data_header(frame)?;
        let frame_len = u16::try_from(frame.len()).unwrap_or(u16::MAX);
        self.sessions.observe(&header, frame_len)
    }

    /// Number of stations seen so far.
    pub fn session_count(&self) -> usize {
        self.sessions.session_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dot11::build_data_frame;
    use crate::time::mock_clock::MockClock;
    use std::time::Instant;

    const PHONE: [u8; 6] = [0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x33];
    const AP: [u8; 6] = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01];

    /// Replays prepared frames; advances the shared clock on every poll so
    /// deadline logic is exercised deterministically.
    struct ScriptedFeed {
        frames: std::vec::IntoIter<Vec<u8>>,
        clock: Arc<MockClock>,
        tick: Duration,
    }

    impl ScriptedFeed {
        fn new(frames: Vec<Vec<u8>>, clock: Arc<MockClock>, tick: Duration) -> Self {
            Self {
                frames: frames.into_iter(),
                clock,
                tick,
            }
        }
    }

    impl FrameFeed for ScriptedFeed {
        fn next_frame(&mut self) -> Result<FramePoll, SnifferError> {
            self.clock.advance(self.tick);
            match self.frames.next() {
                Some(frame) => Ok(FramePoll::Frame(frame)),
                None => Ok(FramePoll::Idle),
            }
        }
    }

    fn airkiss_frames(base: u16) -> Vec<Vec<u8>> {
        let session = airkiss::encode(b"testnet", b"secret99", 0x7F).unwrap();
        session
            .code_stream()
            .into_iter()
            .enumerate()
            .map(|(i, code)| {
                build_data_frame(
                    true,
                    AP,
                    PHONE,
                    [9; 6],
                    i as u16 + 1,
                    usize::from(code + base),
                )
            })
            .collect()
    }

    #[test]
    fn decodes_scripted_airkiss_session() {
        let clock = Arc::new(MockClock::new(Instant::now()));
        let feed = ScriptedFeed::new(airkiss_frames(64), clock.clone(), Duration::from_millis(1));
        let mut sniffer = Sniffer::with_clock(feed, Duration::from_secs(60), clock);

        match sniffer.run().expect("no capture errors") {
            SniffOutcome::Decoded(credentials) => {
                assert_eq!(credentials.ssid(), b"testnet");
                assert_eq!(credentials.password(), b"secret99");
                assert_eq!(credentials.random_byte(), 0x7F);
            }
            other => panic!("expected a decode, got {:?}", other),
        }
        assert_eq!(sniffer.session_count(), 1);
    }

    #[test]
    fn times_out_on_idle_channel() {
        let clock = Arc::new(MockClock::new(Instant::now()));
        let feed = ScriptedFeed::new(Vec::new(), clock.clone(), Duration::from_millis(200));
        let mut sniffer = Sniffer::with_clock(feed, Duration::from_secs(1), clock);

        assert!(matches!(
            sniffer.run().expect("no capture errors"),
            SniffOutcome::TimedOut
        ));
    }

    #[test]
    fn non_airkiss_traffic_times_out() {
        // Ordinary traffic with erratic lengths never completes a decoder.
        let clock = Arc::new(MockClock::new(Instant::now()));
        let frames: Vec<Vec<u8>> = (0..200u16)
            .map(|i| build_data_frame(true, AP, PHONE, [9; 6], i + 1, 64 + usize::from(i % 37) * 7))
            .collect();
        let feed = ScriptedFeed::new(frames, clock.clone(), Duration::from_millis(10));
        let mut sniffer = Sniffer::with_clock(feed, Duration::from_secs(3), clock);

        assert!(matches!(
            sniffer.run().expect("no capture errors"),
            SniffOutcome::TimedOut
        ));
        assert_eq!(sniffer.session_count(), 1);
    }

    #[test]
    fn exhausted_feed_reports_exhaustion() {
        struct EmptyFeed;
        impl FrameFeed for EmptyFeed {
            fn next_frame(&mut self) -> Result<FramePoll, SnifferError> {
                Ok(FramePoll::Exhausted)
            }
        }

        let mut sniffer = Sniffer::new(EmptyFeed, Duration::from_secs(60));
        assert!(matches!(
            sniffer.run().expect("no capture errors"),
            SniffOutcome::Exhausted
        ));
    }

    #[test]
    fn management_frames_are_ignored() {
        let clock = Arc::new(MockClock::new(Instant::now()));
        let mut beacon = build_data_frame(true, AP, PHONE, [9; 6], 1, 128);
        beacon[0] = 0x80;
        let feed = ScriptedFeed::new(vec![beacon], clock.clone(), Duration::from_millis(100));
        let mut sniffer = Sniffer::with_clock(feed, Duration::from_secs(1), clock);

        assert!(matches!(
            sniffer.run().expect("no capture errors"),
            SniffOutcome::TimedOut
        ));
        assert_eq!(sniffer.session_count(), 0);
    }
}
