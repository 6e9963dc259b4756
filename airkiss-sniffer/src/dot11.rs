//! Minimal IEEE 802.11 header parsing.
//!
//! The sniffer never looks inside frame bodies (they are encrypted anyway);
//! it only needs enough of the MAC header to identify data frames, derive
//! the per-sender dispatch key from the address fields, and read the
//! sequence number. Everything else is skipped.

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(data: &[u8]) -> Option<Self> {
        if data.len() >= 6 {
            let mut bytes = [0u8; 6];
            bytes.copy_from_slice(&data[..6]);
            Some(Self(bytes))
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

/// Frame type (2 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Extension,
}

impl From<u8> for FrameType {
    fn from(val: u8) -> Self {
        match val & 0x03 {
            0 => FrameType::Management,
            1 => FrameType::Control,
            2 => FrameType::Data,
            _ => FrameType::Extension,
        }
    }
}

/// Frame control field (2 bytes)
#[derive(Debug, Clone, Copy)]
pub struct FrameControl {
    /// Frame type
    pub frame_type: FrameType,
    /// Raw 4-bit subtype
    pub subtype: u8,
    /// To DS flag
    pub to_ds: bool,
    /// From DS flag
    pub from_ds: bool,
    /// Retry flag (retransmitted frame, same sequence number)
    pub retry: bool,
    /// Protected frame flag (WEP/WPA)
    pub protected: bool,
}

impl FrameControl {
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }

        let fc0 = data[0];
        let fc1 = data[1];

        Some(Self {
            frame_type: FrameType::from((fc0 >> 2) & 0x03),
            subtype: (fc0 >> 4) & 0x0f,
            to_ds: fc1 & 0x01 != 0,
            from_ds: fc1 & 0x02 != 0,
            retry: fc1 & 0x08 != 0,
            protected: fc1 & 0x40 != 0,
        })
    }
}

/// Header view of an 802.11 data frame.
#[derive(Debug, Clone, Copy)]
pub struct DataHeader {
    pub frame_control: FrameControl,
    /// Address 1 (receiver)
    pub addr1: MacAddr,
    /// Address 2 (transmitter)
    pub addr2: MacAddr,
    /// Address 3 (BSSID, source or destination depending on DS flags)
    pub addr3: MacAddr,
    /// Sequence number (12 bits)
    pub sequence_number: u16,
    /// Fragment number (4 bits)
    pub fragment_number: u8,
}

/// Parses the MAC header of a data frame.
///
/// # Returns
/// The header view, or `None` when the frame is not a data frame or is
/// shorter than the 24-byte three-address header.
pub fn parse_data_header(data: &[u8]) -> Option<DataHeader> {
    let frame_control = FrameControl::parse(data)?;
    if frame_control.frame_type != FrameType::Data || data.len() < 24 {
        return None;
    }

    let addr1 = MacAddr::from_slice(&data[4..])?;
    let addr2 = MacAddr::from_slice(&data[10..])?;
    let addr3 = MacAddr::from_slice(&data[16..])?;
    let seq_control = u16::from_le_bytes([data[22], data[23]]);

    Some(DataHeader {
        frame_control,
        addr1,
        addr2,
        addr3,
        sequence_number: seq_control >> 4,
        fragment_number: (seq_control & 0x0f) as u8,
    })
}

/// Builds a minimal data frame for unit tests across this crate.
#[cfg(test)]
pub(crate) fn build_data_frame(
    to_ds: bool,
    addr1: [u8; 6],
    addr2: [u8; 6],
    addr3: [u8; 6],
    seq: u16,
    total_len: usize,
) -> Vec<u8> {
    let mut frame = vec![0u8; total_len.max(24)];
    frame[0] = 0x08; // type = data, subtype = 0
    frame[1] = if to_ds { 0x41 } else { 0x42 }; // DS flag + protected
    frame[4..10].copy_from_slice(&addr1);
    frame[10..16].copy_from_slice(&addr2);
    frame[16..22].copy_from_slice(&addr3);
    frame[22..24].copy_from_slice(&(seq << 4).to_le_bytes());
    frame
}
