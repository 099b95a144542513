//! Fixed 16-byte packet header: `[type][sequence][reserved][payloadLength]`,
//! all little-endian `u32`.

use crate::error::TrackError;

/// Size of the fixed packet header in bytes.
pub const HEADER_SIZE: usize = 16;

/// The fixed header preceding every packet payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    packet_type: u32,
    sequence: u32,
    reserved: u32,
    payload_length: u32,
}

impl PacketHeader {
    pub fn new(packet_type: u32, sequence: u32, payload_length: u32) -> Self {
        Self {
            packet_type,
            sequence,
            reserved: 0,
            payload_length,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.packet_type.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sequence.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.reserved.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.payload_length.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrackError> {
        if bytes.len() < HEADER_SIZE {
            return Err(TrackError::HeaderTruncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let word = |at: usize| {
            u32::from_le_bytes(
                bytes[at..at + 4]
                    .try_into()
                    .expect("slice is exactly 4 bytes"),
            )
        };
        Ok(Self {
            packet_type: word(0),
            sequence: word(4),
            reserved: word(8),
            payload_length: word(12),
        })
    }

    /// Raw type word; mapped to a `PacketType` at dispatch time.
    pub fn packet_type(&self) -> u32 {
        self.packet_type
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn payload_length(&self) -> u32 {
        self.payload_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = PacketHeader::new(0x26, 42, 1234);
        let parsed = PacketHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.packet_type(), 0x26);
        assert_eq!(parsed.sequence(), 42);
        assert_eq!(parsed.payload_length(), 1234);
    }

    #[test]
    fn header_too_short() {
        assert!(matches!(
            PacketHeader::from_bytes(&[0u8; 15]),
            Err(TrackError::HeaderTruncated {
                expected: HEADER_SIZE,
                actual: 15
            })
        ));
    }

    #[test]
    fn header_layout_is_little_endian() {
        let header = PacketHeader::new(0x0102_0304, 1, 2);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0]); // reserved
    }
}
