//! Packet building and parsing.
//!
//! A packet is the fixed [`PacketHeader`] followed by `payloadLength`
//! bytes of payload. [`PacketBuilder`] writes the header up front with a
//! placeholder length and patches the real payload size in on
//! finalization, so payloads can be appended incrementally without
//! knowing their size in advance.
//!
//! Every packet built in this process draws its sequence number from one
//! global atomic counter — the wire contract is a single process-wide
//! stream, not a per-session one.

use std::sync::atomic::{AtomicU32, Ordering};

use bytes::{Buf, Bytes};

use crate::error::TrackError;
use crate::header::{HEADER_SIZE, PacketHeader};
use crate::message::PacketType;

/// Upper bound on a single packet payload. Generous for subtitle data;
/// mainly a guard against corrupt length words on the wire.
pub const MAX_PAYLOAD_SIZE: usize = 4 * 1024 * 1024;

// ── Global sequence counter ──────────────────────────────────────

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Issue the next process-wide packet sequence number. The first packet
/// ever built gets sequence 1.
fn next_sequence() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
}

// ── PacketBuilder ────────────────────────────────────────────────

/// Incremental packet writer.
///
/// Constructed with a type (possibly [`PacketType::Invalid`], refined
/// later via [`set_type`](Self::set_type)); the length field holds the
/// placeholder `1` until [`finish`](Self::finish) patches in the real
/// payload size.
pub struct PacketBuilder {
    buf: Vec<u8>,
}

impl PacketBuilder {
    /// Byte offset of the length field within the header.
    const LENGTH_OFFSET: usize = 12;
    /// Placeholder written into the length field at construction.
    const LENGTH_PLACEHOLDER: u32 = 1;

    pub fn new(packet_type: PacketType) -> Self {
        let mut buf = Vec::with_capacity(HEADER_SIZE + 32);
        buf.extend_from_slice(&(packet_type as u32).to_le_bytes());
        buf.extend_from_slice(&next_sequence().to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&Self::LENGTH_PLACEHOLDER.to_le_bytes());
        Self { buf }
    }

    /// Overwrite the type field. Valid any time before [`finish`](Self::finish).
    pub fn set_type(&mut self, packet_type: PacketType) -> &mut Self {
        self.buf[0..4].copy_from_slice(&(packet_type as u32).to_le_bytes());
        self
    }

    /// Append one little-endian 32-bit payload word.
    pub fn push_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Append a 64-bit millisecond value as low/high 32-bit words.
    pub fn push_u64(&mut self, value: u64) -> &mut Self {
        self.push_u32(value as u32);
        self.push_u32((value >> 32) as u32)
    }

    /// Append a signed 64-bit display offset as low/high 32-bit words.
    pub fn push_offset_ms(&mut self, offset_ms: i64) -> &mut Self {
        self.push_u64(offset_ms as u64)
    }

    /// Append raw payload bytes.
    pub fn push_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Finalize: patch the real payload length into the header and
    /// return the framed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let payload_len = (self.buf.len() - HEADER_SIZE) as u32;
        self.buf[Self::LENGTH_OFFSET..Self::LENGTH_OFFSET + 4]
            .copy_from_slice(&payload_len.to_le_bytes());
        self.buf
    }
}

// ── Packet ───────────────────────────────────────────────────────

/// A parsed packet: typed header plus an immutable payload view.
#[derive(Debug, Clone)]
pub struct Packet {
    header: PacketHeader,
    packet_type: PacketType,
    payload: Bytes,
}

impl Packet {
    /// Parse one complete framed packet. The declared payload length
    /// must match the bytes remaining after the header exactly; unknown
    /// type words are a parse failure here so malformed input never
    /// reaches dispatch.
    pub fn parse(bytes: &[u8]) -> Result<Self, TrackError> {
        let header = PacketHeader::from_bytes(bytes)?;
        let remaining = bytes.len() - HEADER_SIZE;
        let declared = header.payload_length() as usize;
        if declared > MAX_PAYLOAD_SIZE {
            return Err(TrackError::PayloadTooLarge {
                size: declared,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        if declared != remaining {
            return Err(TrackError::PayloadLengthMismatch {
                declared,
                remaining,
            });
        }
        let packet_type = PacketType::try_from(header.packet_type())?;
        Ok(Self {
            header,
            packet_type,
            payload: Bytes::copy_from_slice(&bytes[HEADER_SIZE..]),
        })
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn sequence(&self) -> u32 {
        self.header.sequence()
    }

    pub fn payload_length(&self) -> usize {
        self.header.payload_length() as usize
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Cursor over the payload words.
    pub fn reader(&self) -> PayloadReader {
        PayloadReader {
            buf: self.payload.clone(),
        }
    }
}

// ── PayloadReader ────────────────────────────────────────────────

/// Sequential little-endian reader over a packet payload.
pub struct PayloadReader {
    buf: Bytes,
}

impl PayloadReader {
    fn ensure(&self, need: usize) -> Result<(), TrackError> {
        if self.buf.remaining() < need {
            return Err(TrackError::PayloadTruncated {
                expected: need,
                actual: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32, TrackError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    /// Read a 64-bit millisecond value stored as low/high 32-bit words.
    pub fn read_u64(&mut self) -> Result<u64, TrackError> {
        let lo = self.read_u32()?;
        let hi = self.read_u32()?;
        Ok(u64::from(lo) | (u64::from(hi) << 32))
    }

    /// Read a signed 64-bit display offset stored as low/high words.
    pub fn read_offset_ms(&mut self) -> Result<i64, TrackError> {
        Ok(self.read_u64()? as i64)
    }

    /// Remaining bytes after the words read so far.
    pub fn rest(self) -> Bytes {
        self.buf
    }
}

// ── Tests ────────────────────────────────────────────────────────
