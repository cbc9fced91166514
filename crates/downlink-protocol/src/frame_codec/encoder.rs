//! Frame encoding.
//!
//! Serializes frames into the big-endian wire format:
//!
//! ```text
//! offset  size  field
//! 0       2     version
//! 2       1     kind tag
//! 3       4     seq
//! 7       4     payload_size
//! 11      N     payload
//! 11+N    2     crc16
//! ```

use downlink_core::constants::HEADER_SIZE;

use crate::frame::Frame;

/// Serializes a frame into bytes for transmission.
pub struct FrameEncoder;

impl FrameEncoder {
    /// Encodes a frame into the provided buffer (appends bytes).
    pub fn encode_into(buffer: &mut Vec<u8>, frame: &Frame) {
        Self::write_crc_region(buffer, frame);
        buffer.extend_from_slice(&frame.crc16.to_be_bytes());
    }

    /// Encodes a frame into a byte vector.
    pub fn encode(frame: &Frame) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(frame.encoded_len());
        Self::encode_into(&mut buffer, frame);
        buffer
    }

    /// Serializes the region the CRC covers: the 11-byte header followed by
    /// the payload. The payload-size field is derived from the payload
    /// length, so a stale size cannot leak onto the wire.
    pub fn crc_region(frame: &Frame) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(HEADER_SIZE + frame.payload.len());
        Self::write_crc_region(&mut buffer, frame);
        buffer
    }

    fn write_crc_region(buffer: &mut Vec<u8>, frame: &Frame) {
        buffer.extend_from_slice(&frame.version.to_be_bytes());
        buffer.push(frame.kind_tag);
        buffer.extend_from_slice(&frame.seq.to_be_bytes());
        buffer.extend_from_slice(&(frame.payload.len() as u32).to_be_bytes());
        buffer.extend_from_slice(&frame.payload);
    }
}
