//! Frame decoding and structural validation.
//!
//! Decoding fails loudly on malformed input: frames shorter than the fixed
//! header and footer, payload sizes that overrun the buffer, and trailing
//! bytes past the CRC footer are all rejected with explicit error kinds.
//! Unknown kind tags are tolerated here and carried through as the raw tag;
//! the endpoint layer decides how to treat them.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use downlink_core::{
    constants::{CRC_SIZE, HEADER_SIZE, MIN_FRAME_SIZE},
    error::{DecodeError, Result},
};

use crate::frame::Frame;

/// Deserializes frames from wire bytes.
pub struct FrameDecoder;

impl FrameDecoder {
    /// Decodes a single frame from `input`.
    ///
    /// The input must contain exactly one frame: the declared payload size
    /// plus header and CRC footer must match the input length.
    pub fn decode(input: &[u8]) -> Result<Frame> {
        if input.len() < MIN_FRAME_SIZE {
            return Err(DecodeError::TooShort {
                expected: MIN_FRAME_SIZE,
                actual: input.len(),
            }
            .into());
        }

        let mut cursor = Cursor::new(input);
        let version = cursor.read_u16::<BigEndian>()?;
        let kind_tag = cursor.read_u8()?;
        let seq = cursor.read_u32::<BigEndian>()?;
        let payload_size = cursor.read_u32::<BigEndian>()? as usize;

        let expected_total = HEADER_SIZE + payload_size + CRC_SIZE;
        if input.len() < expected_total {
            return Err(DecodeError::PayloadOverrun {
                payload_size,
                remaining: input.len() - MIN_FRAME_SIZE,
            }
            .into());
        }
        if input.len() > expected_total {
            return Err(DecodeError::TrailingBytes {
                expected: expected_total,
                actual: input.len(),
            }
            .into());
        }

        let mut payload = vec![0u8; payload_size];
        cursor.read_exact(&mut payload)?;
        let crc16 = cursor.read_u16::<BigEndian>()?;

        Ok(Frame { version, kind_tag, seq, payload, crc16 })
    }
}
