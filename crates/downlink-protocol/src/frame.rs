//! Frame types for the satellite ↔ ground-station protocol.
//!
//! A frame is the unit of transmission on the simulated link: an 11-byte
//! big-endian header, an opaque payload, and a CRC-16/CCITT-FALSE footer
//! covering header and payload.

use std::convert::TryFrom;

use downlink_core::{
    constants::{MIN_FRAME_SIZE, PROTOCOL_VERSION},
    error::PayloadError,
};

use crate::frame_codec::{checksum, FrameEncoder};

/// 32-bit sequence number type used by the protocol.
pub type SequenceNumber = u32;

/// Id to identify a certain frame kind.
#[derive(Copy, Clone, Debug, PartialOrd, PartialEq, Eq)]
pub enum FrameKind {
    /// Telemetry sample, satellite → ground station
    Telemetry = 1,
    /// Command, ground station → satellite
    Command = 2,
    /// Positive acknowledgment for a received frame
    Ack = 3,
    /// Negative acknowledgment (CRC or payload parse failure)
    Nak = 4,
}

impl FrameKind {
    /// Converts the kind to its wire tag.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FrameKind {
    type Error = PayloadError;

    /// Gets the `FrameKind` enum instance from a wire tag.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FrameKind::Telemetry),
            2 => Ok(FrameKind::Command),
            3 => Ok(FrameKind::Ack),
            4 => Ok(FrameKind::Nak),
            other => Err(PayloadError::UnknownKind(other)),
        }
    }
}

/// A protocol frame: header fields, opaque payload, and CRC footer.
///
/// The kind is stored as the raw wire tag so that frames with unrecognized
/// tags survive the codec; [`Frame::kind`] resolves it to a [`FrameKind`]
/// where one exists. The payload-size header field is derived from
/// `payload.len()` at serialization time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Protocol version, always [`PROTOCOL_VERSION`] for frames we build.
    pub version: u16,
    /// Raw kind tag as carried on the wire.
    pub kind_tag: u8,
    /// Monotonic sequence number, scoped to sender and direction.
    pub seq: SequenceNumber,
    /// Opaque payload bytes. Empty for ACK/NAK.
    pub payload: Vec<u8>,
    /// CRC-16/CCITT-FALSE over the serialized header and payload.
    pub crc16: u16,
}

impl Frame {
    /// Creates a data frame of the given kind with a freshly computed CRC.
    pub fn data(kind: FrameKind, seq: SequenceNumber, payload: Vec<u8>) -> Self {
        let mut frame = Frame {
            version: PROTOCOL_VERSION,
            kind_tag: kind.to_u8(),
            seq,
            payload,
            crc16: 0,
        };
        frame.compute_crc();
        frame
    }

    /// Creates an ACK frame for the given sequence number (empty payload).
    pub fn ack(seq: SequenceNumber) -> Self {
        Self::data(FrameKind::Ack, seq, Vec::new())
    }

    /// Creates a NAK frame for the given sequence number (empty payload).
    pub fn nak(seq: SequenceNumber) -> Self {
        Self::data(FrameKind::Nak, seq, Vec::new())
    }

    /// Resolves the raw tag to a known frame kind, if it is one.
    pub fn kind(&self) -> Option<FrameKind> {
        FrameKind::try_from(self.kind_tag).ok()
    }

    /// Total length of the serialized frame in bytes.
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Computes the CRC over header and payload and stores it in `crc16`.
    pub fn compute_crc(&mut self) {
        self.crc16 = checksum::crc16_ccitt_false(&FrameEncoder::crc_region(self));
    }

    /// Verifies the stored CRC against a recomputation over the
    /// re-serialized header and payload.
    ///
    /// A frame mutated after decoding fails verification until
    /// [`Frame::compute_crc`] is called again.
    pub fn verify_crc(&self) -> bool {
        checksum::crc16_ccitt_false(&FrameEncoder::crc_region(self)) == self.crc16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_roundtrip() {
        for kind in [FrameKind::Telemetry, FrameKind::Command, FrameKind::Ack, FrameKind::Nak] {
            assert_eq!(FrameKind::try_from(kind.to_u8()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_tag_rejected() {
        assert!(matches!(FrameKind::try_from(0), Err(PayloadError::UnknownKind(0))));
        assert!(matches!(FrameKind::try_from(9), Err(PayloadError::UnknownKind(9))));
    }

    #[test]
    fn test_data_frame_has_valid_crc() {
        let frame = Frame::data(FrameKind::Telemetry, 7, b"sample".to_vec());
        assert_eq!(frame.version, PROTOCOL_VERSION);
        assert_eq!(frame.kind(), Some(FrameKind::Telemetry));
        assert!(frame.verify_crc());
    }

    #[test]
    fn test_ack_nak_are_empty() {
        let ack = Frame::ack(3);
        assert_eq!(ack.kind(), Some(FrameKind::Ack));
        assert!(ack.payload.is_empty());
        assert!(ack.verify_crc());

        let nak = Frame::nak(3);
        assert_eq!(nak.kind(), Some(FrameKind::Nak));
        assert!(nak.payload.is_empty());
        assert!(nak.verify_crc());
    }

    #[test]
    fn test_mutation_invalidates_crc() {
        let mut frame = Frame::data(FrameKind::Command, 9, b"REBOOT".to_vec());
        assert!(frame.verify_crc());

        frame.payload[0] = b'X';
        assert!(!frame.verify_crc());

        frame.compute_crc();
        assert!(frame.verify_crc());

        frame.seq += 1;
        assert!(!frame.verify_crc());
    }
}
