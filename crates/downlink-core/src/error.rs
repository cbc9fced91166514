//! Error types for the downlink protocol stack.

use thiserror::Error;

/// Convenience alias for results carrying [`ErrorKind`].
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Top-level error for all downlink operations.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A frame could not be decoded from wire bytes.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An application payload could not be parsed.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural errors raised while decoding a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Input shorter than the fixed header plus CRC footer.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// The declared payload size does not fit in the remaining input.
    #[error("payload size {payload_size} exceeds remaining input of {remaining} bytes")]
    PayloadOverrun {
        /// Payload size declared in the header.
        payload_size: usize,
        /// Bytes available after the header, excluding the CRC footer.
        remaining: usize,
    },

    /// Input continues past the CRC footer.
    #[error("unexpected trailing bytes: frame is {expected} bytes but input is {actual}")]
    TrailingBytes {
        /// Expected total frame length.
        expected: usize,
        /// Actual input length.
        actual: usize,
    },
}

/// Errors raised while parsing an application payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    /// A command name was not recognized.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A numeric field failed to parse.
    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// The frame kind tag is not a known data kind.
    #[error("unknown frame kind tag: 0x{0:02X}")]
    UnknownKind(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::TooShort { expected: 13, actual: 4 };
        assert_eq!(
            err.to_string(),
            "frame too short: expected at least 13 bytes, got 4"
        );
    }

    #[test]
    fn test_error_kind_from_decode() {
        let err: ErrorKind = DecodeError::TrailingBytes { expected: 30, actual: 32 }.into();
        assert!(matches!(err, ErrorKind::Decode(_)));
    }

    #[test]
    fn test_error_kind_from_payload() {
        let err: ErrorKind = PayloadError::MissingField("temp").into();
        assert!(matches!(err, ErrorKind::Payload(_)));
    }
}
