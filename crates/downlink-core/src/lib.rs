#![warn(missing_docs)]

//! downlink-core: foundational types and utilities.
//!
//! This crate provides the minimal set of core utilities shared across all
//! layers:
//! - Configuration types
//! - Error handling
//! - Protocol constants
//!
//! Protocol-specific logic lives in specialized crates:
//! - `downlink-protocol`: frame codec, checksum, payload codecs
//! - `downlink-channel`: impairment link and delivery queues
//! - `downlink-endpoint`: satellite and ground-station ARQ workers

/// Protocol constants shared across layers.
pub mod constants {
    /// Byte length of the frame header (version + kind + seq + payload size).
    pub const HEADER_SIZE: usize = 11;
    /// Byte length of the CRC footer.
    pub const CRC_SIZE: usize = 2;
    /// Minimum length of a decodable frame (header + footer, empty payload).
    pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CRC_SIZE;
    /// This is the current protocol version.
    ///
    /// Incremental monolithic protocol number.
    pub const PROTOCOL_VERSION: u16 = 1;
}

/// Configuration options for the link and the endpoints.
pub mod config;
/// Error types and results.
pub mod error;

pub use config::{ArqConfig, GroundConfig, LinkConfig, SatelliteConfig};
pub use error::{DecodeError, ErrorKind, PayloadError, Result};
