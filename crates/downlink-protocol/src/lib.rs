#![warn(missing_docs)]

//! downlink-protocol: frame types, wire codec, and payload codecs.

/// Command payload type and its text codec.
pub mod command;
/// Frame structure and kind tags.
pub mod frame;
/// Frame serialization and deserialization.
pub mod frame_codec;
/// Telemetry payload type and its text codec.
pub mod telemetry;

pub use command::Command;
pub use frame::{Frame, FrameKind};
pub use frame_codec::{FrameDecoder, FrameEncoder};
pub use telemetry::Telemetry;
