#![warn(missing_docs)]

//! Downlink: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types to build satellite-link simulations:
//!
//! - The impairment link (`Link`, `LinkConfig`, `Direction`)
//! - Frames and payloads (`Frame`, `FrameKind`, `Telemetry`, `Command`)
//! - Endpoints and their collaborators (`Satellite`, `GroundStation`,
//!   `Spacecraft`, `TelemetrySink`, `CommandScheduler`)
//!
//! Example
//! ```ignore
//! use std::{sync::Arc, time::Duration};
//! use downlink::prelude::*;
//!
//! let link = Arc::new(Link::new(LinkConfig::default()));
//!
//! let mut satellite = Satellite::new(
//!     link.clone(),
//!     SatelliteConfig::default(),
//!     Box::new(my_spacecraft),
//! );
//! let mut station = GroundStation::new(
//!     link,
//!     GroundConfig::default(),
//!     Box::new(my_sink),
//!     Box::new(my_scheduler),
//! );
//!
//! satellite.start();
//! station.start();
//! std::thread::sleep(Duration::from_secs(20));
//! satellite.stop();
//! station.stop();
//! ```

// Core config and errors
pub use downlink_core::config::{ArqConfig, GroundConfig, LinkConfig, SatelliteConfig};
pub use downlink_core::error::{DecodeError, ErrorKind, PayloadError, Result};
// Channel: the impairment link
pub use downlink_channel::{Direction, Link, LinkMetrics};
// Protocol: frames and payloads
pub use downlink_protocol::{Command, Frame, FrameDecoder, FrameEncoder, FrameKind, Telemetry};
// Endpoints and collaborator traits
pub use downlink_endpoint::{
    CommandScheduler, GroundStation, GroundStats, Satellite, SatelliteStats, Spacecraft,
    TelemetrySink,
};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        Command, CommandScheduler, Direction, Frame, FrameKind, GroundConfig,
        GroundStation, Link, LinkConfig, Satellite, SatelliteConfig, Spacecraft,
        Telemetry, TelemetrySink,
    };
}
