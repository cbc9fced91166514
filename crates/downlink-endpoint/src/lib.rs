#![warn(missing_docs)]

//! downlink-endpoint: satellite and ground-station ARQ workers.
//!
//! Each endpoint runs on its own OS thread and speaks stop-and-wait ARQ
//! over the impairment link: one unacknowledged data frame in flight,
//! retries on ACK timeout, duplicate suppression by sequence number, and
//! NAK replies for frames that fail CRC or payload parsing.
//!
//! Application concerns stay behind collaborator traits: the satellite's
//! physical model implements [`Spacecraft`], the ground station records
//! telemetry through a [`TelemetrySink`] and asks a [`CommandScheduler`]
//! what to transmit.

/// Stop-and-wait sender and receive-side sequence tracking.
pub mod arq;
/// Ground-station endpoint and its collaborator traits.
pub mod ground_station;
/// Atomic metric counters and their snapshots.
pub mod metrics;
/// Satellite endpoint and its collaborator trait.
pub mod satellite;
/// Worker-thread loop shared by both endpoints.
pub mod worker;

pub use arq::{AckOutcome, ArqLink, ReceiveSequence, SendOutcome, SeqClass};
pub use ground_station::{CommandScheduler, GroundStation, TelemetrySink};
pub use metrics::{GroundMetrics, GroundStats, SatelliteMetrics, SatelliteStats};
pub use satellite::{Satellite, Spacecraft};
