//! Endpoint metric counters.
//!
//! Counters are lock-free atomics so any thread can read them while the
//! worker mutates; `snapshot` yields a plain copy for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the satellite worker.
#[derive(Debug, Default)]
pub struct SatelliteMetrics {
    telemetry_sent: AtomicU64,
    commands_received: AtomicU64,
    retries: AtomicU64,
    naks_sent: AtomicU64,
    naks_received: AtomicU64,
}

impl SatelliteMetrics {
    pub(crate) fn record_telemetry_sent(&self) {
        self.telemetry_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_command_received(&self) {
        self.commands_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_retries(&self, count: u64) {
        self.retries.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_nak_sent(&self) {
        self.naks_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_naks_received(&self, count: u64) {
        self.naks_received.fetch_add(count, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> SatelliteStats {
        SatelliteStats {
            telemetry_sent: self.telemetry_sent.load(Ordering::Relaxed),
            commands_received: self.commands_received.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            naks_sent: self.naks_sent.load(Ordering::Relaxed),
            naks_received: self.naks_received.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`SatelliteMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SatelliteStats {
    /// Telemetry frames acknowledged by the ground station.
    pub telemetry_sent: u64,
    /// Commands received, parsed, and executed (duplicates excluded).
    pub commands_received: u64,
    /// Re-send attempts across all transmissions.
    pub retries: u64,
    /// NAKs emitted for corrupt or unparseable inbound frames.
    pub naks_sent: u64,
    /// NAKs received while waiting for ACKs.
    pub naks_received: u64,
}

/// Counters maintained by the ground-station worker.
#[derive(Debug, Default)]
pub struct GroundMetrics {
    telemetry_received: AtomicU64,
    commands_sent: AtomicU64,
    retries: AtomicU64,
    naks_sent: AtomicU64,
    naks_received: AtomicU64,
}

impl GroundMetrics {
    pub(crate) fn record_telemetry_received(&self) {
        self.telemetry_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_command_sent(&self) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_retries(&self, count: u64) {
        self.retries.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_nak_sent(&self) {
        self.naks_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_naks_received(&self, count: u64) {
        self.naks_received.fetch_add(count, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> GroundStats {
        GroundStats {
            telemetry_received: self.telemetry_received.load(Ordering::Relaxed),
            commands_sent: self.commands_sent.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            naks_sent: self.naks_sent.load(Ordering::Relaxed),
            naks_received: self.naks_received.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`GroundMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundStats {
    /// Telemetry frames delivered to the sink (duplicates excluded).
    pub telemetry_received: u64,
    /// Commands acknowledged by the satellite.
    pub commands_sent: u64,
    /// Re-send attempts across all transmissions.
    pub retries: u64,
    /// NAKs emitted for corrupt or unparseable inbound frames.
    pub naks_sent: u64,
    /// NAKs received while waiting for ACKs.
    pub naks_received: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satellite_metrics_accumulate() {
        let metrics = SatelliteMetrics::default();
        metrics.record_telemetry_sent();
        metrics.record_telemetry_sent();
        metrics.record_command_received();
        metrics.add_retries(3);
        metrics.record_nak_sent();
        metrics.add_naks_received(2);

        let stats = metrics.snapshot();
        assert_eq!(stats.telemetry_sent, 2);
        assert_eq!(stats.commands_received, 1);
        assert_eq!(stats.retries, 3);
        assert_eq!(stats.naks_sent, 1);
        assert_eq!(stats.naks_received, 2);
    }

    #[test]
    fn test_ground_metrics_start_at_zero() {
        let stats = GroundMetrics::default().snapshot();
        assert_eq!(stats, GroundStats::default());
    }
}
