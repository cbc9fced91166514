//! Simulated bidirectional radio link between satellite and ground station.
//!
//! The link injects realistic impairments: every send draws a loss decision
//! and a latency sample from a shared, seeded RNG, then absorbs the latency
//! on the calling thread before enqueueing the frame for the far side. The
//! sender's own thread carrying the delay gives natural backpressure and
//! means concurrent senders interleave their deliveries as their sleeps
//! expire, so delivery order is only weakly FIFO.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    thread,
    time::Duration,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{debug, trace};

use downlink_core::config::LinkConfig;
use downlink_protocol::Frame;

use crate::queue::DeliveryQueue;

/// One direction of the bidirectional link.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Satellite → ground station.
    SatToGs,
    /// Ground station → satellite.
    GsToSat,
}

impl Direction {
    /// The opposite direction, used for ACK/NAK replies.
    pub fn reverse(self) -> Self {
        match self {
            Direction::SatToGs => Direction::GsToSat,
            Direction::GsToSat => Direction::SatToGs,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::SatToGs => write!(f, "sat->gs"),
            Direction::GsToSat => write!(f, "gs->sat"),
        }
    }
}

/// Counter snapshot for the link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkMetrics {
    /// Frames handed to the link, including dropped ones.
    pub packets_sent: u64,
    /// Frames the loss model discarded.
    pub packets_dropped: u64,
    /// Frames that reached the far queue.
    pub packets_delivered: u64,
}

impl LinkMetrics {
    /// Fraction of sent frames that were dropped (0.0 to 1.0).
    pub fn drop_rate(&self) -> f64 {
        if self.packets_sent == 0 {
            return 0.0;
        }
        self.packets_dropped as f64 / self.packets_sent as f64
    }
}

/// Simulated bidirectional radio link.
///
/// Given the same seed and the same serialized sequence of sends, the link
/// reproduces the same loss and delay decisions; every RNG draw happens
/// under one mutex shared by both directions.
pub struct Link {
    config: LinkConfig,
    rng: Mutex<StdRng>,
    jitter: Normal<f64>,
    sat_to_gs: DeliveryQueue<Frame>,
    gs_to_sat: DeliveryQueue<Frame>,
    packets_sent: AtomicU64,
    packets_dropped: AtomicU64,
    packets_delivered: AtomicU64,
}

impl Link {
    /// Creates a link with the given impairment configuration.
    pub fn new(config: LinkConfig) -> Self {
        let jitter = Normal::new(config.latency_ms as f64, config.jitter_ms as f64)
            .expect("jitter standard deviation is non-negative");
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(config.seed)),
            jitter,
            config,
            sat_to_gs: DeliveryQueue::new(),
            gs_to_sat: DeliveryQueue::new(),
            packets_sent: AtomicU64::new(0),
            packets_dropped: AtomicU64::new(0),
            packets_delivered: AtomicU64::new(0),
        }
    }

    /// Sends a frame in the given direction, absorbing the sampled latency
    /// on the calling thread. The frame may be dropped silently.
    pub fn send(&self, direction: Direction, frame: Frame) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);

        // Both samples are drawn under the lock so a fixed submission order
        // maps to a fixed decision sequence.
        let (loss_draw, delay_ms) = {
            let mut rng = self.rng.lock().expect("link RNG lock poisoned");
            let loss_draw: f64 = rng.gen();
            let delay_ms = self.jitter.sample(&mut *rng).max(0.0);
            (loss_draw, delay_ms)
        };

        if loss_draw < self.config.loss_prob {
            self.packets_dropped.fetch_add(1, Ordering::Relaxed);
            debug!(%direction, seq = frame.seq, "frame lost");
            return;
        }

        if delay_ms > 0.0 {
            thread::sleep(Duration::from_secs_f64(delay_ms / 1000.0));
        }

        trace!(%direction, seq = frame.seq, delay_ms, "frame delivered");
        self.queue(direction).push(frame);
        self.packets_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Receives the oldest frame queued in the given direction, waiting up
    /// to `timeout`. A zero timeout polls without blocking.
    pub fn recv(&self, direction: Direction, timeout: Duration) -> Option<Frame> {
        self.queue(direction).recv_timeout(timeout)
    }

    /// Sends a frame satellite → ground station.
    pub fn send_sat_to_gs(&self, frame: Frame) {
        self.send(Direction::SatToGs, frame)
    }

    /// Receives a frame on the satellite → ground station direction.
    pub fn recv_sat_to_gs(&self, timeout: Duration) -> Option<Frame> {
        self.recv(Direction::SatToGs, timeout)
    }

    /// Sends a frame ground station → satellite.
    pub fn send_gs_to_sat(&self, frame: Frame) {
        self.send(Direction::GsToSat, frame)
    }

    /// Receives a frame on the ground station → satellite direction.
    pub fn recv_gs_to_sat(&self, timeout: Duration) -> Option<Frame> {
        self.recv(Direction::GsToSat, timeout)
    }

    /// Snapshot of the link counters.
    pub fn metrics(&self) -> LinkMetrics {
        LinkMetrics {
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            packets_dropped: self.packets_dropped.load(Ordering::Relaxed),
            packets_delivered: self.packets_delivered.load(Ordering::Relaxed),
        }
    }

    fn queue(&self, direction: Direction) -> &DeliveryQueue<Frame> {
        match direction {
            Direction::SatToGs => &self.sat_to_gs,
            Direction::GsToSat => &self.gs_to_sat,
        }
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("config", &self.config)
            .field("metrics", &self.metrics())
            .finish()
    }
}
