//! Satellite endpoint.
//!
//! The satellite worker runs on its own thread: it advances the physical
//! model, emits telemetry at the configured rate with stop-and-wait
//! retries, and executes commands arriving from the ground station.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, error, trace, warn};

use downlink_channel::{Direction, Link};
use downlink_core::config::SatelliteConfig;
use downlink_protocol::{Command, Frame, FrameKind, Telemetry};

use crate::{
    arq::{ArqLink, ReceiveSequence, SeqClass},
    metrics::{SatelliteMetrics, SatelliteStats},
    worker,
};

/// The satellite's application layer: physical state and command effects.
///
/// The endpoint drives this once per tick and around every frame exchange;
/// the implementation owns temperature, battery, orbit, and attitude
/// dynamics, which are outside the protocol core.
pub trait Spacecraft: Send {
    /// Advances the physical state by `dt`.
    fn update(&mut self, dt: Duration);

    /// Samples the current state as a telemetry payload.
    fn sample_telemetry(&mut self) -> Telemetry;

    /// Applies a command to the physical state.
    fn execute(&mut self, command: &Command);
}

/// Satellite endpoint handle.
///
/// `start` spawns the worker thread; `stop` signals it and joins. Both are
/// idempotent, and the worker survives a stop/start cycle with its state
/// (sequence numbers, physical model) intact.
pub struct Satellite {
    running: Arc<AtomicBool>,
    worker: Option<SatelliteWorker>,
    handle: Option<JoinHandle<SatelliteWorker>>,
    metrics: Arc<SatelliteMetrics>,
}

impl Satellite {
    /// Creates a satellite endpoint over the given link.
    pub fn new(
        link: Arc<Link>,
        config: SatelliteConfig,
        spacecraft: Box<dyn Spacecraft>,
    ) -> Self {
        let metrics = Arc::new(SatelliteMetrics::default());
        let worker = SatelliteWorker {
            arq: ArqLink::new(link, Direction::SatToGs),
            config,
            spacecraft,
            rx: ReceiveSequence::new(),
            tx_seq: 0,
            metrics: metrics.clone(),
        };
        Self {
            running: Arc::new(AtomicBool::new(false)),
            worker: Some(worker),
            handle: None,
            metrics,
        }
    }

    /// Spawns the worker thread. A second start while running is a no-op.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(mut worker) = self.worker.take() else {
            self.running.store(false, Ordering::SeqCst);
            return;
        };
        let running = self.running.clone();
        self.handle = Some(
            thread::Builder::new()
                .name("satellite".into())
                .spawn(move || {
                    worker.run(&running);
                    worker
                })
                .expect("failed to spawn satellite worker"),
        );
    }

    /// Signals the worker to exit and joins it. Idempotent.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(worker) => self.worker = Some(worker),
                Err(_) => error!("satellite worker panicked"),
            }
        }
    }

    /// Whether the worker thread is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the satellite counters.
    pub fn metrics(&self) -> SatelliteStats {
        self.metrics.snapshot()
    }
}

impl Drop for Satellite {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SatelliteWorker {
    arq: ArqLink,
    config: SatelliteConfig,
    spacecraft: Box<dyn Spacecraft>,
    rx: ReceiveSequence,
    tx_seq: u32,
    metrics: Arc<SatelliteMetrics>,
}

impl SatelliteWorker {
    fn run(&mut self, running: &AtomicBool) {
        let period = self.config.telemetry_period();
        let mut last_update = Instant::now();
        let mut last_telemetry = Instant::now();

        worker::run_loop(running, || {
            let now = Instant::now();
            self.spacecraft.update(now - last_update);
            last_update = now;

            if now - last_telemetry >= period {
                self.send_telemetry(running);
                last_telemetry = now;
            }

            self.drain_inbound();
        });
    }

    fn send_telemetry(&mut self, running: &AtomicBool) {
        let sample = self.spacecraft.sample_telemetry();
        let seq = self.tx_seq;
        self.tx_seq += 1;

        debug!(
            seq,
            temp = sample.temperature_c,
            batt = sample.battery_pct,
            alt = sample.orbit_altitude_km,
            "TX telemetry"
        );

        let frame = Frame::data(FrameKind::Telemetry, seq, sample.encode());
        let outcome = self.arq.send_with_retry(&frame, &self.config.arq, running);
        self.metrics.add_retries(outcome.retries as u64);
        self.metrics.add_naks_received(outcome.naks_received as u64);

        if outcome.delivered {
            self.metrics.record_telemetry_sent();
        } else if running.load(Ordering::Relaxed) {
            warn!(seq, retries = outcome.retries, "giving up on telemetry frame");
        }
    }

    fn drain_inbound(&mut self) {
        while let Some(frame) = self.arq.recv(Duration::ZERO) {
            self.process_frame(frame);
        }
    }

    fn process_frame(&mut self, frame: Frame) {
        if !frame.verify_crc() {
            debug!(seq = frame.seq, "inbound frame failed CRC, sending NAK");
            self.arq.send_nak(frame.seq);
            self.metrics.record_nak_sent();
            return;
        }

        match frame.kind() {
            Some(FrameKind::Command) => self.process_command(frame),
            Some(FrameKind::Ack) | Some(FrameKind::Nak) => {
                // A reply outside a send window carries no information.
                trace!(seq = frame.seq, "discarding stray reply frame");
            }
            Some(FrameKind::Telemetry) => {
                trace!(seq = frame.seq, "discarding telemetry frame at the satellite");
            }
            None => {
                debug!(
                    seq = frame.seq,
                    tag = frame.kind_tag,
                    "unknown frame kind, sending NAK"
                );
                self.arq.send_nak(frame.seq);
                self.metrics.record_nak_sent();
            }
        }
    }

    fn process_command(&mut self, frame: Frame) {
        if self.rx.classify(frame.seq) == SeqClass::Duplicate {
            debug!(seq = frame.seq, "duplicate command, re-acknowledging");
            self.arq.send_ack(frame.seq);
            return;
        }

        match Command::decode(&frame.payload) {
            Ok(command) => {
                self.metrics.record_command_received();
                debug!(seq = frame.seq, command = command.name(), "executing command");
                self.spacecraft.execute(&command);
                self.arq.send_ack(frame.seq);
            }
            Err(err) => {
                warn!(seq = frame.seq, %err, "failed to parse command, sending NAK");
                self.arq.send_nak(frame.seq);
                self.metrics.record_nak_sent();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use downlink_core::config::LinkConfig;

    use super::*;

    #[derive(Default)]
    struct TestCraft {
        executed: Vec<Command>,
        updates: u32,
    }

    impl Spacecraft for TestCraft {
        fn update(&mut self, _dt: Duration) {
            self.updates += 1;
        }

        fn sample_telemetry(&mut self) -> Telemetry {
            Telemetry { ts_ns: 1, temperature_c: 50.0, ..Telemetry::default() }
        }

        fn execute(&mut self, command: &Command) {
            self.executed.push(command.clone());
        }
    }

    fn instant_link() -> Arc<Link> {
        Arc::new(Link::new(LinkConfig {
            latency_ms: 0,
            jitter_ms: 0,
            loss_prob: 0.0,
            seed: 1,
        }))
    }

    fn test_worker(link: &Arc<Link>) -> SatelliteWorker {
        SatelliteWorker {
            arq: ArqLink::new(link.clone(), Direction::SatToGs),
            config: SatelliteConfig::default(),
            spacecraft: Box::<TestCraft>::default(),
            rx: ReceiveSequence::new(),
            tx_seq: 0,
            metrics: Arc::new(SatelliteMetrics::default()),
        }
    }

    fn executed(worker: &SatelliteWorker) -> usize {
        // The worker owns the spacecraft; peek through the trait object.
        let metrics = worker.metrics.snapshot();
        metrics.commands_received as usize
    }

    #[test]
    fn test_command_executed_and_acked() {
        let link = instant_link();
        let mut worker = test_worker(&link);

        link.send_gs_to_sat(Frame::data(
            FrameKind::Command,
            0,
            Command::Reboot.encode(),
        ));
        worker.drain_inbound();

        assert_eq!(executed(&worker), 1);
        let reply = link.recv_sat_to_gs(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Ack));
        assert_eq!(reply.seq, 0);
    }

    #[test]
    fn test_duplicate_command_executed_once_but_acked_twice() {
        let link = instant_link();
        let mut worker = test_worker(&link);
        let frame = Frame::data(FrameKind::Command, 5, Command::EnterSafeMode.encode());

        link.send_gs_to_sat(frame.clone());
        link.send_gs_to_sat(frame);
        worker.drain_inbound();

        assert_eq!(executed(&worker), 1);
        for _ in 0..2 {
            let reply = link.recv_sat_to_gs(Duration::ZERO).unwrap();
            assert_eq!(reply.kind(), Some(FrameKind::Ack));
            assert_eq!(reply.seq, 5);
        }
        assert!(link.recv_sat_to_gs(Duration::ZERO).is_none());
    }

    #[test]
    fn test_corrupted_command_naked_and_not_executed() {
        let link = instant_link();
        let mut worker = test_worker(&link);

        let mut frame = Frame::data(FrameKind::Command, 3, Command::Reboot.encode());
        frame.payload[0] ^= 0xFF; // corrupt without recomputing the CRC
        link.send_gs_to_sat(frame);
        worker.drain_inbound();

        assert_eq!(executed(&worker), 0);
        let reply = link.recv_sat_to_gs(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Nak));
        assert_eq!(reply.seq, 3);
        assert_eq!(worker.metrics.snapshot().naks_sent, 1);
    }

    #[test]
    fn test_unparseable_command_naked() {
        let link = instant_link();
        let mut worker = test_worker(&link);

        link.send_gs_to_sat(Frame::data(FrameKind::Command, 0, b"SELF_DESTRUCT".to_vec()));
        worker.drain_inbound();

        assert_eq!(executed(&worker), 0);
        let reply = link.recv_sat_to_gs(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Nak));
        // Parse failures still consume the sequence number.
        assert_eq!(worker.rx.next_expected(), 1);
    }

    #[test]
    fn test_unknown_kind_naked() {
        let link = instant_link();
        let mut worker = test_worker(&link);

        let mut frame = Frame::data(FrameKind::Command, 2, Vec::new());
        frame.kind_tag = 0x6E;
        frame.compute_crc();
        link.send_gs_to_sat(frame);
        worker.drain_inbound();

        let reply = link.recv_sat_to_gs(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Nak));
        assert_eq!(reply.seq, 2);
    }

    #[test]
    fn test_stray_ack_discarded_silently() {
        let link = instant_link();
        let mut worker = test_worker(&link);

        link.send_gs_to_sat(Frame::ack(9));
        worker.drain_inbound();

        assert!(link.recv_sat_to_gs(Duration::ZERO).is_none());
        assert_eq!(worker.metrics.snapshot().naks_sent, 0);
    }

    #[test]
    fn test_send_telemetry_delivers_when_acked() {
        let link = instant_link();
        let mut worker = test_worker(&link);
        let running = AtomicBool::new(true);

        // Pre-load the ACK the ground station would send for seq 0.
        link.send_gs_to_sat(Frame::ack(0));
        worker.send_telemetry(&running);

        let stats = worker.metrics.snapshot();
        assert_eq!(stats.telemetry_sent, 1);
        assert_eq!(stats.retries, 0);
        assert_eq!(worker.tx_seq, 1);

        let frame = link.recv_sat_to_gs(Duration::ZERO).unwrap();
        assert_eq!(frame.kind(), Some(FrameKind::Telemetry));
        assert!(Telemetry::decode(&frame.payload).is_ok());
    }

    #[test]
    fn test_start_stop_idempotent() {
        let link = instant_link();
        let mut satellite = Satellite::new(
            link,
            SatelliteConfig::default(),
            Box::<TestCraft>::default(),
        );

        assert!(!satellite.is_running());
        satellite.start();
        satellite.start();
        assert!(satellite.is_running());

        satellite.stop();
        satellite.stop();
        assert!(!satellite.is_running());

        // The worker state survives and can be restarted.
        satellite.start();
        assert!(satellite.is_running());
        satellite.stop();
    }
}
