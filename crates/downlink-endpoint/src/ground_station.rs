//! Ground-station endpoint.
//!
//! The ground-station worker receives telemetry from the satellite,
//! deduplicates and records it, and transmits whatever command its
//! scheduler produces, one at a time with stop-and-wait retries.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, error, trace, warn};

use downlink_channel::{Direction, Link};
use downlink_core::config::GroundConfig;
use downlink_protocol::{Command, Frame, FrameKind, Telemetry};

use crate::{
    arq::{ArqLink, ReceiveSequence, SeqClass},
    metrics::{GroundMetrics, GroundStats},
    worker,
};

/// Consumer of successfully received telemetry.
///
/// Invoked once per fresh, parseable sample; duplicates never reach it.
pub trait TelemetrySink: Send {
    /// Records one telemetry sample.
    fn record(&mut self, telemetry: &Telemetry);
}

/// Decides what the ground station transmits.
///
/// Polled once per worker tick; returning a command triggers one
/// stop-and-wait transmission before the next poll.
pub trait CommandScheduler: Send {
    /// The next command to transmit, if one is due.
    fn next_command(&mut self) -> Option<Command>;
}

/// Ground-station endpoint handle.
///
/// Same lifecycle as the satellite: `start`/`stop` are idempotent and the
/// worker state survives a stop/start cycle.
pub struct GroundStation {
    running: Arc<AtomicBool>,
    worker: Option<GroundWorker>,
    handle: Option<JoinHandle<GroundWorker>>,
    metrics: Arc<GroundMetrics>,
}

impl GroundStation {
    /// Creates a ground-station endpoint over the given link.
    pub fn new(
        link: Arc<Link>,
        config: GroundConfig,
        sink: Box<dyn TelemetrySink>,
        scheduler: Box<dyn CommandScheduler>,
    ) -> Self {
        let metrics = Arc::new(GroundMetrics::default());
        let worker = GroundWorker {
            arq: ArqLink::new(link, Direction::GsToSat),
            config,
            sink,
            scheduler,
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
                .name("ground-station".into())
                .spawn(move || {
                    worker.run(&running);
                    worker
                })
                .expect("failed to spawn ground-station worker"),
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
                Err(_) => error!("ground-station worker panicked"),
            }
        }
    }

    /// Whether the worker thread is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the ground-station counters.
    pub fn metrics(&self) -> GroundStats {
        self.metrics.snapshot()
    }
}

impl Drop for GroundStation {
    fn drop(&mut self) {
        self.stop();
    }
}

struct GroundWorker {
    arq: ArqLink,
    config: GroundConfig,
    sink: Box<dyn TelemetrySink>,
    scheduler: Box<dyn CommandScheduler>,
    rx: ReceiveSequence,
    tx_seq: u32,
    metrics: Arc<GroundMetrics>,
}

impl GroundWorker {
    fn run(&mut self, running: &AtomicBool) {
        worker::run_loop(running, || {
            self.drain_inbound();
            self.dispatch_command(running);
        });
    }

    fn dispatch_command(&mut self, running: &AtomicBool) {
        if let Some(command) = self.scheduler.next_command() {
            self.send_command(&command, running);
        }
    }

    fn send_command(&mut self, command: &Command, running: &AtomicBool) {
        let seq = self.tx_seq;
        self.tx_seq += 1;

        debug!(seq, command = command.name(), "TX command");

        let frame = Frame::data(FrameKind::Command, seq, command.encode());
        let outcome = self.arq.send_with_retry(&frame, &self.config.arq, running);
        self.metrics.add_retries(outcome.retries as u64);
        self.metrics.add_naks_received(outcome.naks_received as u64);

        if outcome.delivered {
            self.metrics.record_command_sent();
        } else if running.load(Ordering::Relaxed) {
            warn!(seq, retries = outcome.retries, "giving up on command frame");
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
            Some(FrameKind::Telemetry) => self.process_telemetry(frame),
            Some(FrameKind::Ack) | Some(FrameKind::Nak) => {
                trace!(seq = frame.seq, "discarding stray reply frame");
            }
            Some(FrameKind::Command) => {
                trace!(seq = frame.seq, "discarding command frame at the ground station");
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

    fn process_telemetry(&mut self, frame: Frame) {
        if self.rx.classify(frame.seq) == SeqClass::Duplicate {
            debug!(seq = frame.seq, "duplicate telemetry, re-acknowledging");
            self.arq.send_ack(frame.seq);
            return;
        }

        match Telemetry::decode(&frame.payload) {
            Ok(telemetry) => {
                self.metrics.record_telemetry_received();
                debug!(
                    seq = frame.seq,
                    temp = telemetry.temperature_c,
                    batt = telemetry.battery_pct,
                    alt = telemetry.orbit_altitude_km,
                    "RX telemetry"
                );
                self.sink.record(&telemetry);
                self.arq.send_ack(frame.seq);
            }
            Err(err) => {
                warn!(seq = frame.seq, %err, "failed to parse telemetry, sending NAK");
                self.arq.send_nak(frame.seq);
                self.metrics.record_nak_sent();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use downlink_core::config::LinkConfig;

    use super::*;

    #[derive(Clone, Default)]
    struct VecSink {
        samples: Arc<Mutex<Vec<Telemetry>>>,
    }

    impl TelemetrySink for VecSink {
        fn record(&mut self, telemetry: &Telemetry) {
            self.samples.lock().unwrap().push(telemetry.clone());
        }
    }

    struct NoCommands;

    impl CommandScheduler for NoCommands {
        fn next_command(&mut self) -> Option<Command> {
            None
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

    fn test_worker(link: &Arc<Link>, sink: VecSink) -> GroundWorker {
        GroundWorker {
            arq: ArqLink::new(link.clone(), Direction::GsToSat),
            config: GroundConfig::default(),
            sink: Box::new(sink),
            scheduler: Box::new(NoCommands),
            rx: ReceiveSequence::new(),
            tx_seq: 0,
            metrics: Arc::new(GroundMetrics::default()),
        }
    }

    fn telemetry_frame(seq: u32) -> Frame {
        let sample = Telemetry { ts_ns: 7, temperature_c: 42.0, ..Telemetry::default() };
        Frame::data(FrameKind::Telemetry, seq, sample.encode())
    }

    #[test]
    fn test_telemetry_recorded_and_acked() {
        let link = instant_link();
        let sink = VecSink::default();
        let mut worker = test_worker(&link, sink.clone());

        link.send_sat_to_gs(telemetry_frame(0));
        worker.drain_inbound();

        assert_eq!(sink.samples.lock().unwrap().len(), 1);
        assert_eq!(worker.metrics.snapshot().telemetry_received, 1);

        let reply = link.recv_gs_to_sat(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Ack));
        assert_eq!(reply.seq, 0);
    }

    #[test]
    fn test_duplicate_telemetry_recorded_once_but_acked_twice() {
        let link = instant_link();
        let sink = VecSink::default();
        let mut worker = test_worker(&link, sink.clone());

        link.send_sat_to_gs(telemetry_frame(5));
        link.send_sat_to_gs(telemetry_frame(5));
        worker.drain_inbound();

        assert_eq!(sink.samples.lock().unwrap().len(), 1);
        for _ in 0..2 {
            let reply = link.recv_gs_to_sat(Duration::ZERO).unwrap();
            assert_eq!(reply.kind(), Some(FrameKind::Ack));
            assert_eq!(reply.seq, 5);
        }
    }

    #[test]
    fn test_future_seq_is_delivered() {
        let link = instant_link();
        let sink = VecSink::default();
        let mut worker = test_worker(&link, sink.clone());

        link.send_sat_to_gs(telemetry_frame(0));
        // Seq 1 was lost; seq 2 arrives and must still be delivered.
        link.send_sat_to_gs(telemetry_frame(2));
        worker.drain_inbound();

        assert_eq!(sink.samples.lock().unwrap().len(), 2);
        assert_eq!(worker.rx.next_expected(), 3);
    }

    #[test]
    fn test_corrupted_telemetry_naked_and_not_recorded() {
        let link = instant_link();
        let sink = VecSink::default();
        let mut worker = test_worker(&link, sink.clone());

        let mut frame = telemetry_frame(1);
        frame.payload[0] ^= 0xFF;
        link.send_sat_to_gs(frame);
        worker.drain_inbound();

        assert!(sink.samples.lock().unwrap().is_empty());
        let reply = link.recv_gs_to_sat(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Nak));
        assert_eq!(reply.seq, 1);
        assert_eq!(worker.metrics.snapshot().naks_sent, 1);
        // A NAKed frame must not advance the expected sequence.
        assert_eq!(worker.rx.next_expected(), 0);
    }

    #[test]
    fn test_unparseable_telemetry_naked() {
        let link = instant_link();
        let sink = VecSink::default();
        let mut worker = test_worker(&link, sink.clone());

        link.send_sat_to_gs(Frame::data(
            FrameKind::Telemetry,
            0,
            b"ts=soon|temp=warm".to_vec(),
        ));
        worker.drain_inbound();

        assert!(sink.samples.lock().unwrap().is_empty());
        let reply = link.recv_gs_to_sat(Duration::ZERO).unwrap();
        assert_eq!(reply.kind(), Some(FrameKind::Nak));
    }

    #[test]
    fn test_scheduled_command_sent_when_acked() {
        struct OneReboot(bool);

        impl CommandScheduler for OneReboot {
            fn next_command(&mut self) -> Option<Command> {
                (!std::mem::replace(&mut self.0, true)).then_some(Command::Reboot)
            }
        }

        let link = instant_link();
        let mut worker = test_worker(&link, VecSink::default());
        worker.scheduler = Box::new(OneReboot(false));
        let running = AtomicBool::new(true);

        // Pre-load the ACK the satellite would send for seq 0.
        link.send_sat_to_gs(Frame::ack(0));
        worker.dispatch_command(&running);

        assert_eq!(worker.metrics.snapshot().commands_sent, 1);
        let frame = link.recv_gs_to_sat(Duration::ZERO).unwrap();
        assert_eq!(frame.kind(), Some(FrameKind::Command));
        assert_eq!(Command::decode(&frame.payload).unwrap(), Command::Reboot);

        // The scheduler is drained; nothing further goes out.
        worker.dispatch_command(&running);
        assert_eq!(worker.tx_seq, 1);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let link = instant_link();
        let mut station = GroundStation::new(
            link,
            GroundConfig::default(),
            Box::new(VecSink::default()),
            Box::new(NoCommands),
        );

        station.start();
        station.start();
        assert!(station.is_running());
        station.stop();
        station.stop();
        assert!(!station.is_running());
    }
}
