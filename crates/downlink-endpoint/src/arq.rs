//! Stop-and-wait ARQ over one direction of the link.
//!
//! [`ArqLink`] binds a shared [`Link`] to an endpoint's outbound direction:
//! data and replies go out on that direction, ACKs and inbound data arrive
//! on the reverse one. [`ReceiveSequence`] implements the receive-side
//! duplicate suppression both endpoints share.

use std::{
    sync::{atomic::AtomicBool, atomic::Ordering, Arc},
    time::Duration,
};

use tracing::warn;

use downlink_channel::{Direction, Link};
use downlink_core::config::ArqConfig;
use downlink_protocol::{Frame, FrameKind};

/// Result of one ACK wait.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AckOutcome {
    /// An ACK with the matching sequence number arrived.
    Acked,
    /// A NAK with the matching sequence number arrived.
    Nakked,
    /// The wait timed out, or an unrelated frame was consumed and discarded.
    NoAck,
}

/// Result of a stop-and-wait transmission.
#[derive(Copy, Clone, Debug, Default)]
pub struct SendOutcome {
    /// Whether an ACK was received within the retry budget.
    pub delivered: bool,
    /// Number of re-send attempts made after the initial send.
    pub retries: u32,
    /// Number of matching NAKs consumed while waiting.
    pub naks_received: u32,
}

/// One endpoint's view of the shared link.
#[derive(Clone)]
pub struct ArqLink {
    link: Arc<Link>,
    outbound: Direction,
}

impl ArqLink {
    /// Binds the link to the endpoint whose outbound direction is given.
    pub fn new(link: Arc<Link>, outbound: Direction) -> Self {
        Self { link, outbound }
    }

    /// Sends a frame on the outbound direction. Blocks for the sampled
    /// link latency.
    pub fn send(&self, frame: Frame) {
        self.link.send(self.outbound, frame);
    }

    /// Receives the next inbound frame, waiting up to `timeout`. A zero
    /// timeout polls without blocking.
    pub fn recv(&self, timeout: Duration) -> Option<Frame> {
        self.link.recv(self.outbound.reverse(), timeout)
    }

    /// Sends an ACK for the given sequence number.
    pub fn send_ack(&self, seq: u32) {
        self.send(Frame::ack(seq));
    }

    /// Sends a NAK for the given sequence number.
    pub fn send_nak(&self, seq: u32) {
        self.send(Frame::nak(seq));
    }

    /// Waits for a response to the frame with sequence number `seq`.
    ///
    /// Pulls at most one frame off the inbound queue: a frame that is not
    /// the matching ACK or NAK is consumed and discarded, and the attempt
    /// counts as unanswered. The drain loop never sees such a frame; this
    /// shared-queue correlation is an accepted simplification of the model.
    pub fn wait_for_ack(&self, seq: u32, timeout: Duration) -> AckOutcome {
        match self.recv(timeout) {
            Some(frame) if frame.kind() == Some(FrameKind::Ack) && frame.seq == seq => {
                AckOutcome::Acked
            }
            Some(frame) if frame.kind() == Some(FrameKind::Nak) && frame.seq == seq => {
                AckOutcome::Nakked
            }
            _ => AckOutcome::NoAck,
        }
    }

    /// Transmits a data frame with stop-and-wait retries.
    ///
    /// Makes up to `max_retries + 1` attempts, waiting `ack_timeout` for a
    /// matching ACK after each. A matching NAK counts as a failed attempt.
    /// Clearing `running` aborts between attempts so shutdown is not held
    /// up by a full retry budget.
    pub fn send_with_retry(
        &self,
        frame: &Frame,
        config: &ArqConfig,
        running: &AtomicBool,
    ) -> SendOutcome {
        let mut outcome = SendOutcome::default();

        for attempt in 0..=config.max_retries {
            if !running.load(Ordering::Relaxed) {
                return outcome;
            }
            if attempt > 0 {
                outcome.retries += 1;
                warn!(
                    seq = frame.seq,
                    attempt,
                    max_retries = config.max_retries,
                    "missed ACK, retrying"
                );
            }

            self.send(frame.clone());

            match self.wait_for_ack(frame.seq, config.ack_timeout) {
                AckOutcome::Acked => {
                    outcome.delivered = true;
                    return outcome;
                }
                AckOutcome::Nakked => outcome.naks_received += 1,
                AckOutcome::NoAck => {}
            }
        }

        outcome
    }
}

/// Classification of an inbound sequence number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeqClass {
    /// Already delivered; re-acknowledge but do not deliver again.
    Duplicate,
    /// New to this receiver; deliver.
    Fresh,
}

/// Receive-side duplicate suppression.
///
/// Tracks the next expected sequence number. Anything below it is a
/// duplicate (a retransmission whose ACK was lost). Anything at or above it
/// is fresh; a gap means the missing frames were lost in flight and will
/// come back later as duplicates once the sender retries them.
#[derive(Debug, Default)]
pub struct ReceiveSequence {
    next_expected: u32,
}

impl ReceiveSequence {
    /// Starts expecting sequence number 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `seq` and advances the expectation for fresh frames.
    pub fn classify(&mut self, seq: u32) -> SeqClass {
        if seq < self.next_expected {
            SeqClass::Duplicate
        } else {
            self.next_expected = seq + 1;
            SeqClass::Fresh
        }
    }

    /// The sequence number the receiver expects next.
    pub fn next_expected(&self) -> u32 {
        self.next_expected
    }
}
