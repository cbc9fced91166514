//! Command schedule for the ground station.

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};

use downlink_endpoint::CommandScheduler;
use downlink_protocol::Command;

/// How often the ground station issues a command.
const COMMAND_INTERVAL: Duration = Duration::from_secs(4);
/// Orientation trims are sent during this initial window.
const ORIENTATION_WINDOW: Duration = Duration::from_secs(8);
/// A thrust burn is sent between the orientation window and this mark.
const THRUST_WINDOW: Duration = Duration::from_secs(12);

/// Issues the mission's command sequence: small random orientation trims
/// early in the run, then a thrust burn, then silence.
pub struct RotatingScheduler {
    rng: StdRng,
    start: Instant,
    last_command: Instant,
}

impl RotatingScheduler {
    /// Creates a scheduler whose run starts now.
    pub fn new(seed: u64) -> Self {
        let now = Instant::now();
        Self { rng: StdRng::seed_from_u64(seed), start: now, last_command: now }
    }
}

impl CommandScheduler for RotatingScheduler {
    fn next_command(&mut self) -> Option<Command> {
        let now = Instant::now();
        if now.duration_since(self.last_command) < COMMAND_INTERVAL {
            return None;
        }
        self.last_command = now;

        let elapsed = now.duration_since(self.start);
        if elapsed < ORIENTATION_WINDOW {
            Some(Command::AdjustOrientation {
                d_pitch: self.rng.gen_range(-2.0..2.0),
                d_yaw: self.rng.gen_range(-2.0..2.0),
                d_roll: self.rng.gen_range(-2.0..2.0),
            })
        } else if elapsed < THRUST_WINDOW {
            Some(Command::ThrustBurn { seconds: 2.0 })
        } else {
            None
        }
    }
}
