//! Physical model of the simulated spacecraft.

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use downlink_endpoint::Spacecraft;
use downlink_protocol::{Command, Telemetry};

/// Temperature above which the satellite autonomously enters safe mode.
const SAFE_MODE_TEMP_C: f64 = 85.0;
/// Battery level below which the satellite autonomously enters safe mode.
const SAFE_MODE_BATTERY_PCT: f64 = 10.0;

/// Spacecraft state with simple orbital and power dynamics.
///
/// Temperature takes a bounded random walk, the battery drains (faster in
/// safe mode, where the heaters run), altitude decays under drag, and the
/// attitude drifts. Anomalies force safe mode, which blocks thrust burns
/// until a reboot clears it.
pub struct OrbitModel {
    rng: StdRng,
    epoch: Instant,
    safe_mode: bool,

    temperature_c: f64,
    battery_pct: f64,
    orbit_altitude_km: f64,
    pitch_deg: f64,
    yaw_deg: f64,
    roll_deg: f64,
}

impl OrbitModel {
    /// Creates a model in its initial nominal state.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            epoch: Instant::now(),
            safe_mode: false,
            temperature_c: 50.0,
            battery_pct: 90.0,
            orbit_altitude_km: 400.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            roll_deg: 0.0,
        }
    }

    /// Whether the spacecraft is currently in safe mode.
    pub fn safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn check_anomalies(&mut self) {
        if self.safe_mode {
            return;
        }
        if self.temperature_c > SAFE_MODE_TEMP_C {
            warn!(temp = self.temperature_c, "over-temperature, entering safe mode");
            self.safe_mode = true;
        } else if self.battery_pct < SAFE_MODE_BATTERY_PCT {
            warn!(batt = self.battery_pct, "battery low, entering safe mode");
            self.safe_mode = true;
        }
    }
}

impl Spacecraft for OrbitModel {
    fn update(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        // Discard nonsensical steps after clock hiccups or long stalls.
        if dt <= 0.0 || dt > 1.0 {
            return;
        }

        self.temperature_c += self.rng.gen_range(-0.5..0.5) * dt;

        let drain = if self.safe_mode { 0.2 } else { 0.1 };
        self.battery_pct = (self.battery_pct - drain * dt).max(0.0);

        self.orbit_altitude_km -= 0.001 * dt;

        self.pitch_deg += self.rng.gen_range(-0.05..0.05) * dt;
        self.yaw_deg += self.rng.gen_range(-0.05..0.05) * dt;
        self.roll_deg += self.rng.gen_range(-0.05..0.05) * dt;

        self.check_anomalies();
    }

    fn sample_telemetry(&mut self) -> Telemetry {
        Telemetry {
            ts_ns: self.epoch.elapsed().as_nanos() as i64,
            temperature_c: self.temperature_c,
            battery_pct: self.battery_pct,
            orbit_altitude_km: self.orbit_altitude_km,
            pitch_deg: self.pitch_deg,
            yaw_deg: self.yaw_deg,
            roll_deg: self.roll_deg,
        }
    }

    fn execute(&mut self, command: &Command) {
        match command {
            Command::AdjustOrientation { d_pitch, d_yaw, d_roll } => {
                self.pitch_deg += d_pitch;
                self.yaw_deg += d_yaw;
                self.roll_deg += d_roll;
                debug!(d_pitch, d_yaw, d_roll, "orientation adjusted");
            }
            Command::ThrustBurn { seconds } => {
                if self.safe_mode {
                    warn!(seconds, "thrust burn blocked in safe mode");
                } else {
                    self.orbit_altitude_km += seconds * 0.5;
                    self.battery_pct = (self.battery_pct - seconds * 2.0).max(0.0);
                    debug!(seconds, alt = self.orbit_altitude_km, "thrust burn applied");
                }
            }
            Command::EnterSafeMode => {
                self.safe_mode = true;
                warn!("safe mode commanded");
            }
            Command::Reboot => {
                debug!("rebooting");
                // The avionics are dark for the duration of the reboot.
                std::thread::sleep(Duration::from_millis(100));
                self.safe_mode = false;
                debug!("reboot complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_drains_over_time() {
        let mut model = OrbitModel::new(1);
        let before = model.battery_pct;
        for _ in 0..100 {
            model.update(Duration::from_millis(100));
        }
        assert!(model.battery_pct < before);
    }

    #[test]
    fn test_update_ignores_oversized_steps() {
        let mut model = OrbitModel::new(1);
        let before = model.battery_pct;
        model.update(Duration::from_secs(10));
        assert_eq!(model.battery_pct, before);
    }

    #[test]
    fn test_low_battery_forces_safe_mode() {
        let mut model = OrbitModel::new(1);
        model.battery_pct = 5.0;
        model.update(Duration::from_millis(100));
        assert!(model.safe_mode());
    }

    #[test]
    fn test_thrust_blocked_in_safe_mode() {
        let mut model = OrbitModel::new(1);
        model.execute(&Command::EnterSafeMode);
        let altitude = model.orbit_altitude_km;
        model.execute(&Command::ThrustBurn { seconds: 2.0 });
        assert_eq!(model.orbit_altitude_km, altitude);
    }

    #[test]
    fn test_thrust_raises_altitude_and_drains_battery() {
        let mut model = OrbitModel::new(1);
        let altitude = model.orbit_altitude_km;
        let battery = model.battery_pct;
        model.execute(&Command::ThrustBurn { seconds: 2.0 });
        assert!((model.orbit_altitude_km - (altitude + 1.0)).abs() < 1e-9);
        assert!((model.battery_pct - (battery - 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reboot_clears_safe_mode() {
        let mut model = OrbitModel::new(1);
        model.execute(&Command::EnterSafeMode);
        assert!(model.safe_mode());
        model.execute(&Command::Reboot);
        assert!(!model.safe_mode());
    }

    #[test]
    fn test_orientation_deltas_applied() {
        let mut model = OrbitModel::new(1);
        model.execute(&Command::AdjustOrientation { d_pitch: 1.0, d_yaw: -2.0, d_roll: 0.5 });
        assert!((model.pitch_deg - 1.0).abs() < 1e-9);
        assert!((model.yaw_deg + 2.0).abs() < 1e-9);
        assert!((model.roll_deg - 0.5).abs() < 1e-9);
    }
}
