use std::time::Duration;

use crate::error::{ErrorKind, Result};

/// Configuration options for the simulated radio link.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Mean one-way latency in milliseconds.
    pub latency_ms: u64,
    /// Standard deviation of the Gaussian latency jitter in milliseconds.
    pub jitter_ms: u64,
    /// Per-packet drop probability in `[0, 1]`. Zero disables loss.
    pub loss_prob: f64,
    /// RNG seed. The same seed and submission order reproduce the same
    /// loss/delay decisions.
    pub seed: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { latency_ms: 100, jitter_ms: 30, loss_prob: 0.05, seed: 42 }
    }
}

impl LinkConfig {
    /// Checks that all fields are within their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.loss_prob) {
            return Err(ErrorKind::InvalidConfig(format!(
                "loss_prob must be within [0, 1], got {}",
                self.loss_prob
            )));
        }
        Ok(())
    }
}

/// Stop-and-wait retry parameters shared by both endpoints.
#[derive(Clone, Debug)]
pub struct ArqConfig {
    /// How long to wait for an ACK before counting the attempt as failed.
    pub ack_timeout: Duration,
    /// Additional attempts after the initial send.
    pub max_retries: u32,
}

impl Default for ArqConfig {
    fn default() -> Self {
        Self { ack_timeout: Duration::from_millis(150), max_retries: 3 }
    }
}

impl ArqConfig {
    /// Checks that all fields are within their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        if self.ack_timeout.is_zero() {
            return Err(ErrorKind::InvalidConfig(
                "ack_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the satellite endpoint.
#[derive(Clone, Debug)]
pub struct SatelliteConfig {
    /// Telemetry emission rate in Hz. The emission period is `1000 / rate` ms.
    pub telemetry_rate_hz: f64,
    /// Retry parameters for outbound telemetry.
    pub arq: ArqConfig,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self { telemetry_rate_hz: 5.0, arq: ArqConfig::default() }
    }
}

impl SatelliteConfig {
    /// Checks that all fields are within their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        if self.telemetry_rate_hz <= 0.0 || !self.telemetry_rate_hz.is_finite() {
            return Err(ErrorKind::InvalidConfig(format!(
                "telemetry_rate_hz must be positive, got {}",
                self.telemetry_rate_hz
            )));
        }
        self.arq.validate()
    }

    /// Time between telemetry emissions.
    pub fn telemetry_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.telemetry_rate_hz)
    }
}

/// Configuration for the ground-station endpoint.
#[derive(Clone, Debug, Default)]
pub struct GroundConfig {
    /// Retry parameters for outbound commands.
    pub arq: ArqConfig,
}

impl GroundConfig {
    /// Checks that all fields are within their allowed ranges.
    pub fn validate(&self) -> Result<()> {
        self.arq.validate()
    }
}
