//! Telemetry payload type and its text codec.
//!
//! Telemetry travels as a pipe-separated `key=value` payload:
//!
//! ```text
//! ts=<i64 nanoseconds>|temp=<f>|batt=<f>|alt=<f>|pitch=<f>|yaw=<f>|roll=<f>
//! ```
//!
//! Floats are emitted with two decimal places. Unknown keys are ignored on
//! decode so the format can grow without breaking older readers.

use downlink_core::error::PayloadError;

/// A telemetry sample emitted by the satellite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Telemetry {
    /// Sample timestamp in nanoseconds since an arbitrary epoch.
    pub ts_ns: i64,
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Battery level in percent.
    pub battery_pct: f64,
    /// Orbital altitude in kilometers.
    pub orbit_altitude_km: f64,
    /// Pitch angle in degrees.
    pub pitch_deg: f64,
    /// Yaw angle in degrees.
    pub yaw_deg: f64,
    /// Roll angle in degrees.
    pub roll_deg: f64,
}

impl Telemetry {
    /// Serializes the sample to its payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "ts={}|temp={:.2}|batt={:.2}|alt={:.2}|pitch={:.2}|yaw={:.2}|roll={:.2}",
            self.ts_ns,
            self.temperature_c,
            self.battery_pct,
            self.orbit_altitude_km,
            self.pitch_deg,
            self.yaw_deg,
            self.roll_deg,
        )
        .into_bytes()
    }

    /// Parses a sample from payload bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(bytes).map_err(|_| PayloadError::NotUtf8)?;
        let mut sample = Telemetry::default();

        for token in text.split('|') {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key {
                "ts" => sample.ts_ns = parse_int("ts", value)?,
                "temp" => sample.temperature_c = parse_float("temp", value)?,
                "batt" => sample.battery_pct = parse_float("batt", value)?,
                "alt" => sample.orbit_altitude_km = parse_float("alt", value)?,
                "pitch" => sample.pitch_deg = parse_float("pitch", value)?,
                "yaw" => sample.yaw_deg = parse_float("yaw", value)?,
                "roll" => sample.roll_deg = parse_float("roll", value)?,
                _ => {}
            }
        }

        Ok(sample)
    }

    /// Header row for CSV telemetry logs.
    pub fn csv_header() -> &'static str {
        "timestamp_ns,temperature_c,battery_pct,orbit_altitude_km,pitch_deg,yaw_deg,roll_deg"
    }

    /// Formats the sample as one CSV row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            self.ts_ns,
            self.temperature_c,
            self.battery_pct,
            self.orbit_altitude_km,
            self.pitch_deg,
            self.yaw_deg,
            self.roll_deg,
        )
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, PayloadError> {
    value.parse().map_err(|_| PayloadError::InvalidNumber { field, value: value.into() })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, PayloadError> {
    value.parse().map_err(|_| PayloadError::InvalidNumber { field, value: value.into() })
}
