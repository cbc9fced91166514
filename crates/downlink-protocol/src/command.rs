//! Command payload type and its text codec.
//!
//! Commands travel as pipe-separated text with the command name first:
//!
//! ```text
//! ADJUST_ORIENTATION|<d_pitch>|<d_yaw>|<d_roll>
//! THRUST_BURN|<seconds>
//! ENTER_SAFE_MODE
//! REBOOT
//! ```

use downlink_core::error::PayloadError;

/// A command sent by the ground station to the satellite.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Apply attitude deltas in degrees.
    AdjustOrientation {
        /// Pitch delta in degrees.
        d_pitch: f64,
        /// Yaw delta in degrees.
        d_yaw: f64,
        /// Roll delta in degrees.
        d_roll: f64,
    },
    /// Fire thrusters for the given duration.
    ThrustBurn {
        /// Burn duration in seconds.
        seconds: f64,
    },
    /// Force the satellite into safe mode.
    EnterSafeMode,
    /// Reboot satellite systems, clearing safe mode.
    Reboot,
}

impl Command {
    /// Human-readable command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AdjustOrientation { .. } => "AdjustOrientation",
            Command::ThrustBurn { .. } => "ThrustBurn",
            Command::EnterSafeMode => "EnterSafeMode",
            Command::Reboot => "Reboot",
        }
    }

    /// Serializes the command to its payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::AdjustOrientation { d_pitch, d_yaw, d_roll } => {
                format!("ADJUST_ORIENTATION|{}|{}|{}", d_pitch, d_yaw, d_roll)
            }
            Command::ThrustBurn { seconds } => format!("THRUST_BURN|{}", seconds),
            Command::EnterSafeMode => "ENTER_SAFE_MODE".to_string(),
            Command::Reboot => "REBOOT".to_string(),
        }
        .into_bytes()
    }

    /// Parses a command from payload bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let text = std::str::from_utf8(bytes).map_err(|_| PayloadError::NotUtf8)?;
        let mut fields = text.split('|');
        let name = fields.next().unwrap_or_default();

        match name {
            "ADJUST_ORIENTATION" => Ok(Command::AdjustOrientation {
                d_pitch: next_float(&mut fields, "d_pitch")?,
                d_yaw: next_float(&mut fields, "d_yaw")?,
                d_roll: next_float(&mut fields, "d_roll")?,
            }),
            "THRUST_BURN" => {
                Ok(Command::ThrustBurn { seconds: next_float(&mut fields, "seconds")? })
            }
            "ENTER_SAFE_MODE" => Ok(Command::EnterSafeMode),
            "REBOOT" => Ok(Command::Reboot),
            other => Err(PayloadError::UnknownCommand(other.to_string())),
        }
    }
}

fn next_float<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<f64, PayloadError> {
    let value = fields.next().ok_or(PayloadError::MissingField(name))?;
    value
        .parse()
        .map_err(|_| PayloadError::InvalidNumber { field: name, value: value.into() })
}
