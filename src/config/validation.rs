//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Largest distance from a whole number of steps tolerated in a geared cycle.
pub const CYCLE_TOLERANCE: f32 = 1e-3;

/// What is wrong with a gear ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GearFault {
    /// Not finite, or below 1.
    Ratio,
    /// Gives a fractional number of steps per output revolution.
    Cycle,
}

/// Full steps per gear output revolution for `steps` motor steps per
/// revolution and `gear_ratio`.
pub(crate) fn geared_cycle(steps: u16, gear_ratio: f32) -> core::result::Result<i64, GearFault> {
    if !gear_ratio.is_finite() || gear_ratio < 1.0 {
        return Err(GearFault::Ratio);
    }
    let geared = f32::from(steps) * gear_ratio;
    let whole = libm::roundf(geared);
    if libm::fabsf(geared - whole) > CYCLE_TOLERANCE {
        return Err(GearFault::Cycle);
    }
    Ok(whole as i64)
}

/// Validate a system configuration.
///
/// Checks:
/// - Steps per revolution are positive
/// - Gear ratios are finite, >= 1 and give a whole number of steps per output
///   revolution
/// - Pulse delays are positive
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (name, motor) in config.motors.iter() {
        validate_motor(name.as_str(), motor)?;
    }
    Ok(())
}

fn validate_motor(_name: &str, config: &super::MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    geared_cycle(config.steps_per_revolution, config.gear_ratio)
        .map_err(|_| Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)))?;

    if config.pulse_delay_us == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseDelay(
            config.pulse_delay_us,
        )));
    }

    Ok(())
}
