//! Motor configuration from TOML.

use serde::Deserialize;

use crate::board::LineId;
use crate::motor::PinBinding;

use super::limits::TravelLimits;

/// Default half-period of one step pulse in microseconds.
pub const DEFAULT_PULSE_DELAY_US: u32 = 1000;

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Base steps per revolution (typically 200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Gear ratio (motor revolutions per output revolution, >= 1).
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f32,

    /// Step line.
    pub step_pin: LineId,

    /// Direction line.
    pub dir_pin: LineId,

    /// First microstep select line. May be shared between motors.
    #[serde(default)]
    pub ms1_pin: Option<LineId>,

    /// Second microstep select line. May be shared between motors.
    #[serde(default)]
    pub ms2_pin: Option<LineId>,

    /// Half-period of one step pulse.
    #[serde(default = "default_pulse_delay")]
    pub pulse_delay_us: u32,

    /// Optional travel limits.
    #[serde(default)]
    pub limits: Option<TravelLimits>,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_gear_ratio() -> f32 {
    1.0
}

fn default_pulse_delay() -> u32 {
    DEFAULT_PULSE_DELAY_US
}

impl MotorConfig {
    /// Lines this motor is bound to.
    pub fn pins(&self) -> PinBinding {
        PinBinding {
            step: self.step_pin,
            dir: self.dir_pin,
            ms1: self.ms1_pin,
            ms2: self.ms2_pin,
        }
    }

    /// Full steps per gear output revolution, before rounding.
    pub fn geared_steps(&self) -> f32 {
        self.steps_per_revolution as f32 * self.gear_ratio
    }
}
