//! Builder pattern for MotorModel.

use crate::board::LineId;
use crate::config::{geared_cycle, GearFault, MotorConfig, TravelLimits, DEFAULT_PULSE_DELAY_US};
use crate::error::{MotorError, Result};

use super::model::{MotorModel, PinBinding};

/// Builder for creating MotorModel instances.
#[derive(Debug, Clone)]
pub struct MotorModelBuilder {
    name: Option<heapless::String<32>>,
    step_pin: Option<LineId>,
    dir_pin: Option<LineId>,
    ms1_pin: Option<LineId>,
    ms2_pin: Option<LineId>,
    steps_per_revolution: Option<u16>,
    gear_ratio: f32,
    pulse_delay_us: u32,
    limits: TravelLimits,
}

impl Default for MotorModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorModelBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: None,
            step_pin: None,
            dir_pin: None,
            ms1_pin: None,
            ms2_pin: None,
            steps_per_revolution: None,
            gear_ratio: 1.0,
            pulse_delay_us: DEFAULT_PULSE_DELAY_US,
            limits: TravelLimits::none(),
        }
    }

    /// Set the motor name. Names longer than 32 bytes are ignored.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set the step line.
    pub fn step_pin(mut self, line: LineId) -> Self {
        self.step_pin = Some(line);
        self
    }

    /// Set the direction line.
    pub fn dir_pin(mut self, line: LineId) -> Self {
        self.dir_pin = Some(line);
        self
    }

    /// Set both microstep select lines.
    pub fn microstep_pins(mut self, ms1: LineId, ms2: LineId) -> Self {
        self.ms1_pin = Some(ms1);
        self.ms2_pin = Some(ms2);
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = Some(steps);
        self
    }

    /// Set gear ratio.
    pub fn gear_ratio(mut self, ratio: f32) -> Self {
        self.gear_ratio = ratio;
        self
    }

    /// Set the half-period of planner step pulses.
    pub fn pulse_delay_us(mut self, delay_us: u32) -> Self {
        self.pulse_delay_us = delay_us;
        self
    }

    /// Set default travel limits for rotations.
    pub fn limits(mut self, limits: TravelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.step_pin = Some(config.step_pin);
        self.dir_pin = Some(config.dir_pin);
        self.ms1_pin = config.ms1_pin;
        self.ms2_pin = config.ms2_pin;
        self.steps_per_revolution = Some(config.steps_per_revolution);
        self.gear_ratio = config.gear_ratio;
        self.pulse_delay_us = config.pulse_delay_us;
        self.limits = config.limits.unwrap_or_default();
        self
    }

    /// Build the MotorModel.
    ///
    /// # Errors
    ///
    /// Returns an error if a required pin or steps per revolution is missing,
    /// or the gear ratio does not give a whole number of steps per output
    /// revolution.
    pub fn build(self) -> Result<MotorModel> {
        let step = self.step_pin.ok_or(MotorError::MissingPin("step"))?;
        let dir = self.dir_pin.ok_or(MotorError::MissingPin("dir"))?;

        let steps_per_revolution = self
            .steps_per_revolution
            .filter(|&s| s > 0)
            .ok_or(MotorError::InvalidStepsPerRevolution(
                self.steps_per_revolution.unwrap_or(0),
            ))?;

        let geared_steps =
            geared_cycle(steps_per_revolution, self.gear_ratio).map_err(|fault| match fault {
                GearFault::Ratio => MotorError::InvalidGearRatio(self.gear_ratio),
                GearFault::Cycle => MotorError::NonIntegralCycle {
                    steps_per_revolution,
                    gear_ratio: self.gear_ratio,
                },
            })?;

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("motor").unwrap_or_default());

        let pins = PinBinding {
            step,
            dir,
            ms1: self.ms1_pin,
            ms2: self.ms2_pin,
        };

        Ok(MotorModel::new(
            name,
            pins,
            steps_per_revolution,
            self.gear_ratio,
            geared_steps,
            self.pulse_delay_us,
            self.limits,
        ))
    }
}
