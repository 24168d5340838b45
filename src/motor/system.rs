//! Motor system facade for multi-motor configuration.
//!
//! Wires a pin board and its motors from a single configuration.

use embedded_hal::delay::DelayNs;
use heapless::{FnvIndexMap, String};
use tracing::info;

use crate::board::{LineMode, MotorId, PinBoard};
use crate::config::units::MicrostepMode;
use crate::config::{validate_config, SystemConfig, MAX_CONFIG_MOTORS};
use crate::error::{ConfigError, Error, Result};
use crate::motor::{MotorModel, MotorModelBuilder, Rotation};

/// A board and its named motors, built from configuration.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_sim::{load_config, MotorSystem, Rotation, Degrees, StdDelay};
///
/// let config = load_config("track-config.toml")?;
/// let mut system = MotorSystem::from_config(&config)?;
///
/// system.rotate("alt", &Rotation::to(Degrees(45.0)), &mut StdDelay)?;
/// println!("alt at {}°", system.motor("alt").unwrap().gear_output_degrees().0);
/// ```
#[derive(Debug)]
pub struct MotorSystem {
    board: PinBoard,
    motors: FnvIndexMap<String<32>, MotorId, MAX_CONFIG_MOTORS>,
}

impl MotorSystem {
    /// Build a board holding every configured pin and motor.
    ///
    /// Every pin is registered once and set to output; each motor is
    /// attached to all of its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or a motor
    /// cannot be built.
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        validate_config(config)?;

        let mut board = PinBoard::new();
        let lines = config.line_ids();
        for &line in lines.iter() {
            board.register_line(line)?;
        }
        board.set_mode(lines.as_slice(), LineMode::Output)?;

        let mut motors = FnvIndexMap::new();
        for (name, motor_config) in config.motors.iter() {
            let motor = MotorModelBuilder::new()
                .name(name.as_str())
                .from_motor_config(motor_config)
                .build()?;
            let pins = *motor.pins();
            let id = board.add_motor(motor)?;
            for line in pins.iter() {
                board.attach(id, line)?;
            }
            // Same capacity as the configuration map it is filled from.
            let _ = motors.insert(name.clone(), id);
        }

        info!(
            motors = motors.len(),
            lines = lines.len(),
            "motor system ready"
        );
        Ok(Self { board, motors })
    }

    /// Get the board.
    pub fn board(&self) -> &PinBoard {
        &self.board
    }

    /// Get the board for direct line manipulation.
    pub fn board_mut(&mut self) -> &mut PinBoard {
        &mut self.board
    }

    /// Check if a motor name exists.
    pub fn has_motor(&self, name: &str) -> bool {
        self.motors.iter().any(|(k, _)| k.as_str() == name)
    }

    /// List all motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }

    /// Board handle of a named motor.
    ///
    /// # Errors
    ///
    /// Returns `MotorNotFound` if no motor has that name.
    pub fn motor_id(&self, name: &str) -> Result<MotorId> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| {
                Error::Config(ConfigError::MotorNotFound(
                    String::try_from(name).unwrap_or_default(),
                ))
            })
    }

    /// Get a motor model by name.
    pub fn motor(&self, name: &str) -> Option<&MotorModel> {
        self.motor_id(name).ok().and_then(|id| self.board.motor(id))
    }

    /// Rotate a named motor. See [`PinBoard::rotate`].
    pub fn rotate<D: DelayNs>(&mut self, name: &str, rotation: &Rotation, delay: &mut D) -> Result<bool> {
        let id = self.motor_id(name)?;
        self.board.rotate(id, rotation, delay)
    }

    /// Select the microstep mode of a named motor.
    pub fn set_microstep_mode(&mut self, name: &str, mode: MicrostepMode) -> Result<()> {
        let id = self.motor_id(name)?;
        self.board.set_microstep_mode(id, mode)
    }

    /// Hand back the board with its lines and motors as they are.
    pub fn into_board(self) -> PinBoard {
        self.board
    }
}
