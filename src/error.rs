//! Error types for stepper-sim.
//!
//! Every fallible operation aborts only itself: board and motor state are
//! validated before they are mutated, so an error never leaves a half-applied
//! change behind.

use core::fmt;

use crate::board::{Level, LineId, MotorId};

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-sim operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Pin board operation error
    Board(BoardError),
    /// Motor model error
    Motor(MotorError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Why a line's mode rejected an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFault {
    /// Input lines are not simulated.
    InputUnsupported,
    /// The line was written before its mode was set.
    Uninitialized,
}

/// Pin board errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    /// Operation referenced a line that was never registered
    UnknownLine(LineId),
    /// Line mode does not permit the operation
    InvalidMode {
        /// Offending line
        line: LineId,
        /// What was wrong with its mode
        fault: ModeFault,
    },
    /// Batch arguments have incompatible shapes
    ArgumentShape {
        /// Number of lines given
        lines: usize,
        /// Number of modes or levels given
        values: usize,
    },
    /// Motor handle does not belong to this board
    UnknownMotor(MotorId),
    /// Motor must be attached to a line it drives through
    NotAttached {
        /// Motor being driven
        motor: MotorId,
        /// Line it does not listen on
        line: LineId,
    },
    /// Line or motor capacity of the board is exhausted
    CapacityExceeded,
    /// A thread panicked while holding the shared board (std only)
    #[cfg(feature = "std")]
    LockPoisoned,
}

/// Motor model errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// ms1/ms2 levels match no microstep mode
    UnknownMicrostepCombination {
        /// Level of the ms1 line
        ms1: Level,
        /// Level of the ms2 line
        ms2: Level,
    },
    /// Microstep mode must be 1, 2, 4 or 8
    InvalidMicrostepMode(u8),
    /// Gear ratio must be finite and >= 1
    InvalidGearRatio(f32),
    /// steps_per_revolution * gear_ratio is not a whole number of steps
    NonIntegralCycle {
        /// Base full steps per revolution
        steps_per_revolution: u16,
        /// Requested gear ratio
        gear_ratio: f32,
    },
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// A required pin binding was not supplied
    MissingPin(&'static str),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Invalid gear ratio (must be >= 1)
    InvalidGearRatio(f32),
    /// Invalid steps per revolution (must be > 0)
    InvalidStepsPerRevolution(u16),
    /// Invalid pulse delay (must be > 0)
    InvalidPulseDelay(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Board(e) => write!(f, "Board error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::UnknownLine(line) => write!(f, "Line {} does not exist", line),
            BoardError::InvalidMode { line, fault } => match fault {
                ModeFault::InputUnsupported => {
                    write!(f, "Line {}: input lines are not simulated", line)
                }
                ModeFault::Uninitialized => write!(f, "Line {}: mode is not set", line),
            },
            BoardError::ArgumentShape { lines, values } => write!(
                f,
                "{} line(s) given with {} value(s); expected equal lengths or a single value",
                lines, values
            ),
            BoardError::UnknownMotor(id) => write!(f, "Motor {} is not on this board", id.index()),
            BoardError::NotAttached { motor, line } => write!(
                f,
                "Motor {} is not attached to line {}",
                motor.index(),
                line
            ),
            BoardError::CapacityExceeded => write!(f, "Board capacity exceeded"),
            #[cfg(feature = "std")]
            BoardError::LockPoisoned => write!(f, "Shared board lock poisoned"),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::UnknownMicrostepCombination { ms1, ms2 } => {
                write!(f, "No microstep mode for ms1={}, ms2={}", ms1, ms2)
            }
            MotorError::InvalidMicrostepMode(v) => {
                write!(f, "Invalid microstep mode: {}. Valid values: 1, 2, 4, 8", v)
            }
            MotorError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be >= 1", v),
            MotorError::NonIntegralCycle {
                steps_per_revolution,
                gear_ratio,
            } => write!(
                f,
                "{} steps/rev with gear ratio {} is not a whole number of steps",
                steps_per_revolution, gear_ratio
            ),
            MotorError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            MotorError::MissingPin(role) => write!(f, "{} pin is required", role),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be >= 1", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidPulseDelay(v) => write!(f, "Invalid pulse delay: {}us. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<BoardError> for Error {
    fn from(e: BoardError) -> Self {
        Error::Board(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
