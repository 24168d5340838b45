//! Configuration module for stepper-sim.
//!
//! Supplies pin numbers and mechanics for named motors, loaded from TOML
//! files (with `std` feature) or pre-parsed data.

mod limits;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use limits::TravelLimits;
pub use motor::{MotorConfig, DEFAULT_PULSE_DELAY_US};
pub use system::{SystemConfig, MAX_CONFIG_MOTORS};
pub use validation::{validate_config, CYCLE_TOLERANCE};
pub(crate) use validation::{geared_cycle, GearFault};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, MicrostepMode};
