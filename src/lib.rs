//! # stepper-sim
//!
//! Simulated stepper motor driver board with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Pin board**: Registered lines with modes and levels, written singly or in batches
//! - **Edge-driven motors**: Motors attached to lines step on the rising edge of their step line
//! - **Microstep recalibration**: Changing ms1/ms2 rescales position without a jump in angle
//! - **Shortest-path rotation**: Rotate to an absolute angle with optional travel limits
//! - **embedded-hal 1.0**: Board lines as `OutputPin`, pulse timing through `DelayNs`
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_sim::{LineId, LineMode, MotorModel, PinBoard, Rotation, Degrees, StdDelay};
//!
//! let (step, dir) = (LineId(17), LineId(27));
//! let mut board = PinBoard::new();
//! board.register_line(step)?;
//! board.register_line(dir)?;
//! board.set_mode(&[step, dir], LineMode::Output)?;
//!
//! let motor = MotorModel::builder()
//!     .step_pin(step)
//!     .dir_pin(dir)
//!     .steps_per_revolution(200)
//!     .build()?;
//! let id = board.add_motor(motor)?;
//! board.attach(id, &[step, dir])?;
//!
//! board.rotate(id, &Rotation::to(Degrees(90.0)), &mut StdDelay)?;
//! assert_eq!(board.motor(id).unwrap().microsteps(), 50);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables TOML loading, [`SharedBoard`] and [`StdDelay`]
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod board;
pub mod config;
pub mod error;
pub mod motor;

// Re-exports for ergonomic API
pub use board::{Batch, Level, Line, LineId, LineMode, MotorId, PinBoard, Snapshot};
pub use config::{validate_config, MotorConfig, SystemConfig, TravelLimits};
pub use error::{Error, Result};
pub use motor::{
    closest_loop_movement, Direction, MotorModel, MotorModelBuilder, MotorSystem, PinBinding,
    Rotation, RotationPlan,
};

#[cfg(feature = "std")]
pub use board::{BoardPin, SharedBoard, StdDelay};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, MicrostepMode};
