//! Simulated pin board.
//!
//! Tracks the mode and level of every registered output line and fans each
//! write out to the motor models attached to that line.

mod batch;
mod line;
mod pin_board;
#[cfg(feature = "std")]
mod shared;

pub use batch::Batch;
pub use line::{Level, Line, LineId, LineMode};
pub use pin_board::{MotorId, PinBoard, Snapshot};
#[cfg(feature = "std")]
pub use shared::{BoardPin, SharedBoard, StdDelay};

/// Maximum number of lines a board can register.
pub const MAX_LINES: usize = 32;

/// Maximum number of motor models a board can host.
pub const MAX_MOTORS: usize = 8;
