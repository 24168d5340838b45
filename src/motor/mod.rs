//! Motor module for stepper-sim.
//!
//! Provides the motor model that turns observed line levels into position,
//! and the planner that turns target angles into step pulses.

mod builder;
mod model;
mod planner;
pub mod position;
mod system;

pub use builder::MotorModelBuilder;
pub use model::{Direction, MotorModel, PinBinding};
pub use planner::{Rotation, RotationPlan};
pub use position::closest_loop_movement;
pub use system::MotorSystem;
