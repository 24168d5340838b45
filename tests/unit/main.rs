//! Unit test harness for stepper-sim.
//!
//! This module organizes the configuration tests that run against the
//! public API.

mod config_parsing;
mod config_validation;
