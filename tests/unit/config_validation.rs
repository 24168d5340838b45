//! Unit tests for configuration validation.

use stepper_sim::config::{parse_config, validate_config, SystemConfig};
use stepper_sim::error::{ConfigError, Error};

fn motor_with(extra: &str) -> String {
    format!("[motors.alt]\nstep_pin = 17\ndir_pin = 27\n{extra}\n")
}

/// Test valid configuration passes.
#[test]
fn test_valid_config() {
    let config: SystemConfig = toml::from_str(&motor_with("gear_ratio = 2.5")).unwrap();
    assert!(validate_config(&config).is_ok());
}

/// An empty configuration is valid.
#[test]
fn test_empty_config() {
    let config = parse_config("").unwrap();
    assert_eq!(config.motors.len(), 0);
}

/// Test gear ratio below one is rejected.
#[test]
fn test_gear_ratio_below_one() {
    let result = parse_config(&motor_with("gear_ratio = 0.5"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
}

/// A gear ratio giving a fractional number of steps per output revolution
/// is rejected.
#[test]
fn test_fractional_cycle() {
    let result = parse_config(&motor_with("gear_ratio = 1.001"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
}

/// Test zero steps per revolution is rejected.
#[test]
fn test_zero_steps_per_revolution() {
    let result = parse_config(&motor_with("steps_per_revolution = 0"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    ));
}

/// Test zero pulse delay is rejected.
#[test]
fn test_zero_pulse_delay() {
    let result = parse_config(&motor_with("pulse_delay_us = 0"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidPulseDelay(0)))
    ));
}
