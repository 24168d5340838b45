//! Unit tests for TOML configuration parsing.

use std::io::Write;

use stepper_sim::config::{load_config, parse_config, SystemConfig};
use stepper_sim::{Degrees, LineId};

const TRACKER: &str = r#"
[motors.alt]
steps_per_revolution = 200
gear_ratio = 4.0
step_pin = 17
dir_pin = 27
ms1_pin = 5
ms2_pin = 6
pulse_delay_us = 500

[motors.alt.limits]
ccw_degrees = 10.0
cw_degrees = 80.0

[motors.azi]
step_pin = 22
dir_pin = 23
"#;

/// Test parsing a full motor configuration from TOML.
#[test]
fn test_parse_motor_config() {
    let config: SystemConfig = toml::from_str(TRACKER).expect("Failed to parse TOML");
    let motor = config.motor("alt").expect("Motor not found");

    assert_eq!(motor.steps_per_revolution, 200);
    assert_eq!(motor.gear_ratio, 4.0);
    assert_eq!(motor.step_pin, LineId(17));
    assert_eq!(motor.dir_pin, LineId(27));
    assert_eq!(motor.ms1_pin, Some(LineId(5)));
    assert_eq!(motor.ms2_pin, Some(LineId(6)));
    assert_eq!(motor.pulse_delay_us, 500);

    let limits = motor.limits.expect("limits missing");
    assert_eq!(limits.ccw, Some(Degrees(10.0)));
    assert_eq!(limits.cw, Some(Degrees(80.0)));
}

/// Omitted fields take their defaults.
#[test]
fn test_parse_defaults() {
    let config = parse_config(TRACKER).unwrap();
    let azi = config.motor("azi").unwrap();

    assert_eq!(azi.steps_per_revolution, 200);
    assert_eq!(azi.gear_ratio, 1.0);
    assert_eq!(azi.ms1_pin, None);
    assert!(azi.limits.is_none());
    assert_eq!(azi.pins().microstep(), None);
}

/// Motor names keep declaration order.
#[test]
fn test_motor_names_in_order() {
    let config = parse_config(TRACKER).unwrap();
    let names: Vec<&str> = config.motor_names().collect();
    assert_eq!(names, vec!["alt", "azi"]);
}

/// Test missing required field.
#[test]
fn test_missing_step_pin() {
    let result = parse_config(
        r#"
[motors.alt]
dir_pin = 27
"#,
    );
    assert!(result.is_err());
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("stepper-sim-{}.toml", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TRACKER.as_bytes()).unwrap();
    }

    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(config.motor("alt").is_some());
    assert_eq!(config.line_ids().len(), 6);
}
