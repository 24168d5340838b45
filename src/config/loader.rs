//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_sim::load_config;
///
/// let config = load_config("track-config.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = truncated(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

/// Keep as much of a message as fits, cut on a char boundary.
fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[motors.alt]
step_pin = 17
dir_pin = 27
"#;

        let config = parse_config(toml).unwrap();
        let motor = config.motor("alt").unwrap();
        assert_eq!(motor.steps_per_revolution, 200);
        assert_eq!(motor.gear_ratio, 1.0);
        assert_eq!(motor.pulse_delay_us, crate::config::DEFAULT_PULSE_DELAY_US);
    }

    #[test]
    fn test_parse_rejects_invalid_gear() {
        let toml = r#"
[motors.alt]
step_pin = 17
dir_pin = 27
gear_ratio = 0.25
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::InvalidGearRatio(_)))
        ));
    }

    #[test]
    fn test_parse_error_reported() {
        let result = parse_config("[motors.alt]\nstep_pin = \"seventeen\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/track-config.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }

    #[test]
    fn test_truncated_message() {
        let long = "x".repeat(300);
        assert_eq!(truncated(&long).len(), 128);
    }
}
