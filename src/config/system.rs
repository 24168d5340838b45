//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::board::{LineId, MAX_LINES};

use super::motor::MotorConfig;

/// Maximum number of motors in one configuration.
pub const MAX_CONFIG_MOTORS: usize = 8;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named motor configurations.
    #[serde(default)]
    pub motors: FnvIndexMap<String<32>, MotorConfig, MAX_CONFIG_MOTORS>,
}

impl SystemConfig {
    /// Get a motor configuration by name.
    pub fn motor(&self, name: &str) -> Option<&MotorConfig> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }

    /// Every pin referenced by any motor, each once, in declaration order.
    pub fn line_ids(&self) -> heapless::Vec<LineId, MAX_LINES> {
        let mut lines = heapless::Vec::new();
        for line in self.motors.values().flat_map(|m| m.pins().iter()) {
            if !lines.contains(&line) {
                // MAX_CONFIG_MOTORS motors with four pins each fill MAX_LINES exactly
                let _ = lines.push(line);
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_pins_listed_once() {
        let config: SystemConfig = toml::from_str(
            r#"
[motors.alt]
step_pin = 17
dir_pin = 27
ms1_pin = 5
ms2_pin = 6

[motors.azi]
step_pin = 22
dir_pin = 23
ms1_pin = 5
ms2_pin = 6
"#,
        )
        .unwrap();

        let lines: heapless::Vec<u16, 8> = config.line_ids().iter().map(|l| l.value()).collect();
        assert_eq!(lines.as_slice(), &[17, 27, 5, 6, 22, 23]);
    }
}
