//! Unit types for physical quantities.
//!
//! Provides type-safe representations of angles and microstep resolution
//! to prevent unit confusion at compile time.

use core::ops::{Add, Sub};

use serde::Deserialize;

use crate::board::Level;
use crate::error::MotorError;

/// Angular position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Wrap into `[0, 360)`.
    pub fn normalized(self) -> Self {
        let wrapped = libm::fmodf(self.0, 360.0);
        let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
        // -1e-9 % 360 + 360 rounds up to exactly 360.0 in f32
        if wrapped >= 360.0 {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Microstep resolution of an A4988-style driver.
///
/// Selected by the levels of the ms1 and ms2 lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicrostepMode {
    /// Full step.
    #[default]
    Full,
    /// Half step.
    Half,
    /// Quarter step.
    Quarter,
    /// Eighth step.
    Eighth,
}

impl MicrostepMode {
    /// (ms1, ms2) level pairs and the mode each selects.
    pub const PIN_TABLE: [((Level, Level), MicrostepMode); 4] = [
        ((Level::Low, Level::Low), MicrostepMode::Full),
        ((Level::High, Level::Low), MicrostepMode::Half),
        ((Level::Low, Level::High), MicrostepMode::Quarter),
        ((Level::High, Level::High), MicrostepMode::Eighth),
    ];

    /// Look up the mode selected by the ms1/ms2 levels.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::UnknownMicrostepCombination` if the pair is not in
    /// [`PIN_TABLE`](Self::PIN_TABLE).
    pub fn from_levels(ms1: Level, ms2: Level) -> Result<Self, MotorError> {
        Self::PIN_TABLE
            .iter()
            .find(|(levels, _)| *levels == (ms1, ms2))
            .map(|(_, mode)| *mode)
            .ok_or(MotorError::UnknownMicrostepCombination { ms1, ms2 })
    }

    /// Levels to drive on (ms1, ms2) to select this mode.
    pub fn levels(self) -> (Level, Level) {
        Self::PIN_TABLE
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(levels, _)| *levels)
            .unwrap_or((Level::Low, Level::Low))
    }

    /// Microsteps per full step.
    #[inline]
    pub const fn value(self) -> u8 {
        match self {
            MicrostepMode::Full => 1,
            MicrostepMode::Half => 2,
            MicrostepMode::Quarter => 4,
            MicrostepMode::Eighth => 8,
        }
    }
}

impl TryFrom<u8> for MicrostepMode {
    type Error = MotorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::PIN_TABLE
            .iter()
            .map(|(_, mode)| *mode)
            .find(|mode| mode.value() == value)
            .ok_or(MotorError::InvalidMicrostepMode(value))
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f32 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_table() {
        assert_eq!(
            MicrostepMode::from_levels(Level::Low, Level::Low).unwrap(),
            MicrostepMode::Full
        );
        assert_eq!(
            MicrostepMode::from_levels(Level::High, Level::Low).unwrap(),
            MicrostepMode::Half
        );
        assert_eq!(
            MicrostepMode::from_levels(Level::Low, Level::High).unwrap(),
            MicrostepMode::Quarter
        );
        assert_eq!(
            MicrostepMode::from_levels(Level::High, Level::High).unwrap(),
            MicrostepMode::Eighth
        );
    }

    #[test]
    fn test_levels_inverse() {
        for (levels, mode) in MicrostepMode::PIN_TABLE {
            assert_eq!(mode.levels(), levels);
        }
    }

    #[test]
    fn test_mode_from_value() {
        assert_eq!(MicrostepMode::try_from(4).unwrap(), MicrostepMode::Quarter);
        assert!(MicrostepMode::try_from(3).is_err());
        assert!(MicrostepMode::try_from(16).is_err());
    }

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees(0.0).normalized(), Degrees(0.0));
        assert_eq!(Degrees(360.0).normalized(), Degrees(0.0));
        assert_eq!(Degrees(450.0).normalized(), Degrees(90.0));
        assert_eq!(Degrees(-90.0).normalized(), Degrees(270.0));
        assert_eq!(Degrees(-720.0).normalized(), Degrees(0.0));
    }
}
