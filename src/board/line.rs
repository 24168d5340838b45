//! Line identity, logic level and I/O mode.

use core::fmt;

use serde::Deserialize;

use super::MotorId;
use super::MAX_MOTORS;

/// Identifier of one simulated digital line (pin or GPIO number).
///
/// The board does not distinguish physical pin numbering from channel
/// numbering; any comparable integer works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct LineId(pub u16);

impl LineId {
    /// Get the raw line number.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for LineId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logic level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic low.
    #[default]
    Low,
    /// Logic high.
    High,
}

impl Level {
    /// Whether the level is high.
    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Whether the level is low.
    #[inline]
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "LOW"),
            Level::High => write!(f, "HIGH"),
        }
    }
}

/// I/O mode a line can be configured with.
///
/// `Input` exists so callers can express it, but the board rejects it:
/// only outputs are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    /// Digital input (never accepted).
    Input,
    /// Digital output.
    Output,
}

impl fmt::Display for LineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineMode::Input => write!(f, "in"),
            LineMode::Output => write!(f, "out"),
        }
    }
}

/// State of one registered line.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// `None` until set, and again after release.
    pub(crate) mode: Option<LineMode>,
    pub(crate) level: Level,
    /// Motors notified when this line is written, in attachment order.
    pub(crate) subscribers: heapless::Vec<MotorId, MAX_MOTORS>,
}

impl Line {
    /// Current mode, `None` if unset.
    #[inline]
    pub fn mode(&self) -> Option<LineMode> {
        self.mode
    }

    /// Current logic level.
    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Motors subscribed to this line.
    #[inline]
    pub fn subscribers(&self) -> &[MotorId] {
        &self.subscribers
    }

    /// Reset to unset mode and low level. Subscriptions survive.
    pub(crate) fn release(&mut self) {
        self.mode = None;
        self.level = Level::Low;
    }
}
