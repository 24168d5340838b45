//! Travel limit configuration.

use serde::Deserialize;

use super::units::Degrees;

/// Angles a rotation must not reach, one per direction of travel.
///
/// Limits are read in the same frame as the rotation target (gear output or
/// motor shaft) and wrapped into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TravelLimits {
    /// Limit when turning counter-clockwise.
    #[serde(default, rename = "ccw_degrees")]
    pub ccw: Option<Degrees>,

    /// Limit when turning clockwise.
    #[serde(default, rename = "cw_degrees")]
    pub cw: Option<Degrees>,
}

impl TravelLimits {
    /// Create travel limits.
    pub fn new(ccw: Option<Degrees>, cw: Option<Degrees>) -> Self {
        Self { ccw, cw }
    }

    /// No limits in either direction.
    pub const fn none() -> Self {
        Self { ccw: None, cw: None }
    }

    /// Whether neither direction is limited.
    pub fn is_empty(&self) -> bool {
        self.ccw.is_none() && self.cw.is_none()
    }

    /// Take each limit from `self`, falling back to `other`.
    pub fn or(self, other: TravelLimits) -> Self {
        Self {
            ccw: self.ccw.or(other.ccw),
            cw: self.cw.or(other.cw),
        }
    }
}
