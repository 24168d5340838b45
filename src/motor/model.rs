//! Stepper motor model driven by board line levels.

use tracing::{debug, trace};

use crate::board::{Level, LineId, Snapshot};
use crate::config::units::{Degrees, MicrostepMode};
use crate::config::TravelLimits;
use crate::error::{BoardError, Result};

use super::builder::MotorModelBuilder;
use super::position::{closest_loop_movement, wrap};

/// Direction of motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive microstep count), direction line low.
    #[default]
    Clockwise,
    /// Counter-clockwise (negative microstep count), direction line high.
    CounterClockwise,
}

impl Direction {
    /// Get direction from a signed displacement.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Direction selected by a direction line level.
    #[inline]
    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Low => Direction::Clockwise,
            Level::High => Direction::CounterClockwise,
        }
    }

    /// Direction line level selecting this direction.
    #[inline]
    pub fn level(self) -> Level {
        match self {
            Direction::Clockwise => Level::Low,
            Direction::CounterClockwise => Level::High,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Board lines a motor listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinBinding {
    /// Step line: one step per rising edge.
    pub step: LineId,
    /// Direction line: high selects counter-clockwise.
    pub dir: LineId,
    /// First microstep select line.
    pub ms1: Option<LineId>,
    /// Second microstep select line.
    pub ms2: Option<LineId>,
}

impl PinBinding {
    /// Bind step and direction lines without microstepping.
    pub fn new(step: LineId, dir: LineId) -> Self {
        Self {
            step,
            dir,
            ms1: None,
            ms2: None,
        }
    }

    /// Also bind the microstep select lines.
    pub fn with_microstep(mut self, ms1: LineId, ms2: LineId) -> Self {
        self.ms1 = Some(ms1);
        self.ms2 = Some(ms2);
        self
    }

    /// Both microstep lines, if both are bound.
    #[inline]
    pub fn microstep(&self) -> Option<(LineId, LineId)> {
        self.ms1.zip(self.ms2)
    }

    /// Every bound line.
    pub fn iter(&self) -> impl Iterator<Item = LineId> {
        [Some(self.step), Some(self.dir), self.ms1, self.ms2]
            .into_iter()
            .flatten()
    }
}

/// Modelled state of one stepper motor behind a step/dir driver.
///
/// Position is counted in microsteps on a loop of [`full_cycle`](Self::full_cycle)
/// positions and only changes in response to observed line levels.
#[derive(Debug, Clone)]
pub struct MotorModel {
    name: heapless::String<32>,
    pins: PinBinding,
    steps_per_revolution: u16,
    gear_ratio: f32,
    /// Full steps per gear output revolution.
    geared_steps: i64,
    pulse_delay_us: u32,
    limits: TravelLimits,

    position: i64,
    mode: MicrostepMode,
    direction: Direction,
    /// Set on the step that a high step line produced, cleared on low.
    stepped_this_pulse: bool,
}

impl MotorModel {
    /// Start building a motor model.
    pub fn builder() -> MotorModelBuilder {
        MotorModelBuilder::new()
    }

    pub(crate) fn new(
        name: heapless::String<32>,
        pins: PinBinding,
        steps_per_revolution: u16,
        gear_ratio: f32,
        geared_steps: i64,
        pulse_delay_us: u32,
        limits: TravelLimits,
    ) -> Self {
        Self {
            name,
            pins,
            steps_per_revolution,
            gear_ratio,
            geared_steps,
            pulse_delay_us,
            limits,
            position: 0,
            mode: MicrostepMode::Full,
            direction: Direction::Clockwise,
            stepped_this_pulse: false,
        }
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Lines this motor reads.
    #[inline]
    pub fn pins(&self) -> &PinBinding {
        &self.pins
    }

    /// Base full steps per motor shaft revolution.
    #[inline]
    pub fn steps_per_revolution(&self) -> u16 {
        self.steps_per_revolution
    }

    /// Motor shaft revolutions per gear output revolution.
    #[inline]
    pub fn gear_ratio(&self) -> f32 {
        self.gear_ratio
    }

    /// Half-period of one step pulse driven by the planner.
    #[inline]
    pub fn pulse_delay_us(&self) -> u32 {
        self.pulse_delay_us
    }

    /// Configured travel limits.
    #[inline]
    pub fn limits(&self) -> &TravelLimits {
        &self.limits
    }

    /// Current microstep resolution.
    #[inline]
    pub fn microstep_mode(&self) -> MicrostepMode {
        self.mode
    }

    /// Direction selected by the last observed direction line level.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Microsteps in one gear output revolution at the current resolution.
    #[inline]
    pub fn full_cycle(&self) -> i64 {
        self.geared_steps * i64::from(self.mode.value())
    }

    /// Position in microsteps, `0 <= msteps < full_cycle()`.
    #[inline]
    pub fn microsteps(&self) -> i64 {
        self.position
    }

    /// Position in full steps (truncated).
    #[inline]
    pub fn steps(&self) -> i64 {
        self.position / i64::from(self.mode.value())
    }

    /// Motor shaft angle of the current position.
    ///
    /// With gearing this runs past 360 within one output revolution.
    #[inline]
    pub fn degrees(&self) -> Degrees {
        self.microsteps_to_degrees(self.position)
    }

    /// Gear output angle of the current position.
    #[inline]
    pub fn gear_output_degrees(&self) -> Degrees {
        Degrees(self.degrees().0 / self.gear_ratio)
    }

    /// Motor shaft angle of a microstep count at the current resolution.
    pub fn microsteps_to_degrees(&self, msteps: i64) -> Degrees {
        let per_rev = f64::from(self.steps_per_revolution) * f64::from(self.mode.value());
        Degrees((msteps as f64 * 360.0 / per_rev) as f32)
    }

    /// Microstep count of an angle at the current resolution.
    ///
    /// The angle is taken at the gear output when `relative_to_gear_output`,
    /// otherwise at the motor shaft. Fractional microsteps are truncated;
    /// values within float rounding of a whole microstep snap to it.
    pub fn degrees_to_microsteps(&self, degrees: Degrees, relative_to_gear_output: bool) -> i64 {
        let mut per_rev = f64::from(self.steps_per_revolution) * f64::from(self.mode.value());
        if relative_to_gear_output {
            per_rev *= f64::from(self.gear_ratio);
        }

        let exact = f64::from(degrees.0) * per_rev / 360.0;
        let nearest = libm::round(exact);
        let tolerance = 1e-6 * (1.0 + per_rev);
        if libm::fabs(exact - nearest) <= tolerance {
            nearest as i64
        } else {
            exact as i64
        }
    }

    /// React to the current board levels.
    ///
    /// Re-reads the direction line, steps once on a high step line that has
    /// not already produced a step, and rescales the position when the
    /// microstep lines select a new resolution.
    ///
    /// # Errors
    ///
    /// - `UnknownLine` if a bound line is missing from the snapshot
    /// - `UnknownMicrostepCombination` if ms1/ms2 select no mode
    ///
    /// State is unchanged on error.
    pub fn observe(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        let dir = Self::read(snapshot, self.pins.dir)?;
        let step = Self::read(snapshot, self.pins.step)?;
        let new_mode = match self.pins.microstep() {
            Some((ms1, ms2)) => Some(MicrostepMode::from_levels(
                Self::read(snapshot, ms1)?,
                Self::read(snapshot, ms2)?,
            )?),
            None => None,
        };

        self.direction = Direction::from_level(dir);

        if step.is_low() {
            self.stepped_this_pulse = false;
        } else if !self.stepped_this_pulse {
            self.position = wrap(self.position + self.direction.sign(), self.full_cycle());
            self.stepped_this_pulse = true;
            trace!(motor = self.name(), position = self.position, "step");
        }

        if let Some(mode) = new_mode.filter(|m| *m != self.mode) {
            self.recalibrate(mode);
        }
        Ok(())
    }

    /// Rescale the position to a new resolution without a jump in angle.
    ///
    /// Coarsening first moves to the nearest position representable at the
    /// new resolution.
    fn recalibrate(&mut self, mode: MicrostepMode) {
        let old = i64::from(self.mode.value());
        let new = i64::from(mode.value());
        let mut position = self.position;

        if new < old {
            position += closest_loop_movement(position, 0, old / new);
        }
        position = position * new / old;

        debug!(
            motor = self.name(),
            from = old,
            to = new,
            before = self.position,
            after = position,
            "microstep mode changed"
        );

        self.mode = mode;
        self.position = wrap(position, self.full_cycle());
    }

    fn read(snapshot: &Snapshot<'_>, line: LineId) -> Result<Level> {
        snapshot
            .level(line)
            .ok_or_else(|| BoardError::UnknownLine(line).into())
    }
}
