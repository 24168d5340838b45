//! Rotation planning and execution.
//!
//! A rotation is planned on the motor model alone (shortest path to the
//! target on the motor's cycle) and then driven through the board, one step
//! pulse at a time, so the motor only moves by observing its own lines.

use embedded_hal::delay::DelayNs;
use tracing::{debug, info, warn};

use crate::board::{Level, MotorId, PinBoard};
use crate::config::units::{Degrees, MicrostepMode};
use crate::config::TravelLimits;
use crate::error::{BoardError, MotorError, Result};

use super::model::{Direction, MotorModel};
use super::position::{closest_loop_movement, wrap};

/// Request to turn a motor to an absolute angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Target angle, wrapped into `[0, 360)` when planned.
    pub target: Degrees,
    /// Limits for this rotation; unset sides fall back to the motor's own.
    pub limits: TravelLimits,
    /// Read target and limits at the gear output rather than the motor shaft.
    pub relative_to_gear_output: bool,
}

impl Rotation {
    /// Rotate to `target`, measured at the gear output.
    pub fn to(target: Degrees) -> Self {
        Self {
            target,
            limits: TravelLimits::none(),
            relative_to_gear_output: true,
        }
    }

    /// Stop before reaching `limit` when turning counter-clockwise.
    pub fn ccw_limit(mut self, limit: Degrees) -> Self {
        self.limits.ccw = Some(limit);
        self
    }

    /// Stop before reaching `limit` when turning clockwise.
    pub fn cw_limit(mut self, limit: Degrees) -> Self {
        self.limits.cw = Some(limit);
        self
    }

    /// Choose whether angles are read at the gear output or the motor shaft.
    pub fn relative_to_gear_output(mut self, relative: bool) -> Self {
        self.relative_to_gear_output = relative;
        self
    }
}

/// Pulse sequence computed for a [`Rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPlan {
    /// Target position in microsteps.
    pub target: i64,
    /// Signed shortest displacement to the target.
    pub displacement: i64,
    /// Direction of travel.
    pub direction: Direction,
    /// Motor cycle size the plan was made for.
    pub cycle: i64,
    /// Counter-clockwise limit in microsteps.
    pub ccw_limit: Option<i64>,
    /// Clockwise limit in microsteps.
    pub cw_limit: Option<i64>,
}

impl RotationPlan {
    /// Number of step pulses to deliver.
    #[inline]
    pub fn pulses(&self) -> u64 {
        self.displacement.unsigned_abs()
    }

    /// Whether the motor is already at the target.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.displacement == 0
    }

    /// Whether the next step from `position` would reach or cross the limit
    /// in the direction of travel.
    ///
    /// A motor already sitting on the limit is blocked too, so it never
    /// steps to the far side.
    pub fn blocks(&self, position: i64) -> bool {
        let limit = match self.direction {
            Direction::Clockwise => self.cw_limit,
            Direction::CounterClockwise => self.ccw_limit,
        };
        let next = wrap(position + self.direction.sign(), self.cycle);
        limit.is_some_and(|limit| limit == position || limit == next)
    }
}

impl MotorModel {
    /// Plan the shortest rotation from the current position.
    ///
    /// Limits not given by the rotation are taken from the motor's own
    /// configured limits.
    pub fn plan(&self, rotation: &Rotation) -> RotationPlan {
        let relative = rotation.relative_to_gear_output;
        let cycle = self.full_cycle();
        let to_msteps = |degrees: Degrees| {
            wrap(self.degrees_to_microsteps(degrees.normalized(), relative), cycle)
        };

        let target = to_msteps(rotation.target);
        let displacement = closest_loop_movement(self.microsteps(), target, cycle);
        let limits = rotation.limits.or(*self.limits());

        RotationPlan {
            target,
            displacement,
            direction: Direction::from_steps(displacement),
            cycle,
            ccw_limit: limits.ccw.map(to_msteps),
            cw_limit: limits.cw.map(to_msteps),
        }
    }
}

impl PinBoard {
    /// Turn a hosted motor to an absolute angle by pulsing its lines.
    ///
    /// Sets the direction line, then for each planned step drives the step
    /// line high and low with the motor's pulse delay after each edge. The
    /// motor must be attached to its step and direction lines.
    ///
    /// Returns `Ok(true)` if every pulse was delivered, `Ok(false)` if the
    /// motor was already at the target or a limit stopped the rotation early.
    /// Blocks for `2 * pulses * pulse_delay`.
    ///
    /// # Errors
    ///
    /// - `UnknownMotor` if the motor is not on this board
    /// - `NotAttached` if the motor does not listen on its step or direction
    ///   line, since it could not follow the pulses
    /// - any error from writing the step or direction line
    pub fn rotate<D: DelayNs>(
        &mut self,
        id: MotorId,
        rotation: &Rotation,
        delay: &mut D,
    ) -> Result<bool> {
        let motor = self.motor(id).ok_or(BoardError::UnknownMotor(id))?;
        let plan = motor.plan(rotation);
        let pins = *motor.pins();
        let pulse_delay_us = motor.pulse_delay_us();

        for line in [pins.step, pins.dir] {
            let attached = self
                .line(line)
                .is_some_and(|l| l.subscribers().contains(&id));
            if !attached {
                return Err(BoardError::NotAttached { motor: id, line }.into());
            }
        }

        if plan.is_empty() {
            debug!(motor = id.index(), "already at target");
            return Ok(false);
        }

        self.write(pins.dir, plan.direction.level())?;
        info!(
            motor = id.index(),
            target = plan.target,
            displacement = plan.displacement,
            "rotation started"
        );

        for delivered in 0..plan.pulses() {
            let position = self
                .motor(id)
                .ok_or(BoardError::UnknownMotor(id))?
                .microsteps();
            if plan.blocks(position) {
                warn!(
                    motor = id.index(),
                    position,
                    delivered,
                    remaining = plan.pulses() - delivered,
                    "rotation stopped at limit"
                );
                return Ok(false);
            }

            self.write(pins.step, Level::High)?;
            delay.delay_us(pulse_delay_us);
            self.write(pins.step, Level::Low)?;
            delay.delay_us(pulse_delay_us);
        }

        info!(motor = id.index(), pulses = plan.pulses(), "rotation complete");
        Ok(true)
    }

    /// Drive a hosted motor's ms1/ms2 lines to select a microstep mode.
    ///
    /// Both lines change together, so attached motors go straight to the new
    /// mode without passing through the mode of a half-written pair.
    ///
    /// # Errors
    ///
    /// Returns `MissingPin` if the motor has no microstep lines bound.
    pub fn set_microstep_mode(&mut self, id: MotorId, mode: MicrostepMode) -> Result<()> {
        let motor = self.motor(id).ok_or(BoardError::UnknownMotor(id))?;
        let (ms1, ms2) = motor
            .pins()
            .microstep()
            .ok_or(MotorError::MissingPin("ms1/ms2"))?;
        let (l1, l2) = mode.levels();
        self.write_together(&[ms1, ms2], &[l1, l2])
    }
}
