//! The pin board: line registry, validation and motor notification.

use heapless::FnvIndexMap;
use tracing::{debug, trace};

use crate::error::{BoardError, ModeFault, Result};
use crate::motor::MotorModel;

use super::batch::{Batch, Pairs};
use super::line::{Level, Line, LineId, LineMode};
use super::{MAX_LINES, MAX_MOTORS};

type LineMap = FnvIndexMap<LineId, Line, MAX_LINES>;

/// Handle to a motor model hosted by a [`PinBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorId(u8);

impl MotorId {
    /// Position of the motor on its board.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only view of every line level at one instant.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    lines: &'a LineMap,
}

impl<'a> Snapshot<'a> {
    /// Level of a line, `None` if it is not registered.
    #[inline]
    pub fn level(&self, line: LineId) -> Option<Level> {
        self.lines.get(&line).map(|l| l.level)
    }

    /// Iterate over `(line, level)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, Level)> + 'a {
        self.lines.iter().map(|(id, line)| (*id, line.level))
    }

    /// Number of lines in the snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the snapshot holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl core::fmt::Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Simulated board of digital output lines.
///
/// Owns the line map, the line-to-motor subscriptions and the motor models
/// themselves. Every successful write broadcasts a [`Snapshot`] to the motors
/// attached to the written line.
#[derive(Debug, Default)]
pub struct PinBoard {
    lines: LineMap,
    motors: heapless::Vec<MotorModel, MAX_MOTORS>,
}

impl PinBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a line with unset mode and low level.
    ///
    /// Registering an existing line is a no-op; its current state is kept.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the board already holds `MAX_LINES` lines.
    pub fn register_line(&mut self, line: LineId) -> Result<()> {
        if self.lines.contains_key(&line) {
            return Ok(());
        }
        self.lines
            .insert(line, Line::default())
            .map_err(|_| BoardError::CapacityExceeded)?;
        debug!(line = line.value(), "registered line");
        Ok(())
    }

    /// Whether a line is registered.
    #[inline]
    pub fn contains(&self, line: LineId) -> bool {
        self.lines.contains_key(&line)
    }

    /// Get a registered line.
    #[inline]
    pub fn line(&self, line: LineId) -> Option<&Line> {
        self.lines.get(&line)
    }

    /// Iterate over registered lines in registration order.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    /// Current mode of a line, `Ok(None)` if unset.
    pub fn mode(&self, line: LineId) -> Result<Option<LineMode>> {
        Ok(self.get(line)?.mode)
    }

    /// Current level of a line.
    pub fn level(&self, line: LineId) -> Result<Level> {
        Ok(self.get(line)?.level)
    }

    /// Set the mode of one or more lines.
    ///
    /// # Errors
    ///
    /// - `ArgumentShape` if the batches do not pair up
    /// - `UnknownLine` if any line is unregistered
    /// - `InvalidMode` if any mode is `Input`
    ///
    /// Nothing is changed unless every pair is valid.
    pub fn set_mode<'a>(
        &mut self,
        lines: impl Into<Batch<'a, LineId>>,
        modes: impl Into<Batch<'a, LineMode>>,
    ) -> Result<()> {
        let pairs = Pairs::new(lines.into(), modes.into())?;

        for (line, mode) in pairs.clone() {
            self.get(line)?;
            if mode == LineMode::Input {
                return Err(BoardError::InvalidMode {
                    line,
                    fault: ModeFault::InputUnsupported,
                }
                .into());
            }
        }

        for (line, mode) in pairs {
            if let Some(entry) = self.lines.get_mut(&line) {
                entry.mode = Some(mode);
                debug!(line = line.value(), %mode, "set line mode");
            }
        }
        Ok(())
    }

    /// Drive one or more lines to the given levels.
    ///
    /// Lines are set in order; after each one, every motor attached to it
    /// observes the full board state.
    ///
    /// # Errors
    ///
    /// - `ArgumentShape` if the batches do not pair up
    /// - `UnknownLine` if any line is unregistered
    /// - `InvalidMode` if any line's mode was never set
    pub fn write<'a>(
        &mut self,
        lines: impl Into<Batch<'a, LineId>>,
        levels: impl Into<Batch<'a, Level>>,
    ) -> Result<()> {
        let pairs = Pairs::new(lines.into(), levels.into())?;

        for (line, _) in pairs.clone() {
            self.check_writable(line)?;
        }

        for (line, level) in pairs {
            self.drive(line, level)?;
        }
        Ok(())
    }

    /// Drive several lines at once.
    ///
    /// Like [`write`](Self::write), but every level is set before any motor
    /// is notified, and each motor attached to any of the lines observes the
    /// final state exactly once. Use it for lines a driver latches together,
    /// such as the microstep selects.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn write_together<'a>(
        &mut self,
        lines: impl Into<Batch<'a, LineId>>,
        levels: impl Into<Batch<'a, Level>>,
    ) -> Result<()> {
        let pairs = Pairs::new(lines.into(), levels.into())?;

        for (line, _) in pairs.clone() {
            self.check_writable(line)?;
        }

        let mut motors: heapless::Vec<MotorId, MAX_MOTORS> = heapless::Vec::new();
        for (line, level) in pairs {
            if let Some(entry) = self.lines.get_mut(&line) {
                entry.level = level;
                trace!(line = line.value(), %level, "wrote line");
                for id in entry.subscribers.iter() {
                    if !motors.contains(id) {
                        // At most one entry per hosted motor.
                        let _ = motors.push(*id);
                    }
                }
            }
        }
        self.notify(&motors)
    }

    /// Reset lines to unset mode and low level.
    ///
    /// Unknown lines are skipped. Attached motors are not notified.
    pub fn release<'a>(&mut self, lines: impl Into<Batch<'a, LineId>>) {
        for line in lines.into().iter() {
            match self.lines.get_mut(&line) {
                Some(entry) => {
                    entry.release();
                    debug!(line = line.value(), "released line");
                }
                None => debug!(line = line.value(), "skipped release of unknown line"),
            }
        }
    }

    /// Reset every registered line to unset mode and low level.
    pub fn release_all(&mut self) {
        for (id, entry) in self.lines.iter_mut() {
            entry.release();
            debug!(line = id.value(), "released line");
        }
    }

    /// Move a motor model onto the board.
    ///
    /// The motor is not notified of anything until it is [attached](Self::attach)
    /// to lines.
    ///
    /// # Errors
    ///
    /// - `UnknownLine` if any of the motor's bound lines is unregistered
    /// - `CapacityExceeded` if the board already hosts `MAX_MOTORS` motors
    pub fn add_motor(&mut self, motor: MotorModel) -> Result<MotorId> {
        for line in motor.pins().iter() {
            self.get(line)?;
        }

        let id = MotorId(self.motors.len() as u8);
        self.motors
            .push(motor)
            .map_err(|_| BoardError::CapacityExceeded)?;
        debug!(motor = id.index(), "added motor");
        Ok(id)
    }

    /// Get a hosted motor model.
    #[inline]
    pub fn motor(&self, id: MotorId) -> Option<&MotorModel> {
        self.motors.get(id.index())
    }

    /// Iterate over hosted motors.
    pub fn motors(&self) -> impl Iterator<Item = (MotorId, &MotorModel)> {
        self.motors
            .iter()
            .enumerate()
            .map(|(i, m)| (MotorId(i as u8), m))
    }

    /// Subscribe a motor to writes on one or more lines.
    ///
    /// Attaching a motor to a line it already listens on is a no-op.
    ///
    /// # Errors
    ///
    /// - `UnknownMotor` if the handle is not from this board
    /// - `UnknownLine` if any line is unregistered
    pub fn attach<'a>(&mut self, motor: MotorId, lines: impl Into<Batch<'a, LineId>>) -> Result<()> {
        if self.motor(motor).is_none() {
            return Err(BoardError::UnknownMotor(motor).into());
        }

        let lines = lines.into();
        for line in lines.iter() {
            self.get(line)?;
        }

        for line in lines.iter() {
            if let Some(entry) = self.lines.get_mut(&line) {
                if entry.subscribers.contains(&motor) {
                    debug!(motor = motor.index(), line = line.value(), "motor already attached");
                    continue;
                }
                // One slot per hosted motor, so this cannot overflow.
                let _ = entry.subscribers.push(motor);
                debug!(motor = motor.index(), line = line.value(), "attached motor");
            }
        }
        Ok(())
    }

    /// Current level of every line.
    #[inline]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { lines: &self.lines }
    }

    fn get(&self, line: LineId) -> Result<&Line> {
        self.lines
            .get(&line)
            .ok_or_else(|| BoardError::UnknownLine(line).into())
    }

    fn check_writable(&self, line: LineId) -> Result<()> {
        match self.get(line)?.mode {
            Some(LineMode::Output) => Ok(()),
            Some(LineMode::Input) => Err(BoardError::InvalidMode {
                line,
                fault: ModeFault::InputUnsupported,
            }
            .into()),
            None => Err(BoardError::InvalidMode {
                line,
                fault: ModeFault::Uninitialized,
            }
            .into()),
        }
    }

    fn drive(&mut self, line: LineId, level: Level) -> Result<()> {
        let Some(entry) = self.lines.get_mut(&line) else {
            return Err(BoardError::UnknownLine(line).into());
        };
        entry.level = level;
        trace!(line = line.value(), %level, "wrote line");

        let subscribers = entry.subscribers.clone();
        self.notify(&subscribers)
    }

    fn notify(&mut self, motors: &[MotorId]) -> Result<()> {
        let snapshot = Snapshot { lines: &self.lines };
        for id in motors {
            if let Some(motor) = self.motors.get_mut(id.index()) {
                motor.observe(&snapshot)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const STEP: LineId = LineId(17);
    const DIR: LineId = LineId(27);

    fn board_with(lines: &[LineId]) -> PinBoard {
        let mut board = PinBoard::new();
        for &line in lines {
            board.register_line(line).unwrap();
        }
        board
    }

    fn motor() -> MotorModel {
        MotorModel::builder()
            .step_pin(STEP)
            .dir_pin(DIR)
            .steps_per_revolution(200)
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_defaults() {
        let board = board_with(&[STEP]);
        assert_eq!(board.mode(STEP).unwrap(), None);
        assert_eq!(board.level(STEP).unwrap(), Level::Low);
    }

    #[test]
    fn test_reregister_keeps_level() {
        let mut board = board_with(&[STEP]);
        board.set_mode(STEP, LineMode::Output).unwrap();
        board.write(STEP, Level::High).unwrap();
        board.register_line(STEP).unwrap();
        assert_eq!(board.level(STEP).unwrap(), Level::High);
        assert_eq!(board.mode(STEP).unwrap(), Some(LineMode::Output));
    }

    #[test]
    fn test_input_mode_rejected() {
        let mut board = board_with(&[STEP]);
        let err = board.set_mode(STEP, LineMode::Input).unwrap_err();
        assert_eq!(
            err,
            Error::Board(BoardError::InvalidMode {
                line: STEP,
                fault: ModeFault::InputUnsupported
            })
        );
        assert_eq!(board.mode(STEP).unwrap(), None);
    }

    #[test]
    fn test_set_mode_validates_before_mutating() {
        let mut board = board_with(&[STEP]);
        let err = board
            .set_mode(&[STEP, LineId(99)], LineMode::Output)
            .unwrap_err();
        assert_eq!(err, Error::Board(BoardError::UnknownLine(LineId(99))));
        assert_eq!(board.mode(STEP).unwrap(), None);
    }

    #[test]
    fn test_set_mode_parallel_lengths() {
        let mut board = board_with(&[STEP, DIR]);
        let err = board
            .set_mode(&[STEP, DIR], &[LineMode::Output])
            .unwrap_err();
        assert!(matches!(err, Error::Board(BoardError::ArgumentShape { .. })));

        board
            .set_mode(&[STEP, DIR], &[LineMode::Output, LineMode::Output])
            .unwrap();
        assert_eq!(board.mode(DIR).unwrap(), Some(LineMode::Output));
    }

    #[test]
    fn test_write_requires_mode() {
        let mut board = board_with(&[STEP]);
        let err = board.write(STEP, Level::High).unwrap_err();
        assert_eq!(
            err,
            Error::Board(BoardError::InvalidMode {
                line: STEP,
                fault: ModeFault::Uninitialized
            })
        );
    }

    #[test]
    fn test_write_unknown_line() {
        let mut board = board_with(&[STEP]);
        board.set_mode(STEP, LineMode::Output).unwrap();
        let err = board.write(&[STEP, DIR], Level::High).unwrap_err();
        assert_eq!(err, Error::Board(BoardError::UnknownLine(DIR)));
        assert_eq!(board.level(STEP).unwrap(), Level::Low);
    }

    #[test]
    fn test_release_clears_mode_and_level() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(&[STEP, DIR], LineMode::Output).unwrap();
        board.write(&[STEP, DIR], Level::High).unwrap();

        board.release(&[STEP, LineId(99)]);
        assert_eq!(board.mode(STEP).unwrap(), None);
        assert_eq!(board.level(STEP).unwrap(), Level::Low);
        assert_eq!(board.level(DIR).unwrap(), Level::High);

        board.release_all();
        assert_eq!(board.mode(DIR).unwrap(), None);
        assert!(board.write(DIR, Level::High).is_err());
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut board = board_with(&[STEP, DIR]);
        let id = board.add_motor(motor()).unwrap();
        board.attach(id, STEP).unwrap();
        board.attach(id, &[STEP, DIR]).unwrap();
        assert_eq!(board.line(STEP).unwrap().subscribers(), &[id]);
        assert_eq!(board.line(DIR).unwrap().subscribers(), &[id]);
    }

    #[test]
    fn test_attach_unknown_line() {
        let mut board = board_with(&[STEP, DIR]);
        let id = board.add_motor(motor()).unwrap();
        let err = board.attach(id, &[STEP, LineId(5)]).unwrap_err();
        assert_eq!(err, Error::Board(BoardError::UnknownLine(LineId(5))));
        assert!(board.line(STEP).unwrap().subscribers().is_empty());
    }

    #[test]
    fn test_add_motor_requires_registered_pins() {
        let mut board = board_with(&[STEP]);
        let err = board.add_motor(motor()).unwrap_err();
        assert_eq!(err, Error::Board(BoardError::UnknownLine(DIR)));
    }

    #[test]
    fn test_write_broadcasts_to_attached_motor() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(&[STEP, DIR], LineMode::Output).unwrap();
        let id = board.add_motor(motor()).unwrap();
        board.attach(id, STEP).unwrap();

        board.write(STEP, Level::High).unwrap();
        board.write(STEP, Level::Low).unwrap();
        assert_eq!(board.motor(id).unwrap().microsteps(), 1);
    }

    #[test]
    fn test_unattached_motor_ignores_writes() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(&[STEP, DIR], LineMode::Output).unwrap();
        let id = board.add_motor(motor()).unwrap();

        board.write(STEP, Level::High).unwrap();
        assert_eq!(board.motor(id).unwrap().microsteps(), 0);
    }

    #[test]
    fn test_snapshot_levels() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(DIR, LineMode::Output).unwrap();
        board.write(DIR, Level::High).unwrap();

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.level(DIR), Some(Level::High));
        assert_eq!(snapshot.level(STEP), Some(Level::Low));
        assert_eq!(snapshot.level(LineId(1)), None);
    }

    #[test]
    fn test_write_together_notifies_final_state() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(&[STEP, DIR], LineMode::Output).unwrap();
        let id = board.add_motor(motor()).unwrap();
        board.attach(id, &[STEP, DIR]).unwrap();

        // Line by line the step would land before the direction change.
        board.write_together(&[STEP, DIR], Level::High).unwrap();

        let motor = board.motor(id).unwrap();
        assert_eq!(motor.direction(), crate::motor::Direction::CounterClockwise);
        assert_eq!(motor.microsteps(), 199);
    }

    #[test]
    fn test_write_together_validates_first() {
        let mut board = board_with(&[STEP, DIR]);
        board.set_mode(STEP, LineMode::Output).unwrap();

        let err = board
            .write_together(&[STEP, DIR], Level::High)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Board(BoardError::InvalidMode {
                line: DIR,
                fault: ModeFault::Uninitialized,
            })
        );
        assert_eq!(board.level(STEP).unwrap(), Level::Low);
    }
}
