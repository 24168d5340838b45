//! Thread-safe board handle and embedded-hal adapters (std only).

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::error::{BoardError, Error, Result};
use crate::motor::Rotation;

use super::{Level, LineId, MotorId, PinBoard};

/// A [`PinBoard`] shared between threads.
///
/// Each operation holds the lock for the whole write-and-broadcast, so no
/// motor ever observes a torn board state.
#[derive(Debug, Clone, Default)]
pub struct SharedBoard {
    inner: Arc<Mutex<PinBoard>>,
}

impl SharedBoard {
    /// Wrap a board for sharing.
    pub fn new(board: PinBoard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(board)),
        }
    }

    /// Lock the board for a sequence of operations.
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if another thread panicked while holding it.
    pub fn lock(&self) -> Result<MutexGuard<'_, PinBoard>> {
        self.inner
            .lock()
            .map_err(|_| Error::Board(BoardError::LockPoisoned))
    }

    /// Run `f` with exclusive access to the board.
    pub fn with<T>(&self, f: impl FnOnce(&mut PinBoard) -> Result<T>) -> Result<T> {
        let mut board = self.lock()?;
        f(&mut board)
    }

    /// An embedded-hal output pin driving one line of this board.
    pub fn pin(&self, line: LineId) -> BoardPin {
        BoardPin {
            board: self.clone(),
            line,
        }
    }

    /// Rotate a hosted motor, holding the lock for the whole rotation.
    pub fn rotate<D: DelayNs>(&self, id: MotorId, rotation: &Rotation, delay: &mut D) -> Result<bool> {
        self.with(|board| board.rotate(id, rotation, delay))
    }
}

/// One board line seen as an embedded-hal output pin.
///
/// Lets any embedded-hal stepper driver pulse the simulated board; attached
/// motors interpret those writes exactly like writes made through
/// [`PinBoard::write`].
#[derive(Debug, Clone)]
pub struct BoardPin {
    board: SharedBoard,
    line: LineId,
}

impl BoardPin {
    /// Line this pin drives.
    #[inline]
    pub fn line(&self) -> LineId {
        self.line
    }

    fn set(&mut self, level: Level) -> Result<()> {
        self.board.with(|board| board.write(self.line, level))
    }

    fn get(&self) -> Result<Level> {
        self.board.with(|board| board.level(self.line))
    }
}

impl ErrorType for BoardPin {
    type Error = Error;
}

impl OutputPin for BoardPin {
    fn set_low(&mut self) -> Result<()> {
        self.set(Level::Low)
    }

    fn set_high(&mut self) -> Result<()> {
        self.set(Level::High)
    }
}

impl StatefulOutputPin for BoardPin {
    fn is_set_high(&mut self) -> Result<bool> {
        Ok(self.get()?.is_high())
    }

    fn is_set_low(&mut self) -> Result<bool> {
        Ok(self.get()?.is_low())
    }
}

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LineMode;
    use crate::config::units::Degrees;
    use crate::motor::MotorModel;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    const STEP: LineId = LineId(17);
    const DIR: LineId = LineId(27);

    fn shared() -> (SharedBoard, MotorId) {
        let mut board = PinBoard::new();
        board.register_line(STEP).unwrap();
        board.register_line(DIR).unwrap();
        board.set_mode(&[STEP, DIR], LineMode::Output).unwrap();
        let motor = MotorModel::builder()
            .step_pin(STEP)
            .dir_pin(DIR)
            .steps_per_revolution(200)
            .build()
            .unwrap();
        let id = board.add_motor(motor).unwrap();
        board.attach(id, &[STEP, DIR]).unwrap();
        (SharedBoard::new(board), id)
    }

    #[test]
    fn test_output_pin_steps_motor() {
        let (board, id) = shared();
        let mut step = board.pin(STEP);
        let mut dir = board.pin(DIR);

        dir.set_high().unwrap();
        step.set_high().unwrap();
        assert!(step.is_set_high().unwrap());
        step.set_low().unwrap();

        let position = board.with(|b| Ok(b.motor(id).unwrap().microsteps())).unwrap();
        assert_eq!(position, 199);
    }

    #[test]
    fn test_pin_on_unset_line_errors() {
        let (board, _) = shared();
        board.with(|b| {
            b.release(STEP);
            Ok(())
        })
        .unwrap();

        let mut step = board.pin(STEP);
        assert!(step.set_high().is_err());
    }

    #[test]
    fn test_rotate_across_threads() {
        let (board, id) = shared();
        let worker = board.clone();
        std::thread::spawn(move || {
            worker
                .rotate(id, &Rotation::to(Degrees(90.0)), &mut NoopDelay::new())
                .unwrap()
        })
        .join()
        .unwrap();

        let position = board.with(|b| Ok(b.motor(id).unwrap().microsteps())).unwrap();
        assert_eq!(position, 50);
    }
}
