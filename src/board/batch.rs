//! Single-or-many arguments for batch board operations.
//!
//! Board operations accept a single line with a single value, parallel
//! slices of equal length, or a slice of lines sharing one value.

use crate::error::BoardError;

use super::line::{Level, LineId, LineMode};

/// One value or a borrowed sequence of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Batch<'a, T> {
    /// A single value.
    One(T),
    /// A sequence of values.
    Many(&'a [T]),
}

impl<T: Copy> Batch<'_, T> {
    /// Number of values carried.
    pub fn len(&self) -> usize {
        match self {
            Batch::One(_) => 1,
            Batch::Many(items) => items.len(),
        }
    }

    /// Whether the batch carries no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the values.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (one, many) = match self {
            Batch::One(v) => (Some(*v), &[] as &[T]),
            Batch::Many(items) => (None, *items),
        };
        one.into_iter().chain(many.iter().copied())
    }
}

macro_rules! batch_from {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<$ty> for Batch<'a, $ty> {
                fn from(value: $ty) -> Self {
                    Batch::One(value)
                }
            }

            impl<'a> From<&'a [$ty]> for Batch<'a, $ty> {
                fn from(values: &'a [$ty]) -> Self {
                    Batch::Many(values)
                }
            }

            impl<'a, const N: usize> From<&'a [$ty; N]> for Batch<'a, $ty> {
                fn from(values: &'a [$ty; N]) -> Self {
                    Batch::Many(values)
                }
            }
        )*
    };
}

batch_from!(LineId, Level, LineMode);

/// Line/value pairs produced from two batches with compatible shapes.
#[derive(Debug, Clone)]
pub(crate) struct Pairs<'a, T> {
    lines: Batch<'a, LineId>,
    values: Batch<'a, T>,
    pos: usize,
}

impl<'a, T: Copy> Pairs<'a, T> {
    /// Pair up lines with values.
    ///
    /// A single line takes a single value; many lines take either one shared
    /// value or exactly as many values.
    pub(crate) fn new(lines: Batch<'a, LineId>, values: Batch<'a, T>) -> Result<Self, BoardError> {
        let compatible = match (&lines, &values) {
            (Batch::One(_), Batch::One(_)) => true,
            (Batch::Many(_), Batch::One(_)) => true,
            (Batch::Many(ls), Batch::Many(vs)) => ls.len() == vs.len(),
            (Batch::One(_), Batch::Many(_)) => false,
        };

        if !compatible {
            return Err(BoardError::ArgumentShape {
                lines: lines.len(),
                values: values.len(),
            });
        }

        Ok(Self {
            lines,
            values,
            pos: 0,
        })
    }
}

impl<T: Copy> Iterator for Pairs<'_, T> {
    type Item = (LineId, T);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = match (&self.lines, &self.values) {
            (Batch::One(line), Batch::One(value)) => (self.pos == 0).then_some((*line, *value)),
            (Batch::Many(lines), Batch::One(value)) => lines.get(self.pos).map(|&l| (l, *value)),
            (Batch::Many(lines), Batch::Many(values)) => lines
                .get(self.pos)
                .zip(values.get(self.pos))
                .map(|(&l, &v)| (l, v)),
            (Batch::One(_), Batch::Many(_)) => None,
        };
        self.pos += 1;
        pair
    }
}
