//! The venue's seat grid and the seats that live on it.

use crate::error::{EngineError, Result};

/// A single seat, identified by its (row, column) coordinates.
///
/// Ordered by `(row, column)`; two seats are adjacent iff they share a row
/// and their columns differ by exactly 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seat {
    pub row: i64,
    pub col: i64,
}

impl Seat {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    pub fn is_adjacent_to(&self, other: &Seat) -> bool {
        self.row == other.row && (self.col - other.col).abs() == 1
    }
}

/// Immutable R x C grid definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    rows: i64,
    columns: i64,
}

impl SeatLayout {
    pub fn new(rows: i64, columns: i64) -> Result<Self> {
        if rows < 1 || columns < 1 {
            return Err(EngineError::BadLayout { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> i64 {
        self.rows
    }

    pub fn columns(&self) -> i64 {
        self.columns
    }

    pub fn capacity(&self) -> i64 {
        self.rows * self.columns
    }

    /// Maps a linear index `i in [0, R*C)` to the seat `(i / C, i % C)`.
    pub fn seat_for_index(&self, index: i64) -> Result<Seat> {
        if index < 0 || index >= self.capacity() {
            return Err(EngineError::BadArgument { requested: index, capacity: self.capacity() });
        }
        Ok(Seat::new(index / self.columns, index % self.columns))
    }

    /// Maps a seat back to its linear index, failing if out of bounds.
    pub fn index_for_seat(&self, seat: Seat) -> Result<i64> {
        self.check_in_bounds(seat)?;
        Ok(seat.row * self.columns + seat.col)
    }

    pub fn check_in_bounds(&self, seat: Seat) -> Result<()> {
        if seat.row < 0 || seat.row >= self.rows || seat.col < 0 || seat.col >= self.columns {
            return Err(EngineError::BadArgument { requested: seat.col, capacity: self.columns });
        }
        Ok(())
    }
}
