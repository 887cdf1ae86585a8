//! The allocator strategy contract and its two implementations.

mod divide_conquer;
mod sort;
mod three_pass;

pub use divide_conquer::DivideConquerAllocator;
pub use three_pass::ThreePassAllocator;

use crate::hold::SeatHold;
use crate::seat::SeatLayout;

/// Capability contract every seat-placement strategy implements. Not
/// thread-safe on its own — the service mutex gates all access.
pub trait SeatAllocator: std::fmt::Debug + Send {
    /// Chooses `n` seats, marks them used, and appends them to `hold` via
    /// `SeatHold::add_range`. The caller has already verified `n` seats
    /// are available; a `false` return means the allocator has a bug.
    fn allocate(&mut self, layout: &SeatLayout, n: i64, hold: &mut SeatHold) -> bool;

    /// Frees every seat currently assigned to `hold`.
    fn release(&mut self, layout: &SeatLayout, hold: &SeatHold);
}
