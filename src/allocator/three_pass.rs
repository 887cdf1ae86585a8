//! Front-to-back, three-pass greedy allocator over per-row bitmaps.
//!
//! Space-optimal: `O(C/8)` bytes per row of state, `O(R*C)` time per call.

use bitvec::prelude::*;

use super::SeatAllocator;
use crate::hold::SeatHold;
use crate::seat::SeatLayout;

#[derive(Debug)]
pub struct ThreePassAllocator {
    /// `used[row]` has one bit per column; `true` means occupied.
    used: Vec<BitVec>,
}

impl ThreePassAllocator {
    pub fn new(layout: &SeatLayout) -> Self {
        let used = (0..layout.rows()).map(|_| bitvec![0; layout.columns() as usize]).collect();
        Self { used }
    }

    fn allocate_pass(&mut self, layout: &SeatLayout, min_size: i64, remaining: &mut i64, hold: &mut SeatHold) {
        for row in 0..layout.rows() {
            if *remaining == 0 {
                return;
            }
            let row_bits = &mut self.used[row as usize];
            let columns = layout.columns();
            let mut col = 0i64;
            while col < columns {
                if row_bits[col as usize] {
                    col += 1;
                    continue;
                }
                // Find the extent of this empty run.
                let run_start = col;
                while col < columns && !row_bits[col as usize] {
                    col += 1;
                }
                let run_len = col - run_start;
                if run_len < min_size {
                    continue;
                }

                let whole_multiples = (run_len / min_size) * min_size;
                let take = whole_multiples.min(*remaining);
                if take == 0 {
                    continue;
                }

                let col_lo = run_start;
                let col_hi = run_start + take - 1;
                for c in col_lo..=col_hi {
                    row_bits.set(c as usize, true);
                }
                hold.add_range(layout, row, col_lo, col_hi);
                *remaining -= take;

                if *remaining == 0 {
                    return;
                }
                if *remaining < min_size {
                    // Too few seats left to satisfy this pass's minimum run
                    // size anywhere else on the grid: abort the whole pass
                    // (not just this row) and let the next pass mop up.
                    return;
                }
            }
        }
    }
}

impl SeatAllocator for ThreePassAllocator {
    fn allocate(&mut self, layout: &SeatLayout, n: i64, hold: &mut SeatHold) -> bool {
        let mut remaining = n;
        for &min_size in &[n, 2, 1] {
            if remaining == 0 {
                break;
            }
            if min_size == 0 {
                continue;
            }
            self.allocate_pass(layout, min_size, &mut remaining, hold);
        }
        remaining == 0
    }

    fn release(&mut self, layout: &SeatLayout, hold: &SeatHold) {
        for seat in hold.seats() {
            let _ = layout;
            self.used[seat.row as usize].set(seat.col as usize, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(id: i32) -> SeatHold {
        SeatHold::new(id, "c@example.com".into(), 0, 1_000)
    }

    #[test]
    fn pass_aborts_entirely_once_remaining_drops_below_min_size() {
        // 3x2 grid, seat (0,0) already held. allocate(3) runs pass 2 first
        // (minSize=2): row 0's only empty run is length 1, too short; row 1
        // is a full length-2 run, taken whole, leaving remaining=1. That
        // must abort pass 2 outright rather than keep scanning row 2 (whose
        // length-2 run would otherwise swallow the last seat and split it
        // away from row 0's leftover gap). Pass 3 (minSize=1) then mops up
        // the gap at (0,1).
        let layout = SeatLayout::new(3, 2).unwrap();
        let mut allocator = ThreePassAllocator::new(&layout);

        let mut pre_held = hold(0);
        assert!(allocator.allocate(&layout, 1, &mut pre_held));
        assert_eq!(pre_held.hash_string(), "0:0");

        let mut h = hold(1);
        assert!(allocator.allocate(&layout, 3, &mut h));
        assert_eq!(h.seat_count(), 3);
        assert_eq!(h.hash_string(), "0:1|1:0-1");
    }

    #[test]
    fn never_yields_a_seat_count_different_from_requested() {
        let layout = SeatLayout::new(4, 5).unwrap();
        let mut allocator = ThreePassAllocator::new(&layout);
        for n in 1..=20 {
            let mut h = hold(n as i32);
            if allocator.allocate(&layout, n, &mut h) {
                assert_eq!(h.seat_count() as i64, n);
                allocator.release(&layout, &h);
            }
        }
    }

    #[test]
    fn scenario_1x7_stage() {
        let layout = SeatLayout::new(1, 7).unwrap();
        let mut allocator = ThreePassAllocator::new(&layout);

        let mut h1 = hold(1);
        assert!(allocator.allocate(&layout, 2, &mut h1));
        assert_eq!(h1.hash_string(), "0:0-1");

        let mut h2 = hold(2);
        assert!(allocator.allocate(&layout, 4, &mut h2));
        assert_eq!(h2.hash_string(), "0:2-5");

        allocator.release(&layout, &h1);

        let mut h3 = hold(3);
        assert!(allocator.allocate(&layout, 3, &mut h3));
        assert_eq!(h3.hash_string(), "0:0-1,6");

        allocator.release(&layout, &h3);

        let mut h4 = hold(4);
        assert!(allocator.allocate(&layout, 1, &mut h4));
        assert_eq!(h4.hash_string(), "0:0");

        let mut h5 = hold(5);
        assert!(allocator.allocate(&layout, 2, &mut h5));
        assert_eq!(h5.hash_string(), "0:1,6");
    }

    #[test]
    fn scenario_4x5_stage() {
        let layout = SeatLayout::new(4, 5).unwrap();
        let mut allocator = ThreePassAllocator::new(&layout);

        let mut h1 = hold(1);
        assert!(allocator.allocate(&layout, 4, &mut h1));
        assert_eq!(h1.hash_string(), "0:0-3");

        let mut h2 = hold(2);
        assert!(allocator.allocate(&layout, 3, &mut h2));
        assert_eq!(h2.hash_string(), "1:0-2");

        let mut h3 = hold(3);
        assert!(allocator.allocate(&layout, 5, &mut h3));
        assert_eq!(h3.hash_string(), "2:0-4");

        let mut h4 = hold(4);
        assert!(allocator.allocate(&layout, 4, &mut h4));
        assert_eq!(h4.hash_string(), "3:0-3");

        // The leftover columns each row's request didn't touch (0:4, 1:3-4,
        // 3:4) are still free — a fifth hold for 4 seats mops them up.
        let mut h5 = hold(5);
        assert!(allocator.allocate(&layout, 4, &mut h5));
        assert_eq!(h5.hash_string(), "0:4|1:3-4|3:4");

        // The grid is now completely full. Releasing the three oldest holds
        // (what a real expiration sweep would do) frees rows 0-2, apart
        // from the column h5 already claimed in rows 0 and 1.
        allocator.release(&layout, &h1);
        allocator.release(&layout, &h2);
        allocator.release(&layout, &h3);

        let mut h10 = hold(10);
        assert!(allocator.allocate(&layout, 10, &mut h10));
        assert_eq!(h10.hash_string(), "0:0-3|1:0-1|2:0-3");

        let mut h11 = hold(11);
        assert!(allocator.allocate(&layout, 2, &mut h11));
        assert_eq!(h11.hash_string(), "1:2|2:4");
    }
}
