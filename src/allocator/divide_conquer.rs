//! Per-run-length ordered sets plus a divide-and-conquer recursion with an
//! amortization invariant. Time-optimal: worst case `O(N)`, often
//! sublinear, at the cost of `O(R*C)` words of index state.

use std::collections::{BTreeMap, BTreeSet};

use super::sort::sort_two_value_descending;
use super::SeatAllocator;
use crate::hold::SeatHold;
use crate::seat::SeatLayout;

/// An empty contiguous run `[col_lo, col_hi]` in `row`, ordered by
/// `(rank, row, col_lo)` as spec'd — `col_hi` only breaks ties between
/// otherwise-identical keys, which cannot happen for runs of the same
/// length (same `row`+`col_lo` implies the same `col_hi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RunEntry {
    rank: i64,
    row: i64,
    col_lo: i64,
    col_hi: i64,
}

#[derive(Debug)]
pub struct DivideConquerAllocator {
    rows: i64,
    columns: i64,
    center_row: i64,
    center_col: i64,
    /// `pq[k]` holds every empty run of length exactly `k`, `k` in `1..=columns`.
    pq: Vec<BTreeSet<RunEntry>>,
    /// Per-row empty runs keyed by `col_lo`, for floor/ceiling neighbor lookups on release.
    row_empty: Vec<BTreeMap<i64, i64>>,
}

impl DivideConquerAllocator {
    pub fn new(layout: &SeatLayout) -> Self {
        let rows = layout.rows();
        let columns = layout.columns();
        let center_row = rows / 2;
        let center_col = columns / 2;

        let mut allocator =
            Self { rows, columns, center_row, center_col, pq: (0..=columns).map(|_| BTreeSet::new()).collect(), row_empty: (0..rows).map(|_| BTreeMap::new()).collect() };

        for row in 0..rows {
            allocator.insert_run(row, 0, columns - 1);
        }
        allocator
    }

    /// `d(row, col)`: horizontal distance to center plus an asymmetric
    /// vertical penalty — rows behind center cost double per row.
    fn preference(&self, row: i64, col: i64) -> i64 {
        let horizontal = (col - self.center_col).abs();
        let vertical = if row >= self.center_row { row - self.center_row } else { -2 * (row - self.center_row) };
        horizontal + vertical
    }

    /// Minimum `preference(row, c)` over `c` in `[col_lo, col_hi]`. The
    /// horizontal term is a V centered at `center_col`, so the minimum is
    /// at `center_col` if it's in range, else at the nearer endpoint.
    fn rank_of(&self, row: i64, col_lo: i64, col_hi: i64) -> i64 {
        let min_horizontal = if col_lo <= self.center_col && self.center_col <= col_hi {
            0
        } else if col_hi < self.center_col {
            self.center_col - col_hi
        } else {
            col_lo - self.center_col
        };
        let vertical = if row >= self.center_row { row - self.center_row } else { -2 * (row - self.center_row) };
        min_horizontal + vertical
    }

    fn insert_run(&mut self, row: i64, col_lo: i64, col_hi: i64) {
        let len = (col_hi - col_lo + 1) as usize;
        let rank = self.rank_of(row, col_lo, col_hi);
        self.pq[len].insert(RunEntry { rank, row, col_lo, col_hi });
        self.row_empty[row as usize].insert(col_lo, col_hi);
    }

    fn remove_run(&mut self, row: i64, col_lo: i64, col_hi: i64) {
        let len = (col_hi - col_lo + 1) as usize;
        let rank = self.rank_of(row, col_lo, col_hi);
        self.pq[len].remove(&RunEntry { rank, row, col_lo, col_hi });
        self.row_empty[row as usize].remove(&col_lo);
    }

    /// Finds the best run of length `k` in `[n, min(2n, u)]`, takes its
    /// leftmost `n` seats, and re-indexes whatever's left over.
    fn allocate_range(&mut self, layout: &SeatLayout, n: i64, u: i64, hold: &mut SeatHold) -> bool {
        let k_hi = (2 * n).min(u).min(self.columns);
        if n > k_hi {
            return false;
        }

        let mut best: Option<RunEntry> = None;
        for k in n..=k_hi {
            if let Some(&candidate) = self.pq[k as usize].iter().next() {
                best = Some(match best {
                    Some(current) if current <= candidate => current,
                    _ => candidate,
                });
            }
        }

        let Some(chosen) = best else {
            return false;
        };

        self.remove_run(chosen.row, chosen.col_lo, chosen.col_hi);

        let taken_lo = chosen.col_lo;
        let taken_hi = chosen.col_lo + n - 1;
        if taken_hi < chosen.col_hi {
            self.insert_run(chosen.row, taken_hi + 1, chosen.col_hi);
        }

        hold.add_range(layout, chosen.row, taken_lo, taken_hi);
        true
    }
}

impl SeatAllocator for DivideConquerAllocator {
    fn allocate(&mut self, layout: &SeatLayout, n: i64, hold: &mut SeatHold) -> bool {
        // U bounds the search window [n, min(2n, U)] and only ever shrinks
        // within one allocate() call. It must start at the widest run length
        // that can possibly exist (a full row) rather than at N, or a fresh
        // grid's whole-row runs (length columns > N) are never reachable by
        // any search window once U has been clamped down to N.
        let mut u = self.columns;
        let mut level = vec![n];
        let mut ok = true;

        while !level.is_empty() {
            sort_two_value_descending(&mut level);
            let mut next_level = Vec::new();

            for size in level {
                if self.allocate_range(layout, size, u, hold) {
                    continue;
                }
                u = u.min(size);
                if size <= 1 {
                    // A single seat failing to place means there truly is
                    // no free seat left — a contract violation by the
                    // caller, who must have pre-validated availability.
                    ok = false;
                    continue;
                }
                next_level.push((size + 1) / 2);
                next_level.push(size / 2);
            }

            level = next_level;
        }

        ok
    }

    fn release(&mut self, layout: &SeatLayout, hold: &SeatHold) {
        let _ = layout;

        // Group the hold's seats into maximal same-row contiguous runs;
        // a hold can hold several disjoint runs per row (e.g. "0:2,4").
        let mut runs: Vec<(i64, i64, i64)> = Vec::new();
        for seat in hold.seats() {
            match runs.last_mut() {
                Some((row, _lo, hi)) if *row == seat.row && *hi + 1 == seat.col => *hi = seat.col,
                _ => runs.push((seat.row, seat.col, seat.col)),
            }
        }

        for (row, col_lo, col_hi) in runs {
            let mut merged_lo = col_lo;
            let mut merged_hi = col_hi;

            let left = self.row_empty[row as usize].range(..col_lo).next_back().map(|(&lo, &hi)| (lo, hi));
            if let Some((l_lo, l_hi)) = left {
                if l_hi == col_lo - 1 {
                    self.remove_run(row, l_lo, l_hi);
                    merged_lo = l_lo;
                }
            }

            let right = self.row_empty[row as usize].range(col_hi + 1..).next().map(|(&lo, &hi)| (lo, hi));
            if let Some((r_lo, r_hi)) = right {
                if r_lo == col_hi + 1 {
                    self.remove_run(row, r_lo, r_hi);
                    merged_hi = r_hi;
                }
            }

            self.insert_run(row, merged_lo, merged_hi);
        }
    }
}
