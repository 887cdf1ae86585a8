//! The seat-hold value aggregate and its debugging hash-string rendering.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::seat::{Seat, SeatLayout};

pub type HoldId = i32;

/// A time-limited, not-yet-committed claim on a set of seats by a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatHold {
    id: HoldId,
    seats: BTreeSet<Seat>,
    customer_email: String,
    created_at_millis: i64,
    expires_at_millis: i64,
}

impl SeatHold {
    pub(crate) fn new(id: HoldId, customer_email: String, created_at_millis: i64, expires_at_millis: i64) -> Self {
        Self { id, seats: BTreeSet::new(), customer_email, created_at_millis, expires_at_millis }
    }

    pub fn id(&self) -> HoldId {
        self.id
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn created_at_millis(&self) -> i64 {
        self.created_at_millis
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at_millis
    }

    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at_millis <= now_millis
    }

    /// Inserts seats `[col_lo, col_hi]` (inclusive) of `row` into this hold.
    pub(crate) fn add_range(&mut self, layout: &SeatLayout, row: i64, col_lo: i64, col_hi: i64) {
        for col in col_lo..=col_hi {
            let seat = Seat::new(row, col);
            debug_assert!(layout.check_in_bounds(seat).is_ok(), "add_range produced an out-of-bounds seat");
            self.seats.insert(seat);
        }
    }

    /// Renders seats as `row1:colA-colB,colC|row2:colD-colE`: contiguous
    /// columns in a row collapse into `lo-hi` ranges, non-contiguous
    /// columns in the same row are comma-joined, and rows are pipe-joined.
    pub fn hash_string(&self) -> String {
        let mut rows: Vec<(i64, Vec<i64>)> = Vec::new();
        for seat in &self.seats {
            match rows.last_mut() {
                Some((row, cols)) if *row == seat.row => cols.push(seat.col),
                _ => rows.push((seat.row, vec![seat.col])),
            }
        }

        let mut out = String::new();
        for (i, (row, cols)) in rows.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            write!(out, "{}:", row).unwrap();

            let mut run_start = cols[0];
            let mut run_end = cols[0];
            let mut first_run = true;
            for &col in &cols[1..] {
                if col == run_end + 1 {
                    run_end = col;
                    continue;
                }
                Self::push_run(&mut out, run_start, run_end, &mut first_run);
                run_start = col;
                run_end = col;
            }
            Self::push_run(&mut out, run_start, run_end, &mut first_run);
        }
        out
    }

    fn push_run(out: &mut String, lo: i64, hi: i64, first_run: &mut bool) {
        if !*first_run {
            out.push(',');
        }
        *first_run = false;
        if lo == hi {
            write!(out, "{}", lo).unwrap();
        } else {
            write!(out, "{}-{}", lo, hi).unwrap();
        }
    }
}
