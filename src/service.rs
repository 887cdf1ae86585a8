//! The ticket service core: drives the allocator, maintains the
//! insertion-ordered hold registry, runs lazy expiration, and derives
//! hold identifiers and confirmation codes.

use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;
use rand::Rng;

use crate::allocator::SeatAllocator;
use crate::clock::Clock;
use crate::error::{EngineError, Result};
use crate::hold::{HoldId, SeatHold};
use crate::identifier::{derive_hold_id, encode_confirmation};
use crate::seat::SeatLayout;

/// Called (outside the service mutex's reach, but from inside the lock
/// critical section — it must not block) whenever the expiration sweep
/// releases a hold.
pub type ExpirationObserver = Box<dyn Fn(&SeatHold) + Send + Sync>;

/// Construction-time configuration: the grid shape, hold duration, an
/// optional expiration observer, and the allocator strategy. There is no
/// file or environment-driven config layer — these are exactly the
/// parameters spec'd as "configuration" for this engine.
pub struct ServiceConfig {
    pub rows: i64,
    pub columns: i64,
    pub hold_duration: Duration,
    pub allocator: Box<dyn SeatAllocator>,
    pub clock: Box<dyn Clock>,
    pub expiration_observer: Option<ExpirationObserver>,
}

struct ServiceState {
    layout: SeatLayout,
    hold_duration_millis: i64,
    allocator: Box<dyn SeatAllocator>,
    clock: Box<dyn Clock>,
    expiration_observer: Option<ExpirationObserver>,
    /// Insertion-ordered, so the front is always the oldest (and, since
    /// expiry = creation + a fixed duration and creation times are
    /// non-decreasing, also the soonest to expire).
    holds: IndexMap<HoldId, SeatHold>,
    available: i64,
    id_salt: u64,
}

/// A single-venue ticket-reservation engine over an R x C seat grid.
///
/// All public operations serialize on one mutex for their entire
/// duration, except the pure confirmation-code computation in `reserve`,
/// which runs after the lock is released.
pub struct TicketService {
    state: Mutex<ServiceState>,
}

impl TicketService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let layout = SeatLayout::new(config.rows, config.columns)?;
        let capacity = layout.capacity();
        let id_salt = rand::rng().random();

        Ok(Self {
            state: Mutex::new(ServiceState {
                layout,
                hold_duration_millis: config.hold_duration.as_millis() as i64,
                allocator: config.allocator,
                clock: config.clock,
                expiration_observer: config.expiration_observer,
                holds: IndexMap::new(),
                available: capacity,
                id_salt,
            }),
        })
    }

    /// Runs the expiration sweep and returns the number of unheld, unreserved seats.
    pub fn num_available(&self) -> i64 {
        let mut state = self.state.lock().expect("TicketService mutex poisoned");
        Self::expire(&mut state);
        state.available
    }

    /// Finds and holds `n` seats for `customer_email`, or returns `None`
    /// if fewer than `n` seats are currently available.
    pub fn find_and_hold(&self, n: i64, customer_email: &str) -> Result<Option<SeatHold>> {
        if customer_email.is_empty() {
            return Err(EngineError::NullArgument { field: "email" });
        }

        let mut state = self.state.lock().expect("TicketService mutex poisoned");
        let capacity = state.layout.capacity();
        if n < 1 || n > capacity {
            return Err(EngineError::BadArgument { requested: n, capacity });
        }

        Self::expire(&mut state);

        if n > state.available {
            return Ok(None);
        }

        let id = Self::fresh_hold_id(&mut state, customer_email);
        let now = state.clock.now_millis();
        let mut hold = SeatHold::new(id, customer_email.to_string(), now, now + state.hold_duration_millis);

        let layout = state.layout;
        let placed = state.allocator.allocate(&layout, n, &mut hold);
        assert!(placed, "allocator failed to place {n} seats after the service validated availability");
        debug_assert_eq!(hold.seat_count() as i64, n);

        state.available -= n;
        log::info!("hold {} created: {} seats for a customer", id, n);
        state.holds.insert(id, hold.clone());

        Ok(Some(hold))
    }

    /// Permanently commits `hold_id` to `customer_email`, returning a
    /// confirmation code. Returns `None` for not-found, email mismatch,
    /// or already-expired alike — the reason is never disclosed.
    pub fn reserve(&self, hold_id: HoldId, customer_email: &str) -> Result<Option<String>> {
        if customer_email.is_empty() {
            return Err(EngineError::NullArgument { field: "email" });
        }

        let confirmed_id = {
            let mut state = self.state.lock().expect("TicketService mutex poisoned");
            Self::expire(&mut state);

            match state.holds.get(&hold_id) {
                Some(hold) if hold.customer_email() == customer_email => {
                    state.holds.shift_remove(&hold_id);
                    log::info!("hold {} reserved", hold_id);
                    Some(hold_id)
                }
                _ => None,
            }
        };

        Ok(confirmed_id.map(encode_confirmation))
    }

    /// Walks the insertion-ordered front of the registry while it's
    /// expired, releasing seats and notifying the observer. Stops at the
    /// first live hold — the ordering invariant guarantees nothing after
    /// it can be expired yet.
    fn expire(state: &mut ServiceState) {
        let now = state.clock.now_millis();
        loop {
            let Some((&id, hold)) = state.holds.first() else { break };
            if !hold.is_expired(now) {
                break;
            }

            let (_, hold) = state.holds.shift_remove_index(0).expect("front entry vanished mid-sweep");
            let layout = state.layout;
            state.allocator.release(&layout, &hold);
            state.available += hold.seat_count() as i64;
            log::info!("hold {} expired: {} seats released", id, hold.seat_count());

            if let Some(observer) = &state.expiration_observer {
                observer(&hold);
            }

            let _ = id;
        }
    }

    /// Derives a hold identifier via SHA-1 folding over (email, salt,
    /// now), retrying with an incremented millisecond value on collision
    /// with a live hold. Expected collision probability is ~2^-32 per
    /// attempt, so this is O(1) amortized.
    fn fresh_hold_id(state: &mut ServiceState, customer_email: &str) -> HoldId {
        let mut millis = state.clock.now_millis();
        loop {
            let candidate = derive_hold_id(customer_email, state.id_salt, millis);
            if !state.holds.contains_key(&candidate) {
                return candidate;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::ThreePassAllocator;
    use crate::clock::MockClock;

    fn service(rows: i64, columns: i64, hold_secs: u64) -> (TicketService, MockClock) {
        let clock = MockClock::new(0);
        let layout = SeatLayout::new(rows, columns).unwrap();
        let config = ServiceConfig {
            rows,
            columns,
            hold_duration: Duration::from_secs(hold_secs),
            allocator: Box::new(ThreePassAllocator::new(&layout)),
            clock: Box::new(clock.clone()),
            expiration_observer: None,
        };
        (TicketService::new(config).unwrap(), clock)
    }

    #[test]
    fn rejects_out_of_range_seat_counts() {
        let (svc, _clock) = service(2, 3, 10);
        assert!(matches!(svc.find_and_hold(0, "a@example.com"), Err(EngineError::BadArgument { .. })));
        assert!(matches!(svc.find_and_hold(7, "a@example.com"), Err(EngineError::BadArgument { .. })));
    }

    #[test]
    fn rejects_empty_email() {
        let (svc, _clock) = service(2, 3, 10);
        assert!(matches!(svc.find_and_hold(1, ""), Err(EngineError::NullArgument { .. })));
        assert!(matches!(svc.reserve(1, ""), Err(EngineError::NullArgument { .. })));
    }

    #[test]
    fn out_of_capacity_is_none_not_an_error() {
        let (svc, _clock) = service(1, 2, 10);
        assert!(svc.find_and_hold(2, "a@example.com").unwrap().is_some());
        assert!(svc.find_and_hold(1, "b@example.com").unwrap().is_none());
    }

    #[test]
    fn reserve_then_expire_does_not_return_seats() {
        let (svc, clock) = service(1, 2, 10);
        let hold = svc.find_and_hold(2, "a@example.com").unwrap().unwrap();
        let code = svc.reserve(hold.id(), "a@example.com").unwrap();
        assert!(code.is_some());

        clock.advance(20_000);
        assert_eq!(svc.num_available(), 2);
    }

    #[test]
    fn scenario_1x7_stage_10s_expiration() {
        let (svc, clock) = service(1, 7, 10);

        let h1 = svc.find_and_hold(2, "alice@example.com").unwrap().unwrap();
        assert_eq!(h1.hash_string(), "0:0-1");

        let h2 = svc.find_and_hold(4, "bob@example.com").unwrap().unwrap();
        assert_eq!(h2.hash_string(), "0:2-5");
        assert!(svc.reserve(h2.id(), "bob@example.com").unwrap().is_some());

        clock.advance(11_000);
        let h3 = svc.find_and_hold(3, "carol@example.com").unwrap().unwrap();
        assert_eq!(h3.hash_string(), "0:0-1,6");

        clock.advance(11_000);
        let h4 = svc.find_and_hold(1, "dave@example.com").unwrap().unwrap();
        assert_eq!(h4.hash_string(), "0:0");

        let h5 = svc.find_and_hold(2, "erin@example.com").unwrap().unwrap();
        assert_eq!(h5.hash_string(), "0:1,6");
    }

    #[test]
    fn numbers_available_always_complements_live_holds() {
        let (svc, clock) = service(3, 4, 5);
        let capacity = 12;

        let h1 = svc.find_and_hold(5, "a@example.com").unwrap().unwrap();
        assert_eq!(svc.num_available(), capacity - 5);

        clock.advance(1_000);
        let h2 = svc.find_and_hold(3, "b@example.com").unwrap().unwrap();
        assert_eq!(svc.num_available(), capacity - 8);

        svc.reserve(h1.id(), "a@example.com").unwrap();
        assert_eq!(svc.num_available(), capacity - 8);

        clock.advance(6_000);
        assert_eq!(svc.num_available(), capacity - 5);

        let _ = h2;
    }

    #[test]
    fn identifiers_stay_unique_across_live_holds() {
        let (svc, _clock) = service(10, 10, 30);
        let mut ids = std::collections::HashSet::new();
        for i in 0..20 {
            let email = format!("user{i}@example.com");
            let hold = svc.find_and_hold(1, &email).unwrap().unwrap();
            assert!(ids.insert(hold.id()), "duplicate hold id {}", hold.id());
        }
    }
}
