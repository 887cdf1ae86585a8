//! A single-venue ticket-reservation engine: a fixed rows x columns seat
//! grid, time-limited holds, and permanent reservations.

pub mod allocator;
pub mod clock;
pub mod error;
pub mod hold;
pub mod identifier;
pub mod logger;
pub mod seat;
pub mod service;

pub use allocator::{DivideConquerAllocator, SeatAllocator, ThreePassAllocator};
pub use clock::{Clock, MockClock, SystemClock};
pub use error::{EngineError, Result};
pub use hold::{HoldId, SeatHold};
pub use seat::{Seat, SeatLayout};
pub use service::{ExpirationObserver, ServiceConfig, TicketService};
