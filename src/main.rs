use std::time::Duration;

use ticket_seat_engine::{logger, ServiceConfig, SystemClock, ThreePassAllocator, TicketService};

fn main() {
    logger::init();
    log::info!("Logger initialized. Starting TicketService demo.");

    let rows = 3;
    let columns = 11;
    let config = ServiceConfig {
        rows,
        columns,
        hold_duration: Duration::from_secs(60),
        allocator: Box::new(ThreePassAllocator::new(&ticket_seat_engine::SeatLayout::new(rows, columns).expect("valid demo layout"))),
        clock: Box::new(SystemClock),
        expiration_observer: None,
    };

    let service = match TicketService::new(config) {
        Ok(service) => service,
        Err(err) => {
            log::error!("Failed to start TicketService: {err}");
            return;
        }
    };

    log::info!("Seats available: {}", service.num_available());

    match service.find_and_hold(4, "alice@example.com") {
        Ok(Some(hold)) => {
            log::info!("Held {} seats for alice: {}", hold.seat_count(), hold.hash_string());
            match service.reserve(hold.id(), "alice@example.com") {
                Ok(Some(code)) => log::info!("Reserved with confirmation code {code}"),
                Ok(None) => log::warn!("Hold {} could not be reserved (expired or mismatched email)", hold.id()),
                Err(err) => log::error!("Reserve failed: {err}"),
            }
        }
        Ok(None) => log::warn!("Not enough seats available for alice"),
        Err(err) => log::error!("find_and_hold failed: {err}"),
    }

    log::info!("Seats remaining: {}", service.num_available());
}
