use std::time::Duration;

use actix_web::rt::time::sleep;
use log::info;

use crate::models::Booking;

/// Stand-in for a card processor: waits a fixed delay and always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn charge(&self, booking: &Booking) {
        info!(
            "Processing simulated payment of {:.2} for booking {}",
            booking.total_amount,
            booking.id_hex()
        );
        sleep(self.delay).await;
    }
}
