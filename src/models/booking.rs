use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use super::route::RouteSummary;

pub const JOURNEY_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub route_id: ObjectId,
    pub journey_date: String,
    pub departure_time: String,
    pub seat_numbers: Vec<String>,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub booking_status: BookingStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Price of a booking: per-seat price times the number of seats.
pub fn total_amount(price: f64, seat_count: usize) -> f64 {
    price * seat_count as f64
}

impl Booking {
    pub fn id_hex(&self) -> String {
        self.id.map(|oid| oid.to_hex()).unwrap_or_default()
    }

    pub fn journey_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.journey_date, JOURNEY_DATE_FORMAT).ok()
    }

    /// A journey can be reviewed from its travel day on, while still confirmed and paid.
    pub fn can_review(&self, today: NaiveDate) -> bool {
        let travelled = self.journey_date().is_some_and(|date| date <= today);
        travelled
            && self.booking_status == BookingStatus::Confirmed
            && self.payment_status == PaymentStatus::Completed
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }

    pub fn price_per_seat(&self) -> f64 {
        if self.seat_numbers.is_empty() {
            0.0
        } else {
            self.total_amount / self.seat_numbers.len() as f64
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateBookingRequest {
    pub route_id: String,
    #[serde(default)]
    pub journey_date: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub seat_numbers: Vec<String>,
    #[serde(default)]
    pub passenger_name: String,
    #[serde(default)]
    pub passenger_email: String,
    #[serde(default)]
    pub passenger_phone: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct BookingResponse {
    pub id: String,
    pub route_id: String,
    pub journey_date: String,
    pub departure_time: String,
    pub seat_numbers: Vec<String>,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id_hex(),
            route_id: booking.route_id.to_hex(),
            journey_date: booking.journey_date,
            departure_time: booking.departure_time,
            seat_numbers: booking.seat_numbers,
            passenger_name: booking.passenger_name,
            passenger_email: booking.passenger_email,
            passenger_phone: booking.passenger_phone,
            total_amount: booking.total_amount,
            payment_status: booking.payment_status,
            booking_status: booking.booking_status,
            created_at: booking.created_at,
        }
    }
}

/// One row of the booking history page.
#[derive(Serialize, Debug)]
pub struct BookingListItem {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub route: Option<RouteSummary>,
    pub can_review: bool,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct PaymentSummary {
    pub price_per_seat: f64,
    pub seat_count: usize,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl From<&Booking> for PaymentSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            price_per_seat: booking.price_per_seat(),
            seat_count: booking.seat_numbers.len(),
            subtotal: booking.total_amount,
            service_fee: 0.0,
            total: booking.total_amount,
        }
    }
}
