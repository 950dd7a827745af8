use actix_web::{web, Error, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

use crate::config::Config;
use crate::db::Store;
use crate::error::StoreError;
use crate::models::{Booking, BookingResponse, BusRoute, PaymentStatus, PaymentSummary, RouteResponse};
use crate::payment::SimulatedPayment;
use crate::session::require_session;

const SIGN_IN_TO_PAY: &str = "Please sign in to complete payment";

/// Loads a booking the user owns together with its route. Anything missing
/// sends the user back to their bookings.
async fn load_booking(
    db: &dyn Store,
    booking_id: &str,
    user_id: &str,
) -> Result<(Booking, BusRoute), HttpResponse> {
    let not_found = || {
        HttpResponse::NotFound().json(json!({ "error": "Booking not found", "redirect": "/bookings" }))
    };
    let failed = |e: StoreError| {
        error!("Error loading booking {}: {}", booking_id, e);
        HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to load booking details", "redirect": "/bookings" }))
    };

    let booking = match db.get_booking(booking_id, user_id).await {
        Ok(Some(booking)) => booking,
        Ok(None) | Err(StoreError::InvalidId(_)) => return Err(not_found()),
        Err(e) => return Err(failed(e)),
    };
    let route = match db.get_route(&booking.route_id.to_hex()).await {
        Ok(Some(route)) => route,
        Ok(None) | Err(StoreError::InvalidId(_)) => return Err(not_found()),
        Err(e) => return Err(failed(e)),
    };
    Ok((booking, route))
}

pub async fn get_payment_details(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_PAY) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let (booking, route) = match load_booking(db.get_ref(), &path.into_inner(), &session.user_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Ok().json(json!({
        "summary": PaymentSummary::from(&booking),
        "paid": booking.is_paid(),
        "booking": BookingResponse::from(booking),
        "route": RouteResponse::from(route),
    })))
}

pub async fn pay_booking(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_PAY) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let (mut booking, _route) = match load_booking(db.get_ref(), &path.into_inner(), &session.user_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };
    let Some(booking_id) = booking.id else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found", "redirect": "/bookings" })));
    };

    if booking.is_paid() {
        return Ok(HttpResponse::Conflict().json(json!({ "error": "Payment already completed" })));
    }

    SimulatedPayment::new(config.payment_delay).charge(&booking).await;

    match db.set_payment_status(&booking_id, PaymentStatus::Completed).await {
        Ok(()) => {
            info!("Payment completed for booking {}", booking_id.to_hex());
            booking.payment_status = PaymentStatus::Completed;
            Ok(HttpResponse::Ok().json(json!({
                "message": "Payment successful!",
                "booking": BookingResponse::from(booking),
                "redirect": "/bookings",
            })))
        }
        Err(e) => {
            error!("Error completing payment for booking {}: {}", booking_id.to_hex(), e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": "Payment failed. Please try again." })))
        }
    }
}
