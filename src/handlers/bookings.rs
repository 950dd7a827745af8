use std::collections::HashMap;

use actix_web::{web, Error, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;

use super::today;
use crate::config::Config;
use crate::db::Store;
use crate::error::StoreError;
use crate::models::booking::{total_amount, JOURNEY_DATE_FORMAT};
use crate::models::{
    Booking, BookingListItem, BookingResponse, BookingStatus, BusRoute, CreateBookingRequest,
    PaymentStatus, RouteResponse, RouteSummary,
};
use crate::session::require_session;
use crate::validation::validate_booking;

const SIGN_IN_TO_BOOK: &str = "Please sign in to make a booking";
const SIGN_IN_TO_VIEW: &str = "Please sign in to view bookings";

async fn load_route(db: &dyn Store, route_id: &str) -> Result<BusRoute, HttpResponse> {
    match db.get_route(route_id).await {
        Ok(Some(route)) => Ok(route),
        Ok(None) | Err(StoreError::InvalidId(_)) => {
            Err(HttpResponse::NotFound().json(json!({ "error": "Route not found" })))
        }
        Err(e) => {
            error!("Error fetching route {}: {}", route_id, e);
            Err(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load route details" })))
        }
    }
}

/// Everything the booking form renders: the route, its departure times and
/// seat map, and passenger details pre-filled from the profile.
pub async fn booking_form(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_BOOK) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let route = match load_route(db.get_ref(), &path.into_inner()).await {
        Ok(route) => route,
        Err(resp) => return Ok(resp),
    };

    let profile = db.get_profile(&session.user_id).await.unwrap_or_else(|e| {
        warn!("Could not load profile for {}: {}", session.user_id, e);
        None
    });
    let (passenger_name, passenger_phone) = profile
        .map(|p| (p.full_name.unwrap_or_default(), p.phone.unwrap_or_default()))
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(json!({
        "departure_times": route.departure_times,
        "seats": route.seat_map(),
        "min_journey_date": today().format(JOURNEY_DATE_FORMAT).to_string(),
        "prefill": {
            "passenger_name": passenger_name,
            "passenger_email": session.email.unwrap_or_default(),
            "passenger_phone": passenger_phone,
        },
        "route": RouteResponse::from(route),
    })))
}

pub async fn create_booking(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    booking_req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_BOOK) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let route = match load_route(db.get_ref(), &booking_req.route_id).await {
        Ok(route) => route,
        Err(resp) => return Ok(resp),
    };
    let Some(route_id) = route.id else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Route not found" })));
    };

    let draft = match validate_booking(&booking_req, &route, today()) {
        Ok(draft) => draft,
        Err(e) => return Ok(HttpResponse::BadRequest().json(json!({ "error": e.message() }))),
    };

    // Seats are not checked against other bookings for the same departure.
    let booking = Booking {
        id: None,
        user_id: session.user_id,
        route_id,
        journey_date: draft.journey_date.format(JOURNEY_DATE_FORMAT).to_string(),
        departure_time: draft.departure_time,
        total_amount: total_amount(route.price, draft.seat_numbers.len()),
        seat_numbers: draft.seat_numbers,
        passenger_name: draft.passenger_name,
        passenger_email: draft.passenger_email,
        passenger_phone: draft.passenger_phone,
        payment_status: PaymentStatus::Pending,
        booking_status: BookingStatus::Confirmed,
        created_at: Utc::now(),
    };

    match db.insert_booking(booking).await {
        Ok(booking) => {
            let booking_id = booking.id_hex();
            info!("Booking {} created on route {}", booking_id, route.route_number);
            Ok(HttpResponse::Created().json(json!({
                "message": "Booking created successfully!",
                "booking": BookingResponse::from(booking),
                "redirect": format!("/payment/{booking_id}"),
            })))
        }
        Err(e) => {
            error!("Error creating booking: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to create booking" })))
        }
    }
}

pub async fn get_user_bookings(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_VIEW) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let bookings = match db.user_bookings(&session.user_id).await {
        Ok(bookings) => bookings,
        Err(e) => {
            error!("Error fetching bookings for {}: {}", session.user_id, e);
            return Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load bookings" })));
        }
    };

    let today = today();
    let mut routes: HashMap<String, Option<RouteSummary>> = HashMap::new();
    let mut detailed_bookings = Vec::with_capacity(bookings.len());
    for b in bookings {
        let route_key = b.route_id.to_hex();
        let route = match routes.get(&route_key) {
            Some(cached) => cached.clone(),
            None => {
                let summary = db
                    .get_route(&route_key)
                    .await
                    .ok()
                    .flatten()
                    .map(|r| RouteSummary::from(&r));
                routes.insert(route_key, summary.clone());
                summary
            }
        };
        let can_review = b.can_review(today);
        detailed_bookings.push(BookingListItem {
            booking: BookingResponse::from(b),
            route,
            can_review,
        });
    }

    Ok(HttpResponse::Ok().json(detailed_bookings))
}
