use actix_web::{error::InternalError, web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde_json::json;

pub mod bookings;
pub mod home;
pub mod nav;
pub mod payments;
pub mod profile;
pub mod reviews;
pub mod routes;

/// Registers every endpoint under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "error": message })))
            .into()
    });

    cfg.app_data(json_config).service(
        web::scope("/api")
            .route("", web::get().to(home::index))
            .route("/session", web::get().to(nav::current_session))
            .route("/routes", web::get().to(routes::list_routes))
            .route("/routes/{id}", web::get().to(routes::get_route))
            .route("/routes/{id}/booking-form", web::get().to(bookings::booking_form))
            .route("/bookings", web::get().to(bookings::get_user_bookings))
            .route("/bookings", web::post().to(bookings::create_booking))
            .route("/bookings/{id}", web::get().to(payments::get_payment_details))
            .route("/bookings/{id}/payment", web::post().to(payments::pay_booking))
            .route("/bookings/{id}/review", web::post().to(reviews::submit_review))
            .route("/profile", web::get().to(profile::get_profile))
            .route("/profile", web::put().to(profile::update_profile)),
    );
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
