use actix_web::{web, Error, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;

use super::today;
use crate::config::Config;
use crate::db::Store;
use crate::error::StoreError;
use crate::models::{CreateReviewRequest, Review, ReviewResponse};
use crate::session::require_session;
use crate::validation::validate_review;

const SIGN_IN_TO_REVIEW: &str = "Please sign in to leave a review";

pub async fn submit_review(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    path: web::Path<String>,
    review_req: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_TO_REVIEW) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let booking_id = path.into_inner();

    let booking = match db.get_booking(&booking_id, &session.user_id).await {
        Ok(Some(booking)) => booking,
        Ok(None) | Err(StoreError::InvalidId(_)) => {
            return Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found" })))
        }
        Err(e) => {
            error!("Error loading booking {} for review: {}", booking_id, e);
            return Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to submit review" })));
        }
    };
    let Some(booking_oid) = booking.id else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Booking not found" })));
    };

    if !booking.can_review(today()) {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "This journey cannot be reviewed yet" })));
    }
    if let Err(e) = validate_review(&review_req) {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": e.message() })));
    }

    let review_req = review_req.into_inner();
    let review = Review {
        id: None,
        route_id: booking.route_id,
        user_id: session.user_id.clone(),
        booking_id: booking_oid,
        rating: review_req.rating,
        title: review_req.title.trim().to_string(),
        comment: review_req.comment.trim().to_string(),
        created_at: Utc::now(),
    };

    match db.insert_review(review).await {
        Ok(review) => {
            info!("Review submitted for booking {}", booking_id);
            let reviewer = db.get_profile(&session.user_id).await.ok().flatten();
            Ok(HttpResponse::Created().json(json!({
                "message": "Review submitted successfully!",
                "review": ReviewResponse::new(review, reviewer.and_then(|p| p.full_name)),
            })))
        }
        Err(StoreError::Duplicate(detail)) => {
            info!("Duplicate review for booking {}: {}", booking_id, detail);
            Ok(HttpResponse::Conflict().json(json!({ "error": "You've already reviewed this journey" })))
        }
        Err(e) => {
            error!("Error submitting review for booking {}: {}", booking_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to submit review" })))
        }
    }
}
