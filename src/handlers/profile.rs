use actix_web::{web, Error, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

use crate::config::Config;
use crate::db::Store;
use crate::models::{Profile, ProfileResponse, UpdateProfileRequest};
use crate::session::require_session;
use crate::validation::validate_profile;

const SIGN_IN_FOR_PROFILE: &str = "Please sign in to view your profile";

pub async fn get_profile(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_FOR_PROFILE) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    match db.get_profile(&session.user_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(ProfileResponse::new(
            &session.user_id,
            session.email.as_deref(),
            profile,
        ))),
        Err(e) => {
            error!("Error fetching profile for {}: {}", session.user_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load profile" })))
        }
    }
}

pub async fn update_profile(
    req: HttpRequest,
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    profile_req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, Error> {
    let session = match require_session(&req, &config, SIGN_IN_FOR_PROFILE) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let update = match validate_profile(&profile_req) {
        Ok(update) => update,
        Err(e) => return Ok(HttpResponse::BadRequest().json(json!({ "error": e.message() }))),
    };

    let profile = Profile {
        id: session.user_id.clone(),
        full_name: Some(update.full_name),
        phone: update.phone,
    };

    match db.upsert_profile(&profile).await {
        Ok(()) => {
            info!("Profile updated for {}", session.user_id);
            Ok(HttpResponse::Ok().json(json!({
                "message": "Profile updated successfully!",
                "profile": ProfileResponse::new(&session.user_id, session.email.as_deref(), Some(profile)),
            })))
        }
        Err(e) => {
            error!("Error updating profile for {}: {}", session.user_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to update profile" })))
        }
    }
}
