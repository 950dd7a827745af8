use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::models::SessionResponse;
use crate::session::decode_session;

/// Navigation bar state. Never fails: a bad token reads as signed out.
pub async fn current_session(req: HttpRequest, config: web::Data<Config>) -> HttpResponse {
    let response = match decode_session(&req, &config) {
        Ok(session) => SessionResponse {
            authenticated: true,
            user_id: Some(session.user_id),
            email: session.email,
            links: SessionResponse::nav_links(true),
        },
        Err(_) => SessionResponse {
            authenticated: false,
            user_id: None,
            email: None,
            links: SessionResponse::nav_links(false),
        },
    };
    HttpResponse::Ok().json(response)
}
