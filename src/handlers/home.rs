use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "RouteRider",
        "tagline": "Book your bus tickets easily, read reviews from real travelers, and rate your journey to help others make informed decisions.",
        "features": [
            { "title": "Wide Network", "description": "Access hundreds of routes connecting major cities and destinations" },
            { "title": "Verified Reviews", "description": "Read authentic reviews from verified travelers who've completed their journeys" },
            { "title": "Real-Time Updates", "description": "Get instant notifications about your booking status and departure times" },
            { "title": "Secure Payment", "description": "Your transactions are protected with industry-standard encryption" }
        ],
        "links": { "browse_routes": "/routes", "sign_in": "/auth" }
    }))
}
