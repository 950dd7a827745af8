use actix_web::{web, Error, HttpResponse};
use log::{error, warn};
use serde::Deserialize;
use serde_json::json;

use crate::db::Store;
use crate::error::StoreError;
use crate::models::{RatingSummary, ReviewResponse, RouteResponse, RouteWithRating};

#[derive(Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list_routes(
    db: web::Data<dyn Store>,
    query: web::Query<RouteQuery>,
) -> Result<HttpResponse, Error> {
    let routes = match db.list_routes().await {
        Ok(routes) => routes,
        Err(e) => {
            error!("Error fetching routes: {}", e);
            return Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load routes" })));
        }
    };

    let mut rated = Vec::with_capacity(routes.len());
    for route in routes.into_iter().filter(|r| r.matches_query(&query.q)) {
        // A failed ratings fetch shows the route unrated rather than failing the page.
        let ratings = match route.id {
            Some(route_id) => db.route_ratings(&route_id).await.unwrap_or_else(|e| {
                warn!("Could not load ratings for route {}: {}", route.route_number, e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        rated.push(RouteWithRating {
            rating: RatingSummary::from_ratings(&ratings),
            route: RouteResponse::from(route),
        });
    }

    Ok(HttpResponse::Ok().json(rated))
}

pub async fn get_route(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let route_id = path.into_inner();

    let route = match db.get_route(&route_id).await {
        Ok(Some(route)) => route,
        Ok(None) | Err(StoreError::InvalidId(_)) => {
            return Ok(HttpResponse::NotFound().json(json!({ "error": "Route not found" })))
        }
        Err(e) => {
            error!("Error fetching route {}: {}", route_id, e);
            return Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load route details" })));
        }
    };

    let reviews = match route.id {
        Some(oid) => match db.route_reviews(&oid).await {
            Ok(reviews) => reviews,
            Err(e) => {
                error!("Error fetching reviews for route {}: {}", route_id, e);
                return Ok(HttpResponse::InternalServerError().json(json!({ "error": "Failed to load route details" })));
            }
        },
        None => Vec::new(),
    };

    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
    let summary = RatingSummary::from_ratings(&ratings);

    let mut detailed_reviews = Vec::with_capacity(reviews.len());
    for review in reviews {
        let reviewer = db.get_profile(&review.user_id).await.ok().flatten();
        detailed_reviews.push(ReviewResponse::new(review, reviewer.and_then(|p| p.full_name)));
    }

    Ok(HttpResponse::Ok().json(json!({
        "route": RouteResponse::from(route),
        "reviews": detailed_reviews,
        "average_rating": summary.average_rating,
        "review_count": summary.review_count,
    })))
}
