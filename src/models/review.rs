use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub route_id: ObjectId,
    pub user_id: String,
    pub booking_id: ObjectId,
    #[serde(deserialize_with = "rating_from_number")]
    pub rating: i32,
    pub title: String,
    pub comment: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Reads a stored rating whether it was written as Int32, Int64 or a whole Double.
pub fn rating_from_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    struct RatingVisitor;

    impl<'de> Visitor<'de> for RatingVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a whole-number rating")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
            i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
            i32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i32, E> {
            if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
                Ok(v as i32)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(RatingVisitor)
}

fn default_rating() -> i32 {
    5
}

#[derive(Deserialize, Debug)]
pub struct CreateReviewRequest {
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize, Debug)]
pub struct ReviewResponse {
    pub id: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub reviewer_name: String,
}

impl ReviewResponse {
    pub fn new(review: Review, reviewer_name: Option<String>) -> Self {
        Self {
            id: review.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            created_at: review.created_at,
            reviewer_name: reviewer_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: usize,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self { average_rating: 0.0, review_count: 0 };
        }
        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        Self {
            average_rating: sum as f64 / ratings.len() as f64,
            review_count: ratings.len(),
        }
    }
}
