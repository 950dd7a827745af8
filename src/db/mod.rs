//! Row-level access to the hosted store.
//!
//! Handlers only ever talk to [`Store`]. [`MongoDB`] is the production
//! backend; [`MemoryStore`] backs tests and `STORE=memory` local runs.

use async_trait::async_trait;
use ::mongodb::bson::oid::ObjectId;

use crate::error::StoreError;
use crate::models::{Booking, BusRoute, PaymentStatus, Profile, Review};

pub mod memory;
pub mod mongodb;
pub mod seed;

pub use self::memory::MemoryStore;
pub use self::mongodb::MongoDB;

#[async_trait]
pub trait Store: Send + Sync {
    /// All routes ordered by `route_number` ascending.
    async fn list_routes(&self) -> Result<Vec<BusRoute>, StoreError>;

    async fn get_route(&self, id: &str) -> Result<Option<BusRoute>, StoreError>;

    /// Ratings of every review left on a route.
    async fn route_ratings(&self, route_id: &ObjectId) -> Result<Vec<i32>, StoreError>;

    /// Reviews of a route, newest first.
    async fn route_reviews(&self, route_id: &ObjectId) -> Result<Vec<Review>, StoreError>;

    /// Writes one booking row and returns it with its assigned id.
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError>;

    /// A booking, only if it belongs to `user_id`.
    async fn get_booking(&self, id: &str, user_id: &str) -> Result<Option<Booking>, StoreError>;

    /// A user's bookings, newest first.
    async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    async fn set_payment_status(
        &self,
        booking_id: &ObjectId,
        status: PaymentStatus,
    ) -> Result<(), StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the booking already has a review.
    async fn insert_review(&self, review: Review) -> Result<Review, StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError>;
}

pub fn string_to_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|e| StoreError::InvalidId(e.to_string()))
}
