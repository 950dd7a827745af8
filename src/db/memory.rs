use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::debug;
use mongodb::bson::oid::ObjectId;

use super::{seed, string_to_id, Store};
use crate::error::StoreError;
use crate::models::{Booking, BusRoute, PaymentStatus, Profile, Review};

#[derive(Default)]
struct Tables {
    routes: Vec<BusRoute>,
    bookings: Vec<Booking>,
    reviews: Vec<Review>,
    profiles: Vec<Profile>,
}

/// In-process [`Store`]. Rows live in insertion order; review uniqueness per
/// booking is enforced the way the database's unique index would.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_routes() -> Self {
        let store = Self::new();
        for route in seed::sample_routes() {
            store.add_route(route);
        }
        store
    }

    /// Adds a route, assigning an id when it has none.
    pub fn add_route(&self, mut route: BusRoute) -> BusRoute {
        route.id.get_or_insert_with(ObjectId::new);
        self.tables().routes.push(route.clone());
        route
    }

    pub fn add_profile(&self, profile: Profile) {
        let mut tables = self.tables();
        tables.profiles.retain(|p| p.id != profile.id);
        tables.profiles.push(profile);
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

/// Newest first; among equal timestamps the later insert wins.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.iter().rev().cloned().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_routes(&self) -> Result<Vec<BusRoute>, StoreError> {
        self.check_online()?;
        let mut routes = self.tables().routes.clone();
        routes.sort_by(|a, b| a.route_number.cmp(&b.route_number));
        Ok(routes)
    }

    async fn get_route(&self, id: &str) -> Result<Option<BusRoute>, StoreError> {
        self.check_online()?;
        let oid = string_to_id(id)?;
        Ok(self.tables().routes.iter().find(|r| r.id == Some(oid)).cloned())
    }

    async fn route_ratings(&self, route_id: &ObjectId) -> Result<Vec<i32>, StoreError> {
        self.check_online()?;
        Ok(self
            .tables()
            .reviews
            .iter()
            .filter(|r| &r.route_id == route_id)
            .map(|r| r.rating)
            .collect())
    }

    async fn route_reviews(&self, route_id: &ObjectId) -> Result<Vec<Review>, StoreError> {
        self.check_online()?;
        let tables = self.tables();
        let reviews: Vec<Review> =
            tables.reviews.iter().filter(|r| &r.route_id == route_id).cloned().collect();
        Ok(newest_first(&reviews, |r| r.created_at))
    }

    async fn insert_booking(&self, mut booking: Booking) -> Result<Booking, StoreError> {
        self.check_online()?;
        booking.id = Some(ObjectId::new());
        debug!("memory store: inserting booking {}", booking.id_hex());
        self.tables().bookings.push(booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: &str, user_id: &str) -> Result<Option<Booking>, StoreError> {
        self.check_online()?;
        let oid = string_to_id(id)?;
        Ok(self
            .tables()
            .bookings
            .iter()
            .find(|b| b.id == Some(oid) && b.user_id == user_id)
            .cloned())
    }

    async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        self.check_online()?;
        let tables = self.tables();
        let bookings: Vec<Booking> =
            tables.bookings.iter().filter(|b| b.user_id == user_id).cloned().collect();
        Ok(newest_first(&bookings, |b| b.created_at))
    }

    async fn set_payment_status(
        &self,
        booking_id: &ObjectId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        if let Some(booking) = self.tables().bookings.iter_mut().find(|b| b.id.as_ref() == Some(booking_id)) {
            booking.payment_status = status;
        }
        Ok(())
    }

    async fn insert_review(&self, mut review: Review) -> Result<Review, StoreError> {
        self.check_online()?;
        let mut tables = self.tables();
        if tables.reviews.iter().any(|r| r.booking_id == review.booking_id) {
            return Err(StoreError::Duplicate(format!(
                "duplicate key value violates unique constraint on booking_id {}",
                review.booking_id.to_hex()
            )));
        }
        review.id = Some(ObjectId::new());
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        self.check_online()?;
        Ok(self.tables().profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.check_online()?;
        self.add_profile(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{Duration, Utc};

    fn booking(user_id: &str, route_id: ObjectId, minutes_ago: i64) -> Booking {
        Booking {
            id: None,
            user_id: user_id.to_string(),
            route_id,
            journey_date: "2024-01-01".to_string(),
            departure_time: "08:00".to_string(),
            seat_numbers: vec!["1".to_string()],
            passenger_name: "Ada".to_string(),
            passenger_email: "ada@example.com".to_string(),
            passenger_phone: "0712345678".to_string(),
            total_amount: 10.0,
            payment_status: PaymentStatus::Pending,
            booking_status: BookingStatus::Confirmed,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn review(route_id: ObjectId, booking_id: ObjectId, rating: i32) -> Review {
        Review {
            id: None,
            route_id,
            user_id: "u1".to_string(),
            booking_id,
            rating,
            title: "Nice".to_string(),
            comment: String::new(),
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn routes_are_listed_by_route_number() {
        let store = MemoryStore::with_sample_routes();
        let routes = store.list_routes().await.unwrap();
        let numbers: Vec<&str> = routes.iter().map(|r| r.route_number.as_str()).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(numbers, sorted);
        assert!(routes.iter().all(|r| r.id.is_some()));
    }

    #[actix_web::test]
    async fn bookings_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let route_id = ObjectId::new();
        let saved = store.insert_booking(booking("alice", route_id, 0)).await.unwrap();
        let id = saved.id_hex();

        assert!(store.get_booking(&id, "alice").await.unwrap().is_some());
        assert!(store.get_booking(&id, "mallory").await.unwrap().is_none());
        assert!(store.user_bookings("mallory").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn user_bookings_are_newest_first() {
        let store = MemoryStore::new();
        let route_id = ObjectId::new();
        let old = store.insert_booking(booking("alice", route_id, 60)).await.unwrap();
        let new = store.insert_booking(booking("alice", route_id, 1)).await.unwrap();
        let listed = store.user_bookings("alice").await.unwrap();
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[actix_web::test]
    async fn second_review_for_a_booking_is_a_duplicate() {
        let store = MemoryStore::new();
        let route_id = ObjectId::new();
        let booking_id = ObjectId::new();
        store.insert_review(review(route_id, booking_id, 4)).await.unwrap();
        let err = store.insert_review(review(route_id, booking_id, 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.route_ratings(&route_id).await.unwrap(), vec![4]);
    }

    #[actix_web::test]
    async fn malformed_id_is_rejected() {
        let store = MemoryStore::new();
        let err = store.get_route("not-an-object-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[actix_web::test]
    async fn offline_store_fails_every_call() {
        let store = MemoryStore::with_sample_routes();
        store.set_offline(true);
        assert!(matches!(store.list_routes().await, Err(StoreError::Unavailable(_))));
        store.set_offline(false);
        assert!(store.list_routes().await.is_ok());
    }

    #[actix_web::test]
    async fn payment_status_update_sticks() {
        let store = MemoryStore::new();
        let saved = store.insert_booking(booking("alice", ObjectId::new(), 0)).await.unwrap();
        let oid = saved.id.unwrap();
        store.set_payment_status(&oid, PaymentStatus::Completed).await.unwrap();
        let reloaded = store.get_booking(&oid.to_hex(), "alice").await.unwrap().unwrap();
        assert_eq!(reloaded.payment_status, PaymentStatus::Completed);
    }
}
