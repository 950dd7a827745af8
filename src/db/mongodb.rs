use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error, info};
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions, UpdateOptions},
    Client, Collection, Cursor, IndexModel,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{seed, string_to_id, Store};
use crate::error::StoreError;
use crate::models::{rating_from_number, Booking, BusRoute, PaymentStatus, Profile, Review};

const DUPLICATE_KEY: i32 = 11000;

/// Projection of a review row used for averages.
#[derive(Deserialize)]
struct RatingRow {
    #[serde(deserialize_with = "rating_from_number")]
    rating: i32,
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db_name: String,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let client_options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(client_options)?;
        Ok(MongoDB {
            client,
            db_name: db_name.to_string(),
        })
    }

    fn get_routes_collection(&self) -> Collection<BusRoute> {
        self.client.database(&self.db_name).collection("bus_routes")
    }

    fn get_bookings_collection(&self) -> Collection<Booking> {
        self.client.database(&self.db_name).collection("bookings")
    }

    fn get_reviews_collection(&self) -> Collection<Review> {
        self.client.database(&self.db_name).collection("reviews")
    }

    fn get_profiles_collection(&self) -> Collection<Profile> {
        self.client.database(&self.db_name).collection("profiles")
    }

    /// One review per booking is the only constraint the service relies on.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique_booking = IndexModel::builder()
            .keys(doc! { "booking_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.get_reviews_collection().create_index(unique_booking, None).await?;

        let by_user = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        self.get_bookings_collection().create_index(by_user, None).await?;

        let by_route = IndexModel::builder().keys(doc! { "route_id": 1 }).build();
        self.get_reviews_collection().create_index(by_route, None).await?;
        Ok(())
    }

    pub async fn seed_data(&self, force: bool) -> Result<(), mongodb::error::Error> {
        let collection = self.get_routes_collection();

        if force {
            info!("Force seeding enabled. Clearing bus_routes collection...");
            collection.delete_many(doc! {}, None).await?;
        }

        let count = collection.count_documents(None, None).await?;
        if count == 0 {
            let routes = seed::sample_routes();
            let seeded = routes.len();
            collection.insert_many(routes, None).await?;
            info!("Seeding complete with {} routes", seeded);
        }
        Ok(())
    }
}

/// Duplicate-key write errors become [`StoreError::Duplicate`].
fn classify(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(ref write_error)) = *err.kind {
        if write_error.code == DUPLICATE_KEY {
            return StoreError::Duplicate(write_error.message.clone());
        }
    }
    error!("MongoDB error: {}", err);
    StoreError::Database(err)
}

async fn drain<T>(mut cursor: Cursor<T>) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut rows = Vec::new();
    while let Some(result) = cursor.next().await {
        rows.push(result.map_err(classify)?);
    }
    Ok(rows)
}

#[async_trait]
impl Store for MongoDB {
    async fn list_routes(&self) -> Result<Vec<BusRoute>, StoreError> {
        let find_options = FindOptions::builder().sort(doc! { "route_number": 1 }).build();
        let cursor = self
            .get_routes_collection()
            .find(None, find_options)
            .await
            .map_err(classify)?;
        drain(cursor).await
    }

    async fn get_route(&self, id: &str) -> Result<Option<BusRoute>, StoreError> {
        let object_id = string_to_id(id)?;
        self.get_routes_collection()
            .find_one(doc! { "_id": object_id }, None)
            .await
            .map_err(classify)
    }

    async fn route_ratings(&self, route_id: &ObjectId) -> Result<Vec<i32>, StoreError> {
        let find_options = FindOptions::builder().projection(doc! { "rating": 1 }).build();
        let cursor = self
            .get_reviews_collection()
            .clone_with_type::<RatingRow>()
            .find(doc! { "route_id": *route_id }, find_options)
            .await
            .map_err(classify)?;
        let rows: Vec<RatingRow> = drain(cursor).await?;
        Ok(rows.into_iter().map(|row| row.rating).collect())
    }

    async fn route_reviews(&self, route_id: &ObjectId) -> Result<Vec<Review>, StoreError> {
        let find_options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .get_reviews_collection()
            .find(doc! { "route_id": *route_id }, find_options)
            .await
            .map_err(classify)?;
        drain(cursor).await
    }

    async fn insert_booking(&self, booking: Booking) -> Result<Booking, StoreError> {
        let result = self
            .get_bookings_collection()
            .insert_one(&booking, None)
            .await
            .map_err(classify)?;
        let mut new_booking = booking;
        new_booking.id = result.inserted_id.as_object_id();
        debug!("Inserted booking {}", new_booking.id_hex());
        Ok(new_booking)
    }

    async fn get_booking(&self, id: &str, user_id: &str) -> Result<Option<Booking>, StoreError> {
        let booking_oid = string_to_id(id)?;
        self.get_bookings_collection()
            .find_one(doc! { "_id": booking_oid, "user_id": user_id }, None)
            .await
            .map_err(classify)
    }

    async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let find_options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .get_bookings_collection()
            .find(doc! { "user_id": user_id }, find_options)
            .await
            .map_err(classify)?;
        drain(cursor).await
    }

    async fn set_payment_status(
        &self,
        booking_id: &ObjectId,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        self.get_bookings_collection()
            .update_one(
                doc! { "_id": *booking_id },
                doc! { "$set": { "payment_status": status.as_str() } },
                None,
            )
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn insert_review(&self, review: Review) -> Result<Review, StoreError> {
        let result = self
            .get_reviews_collection()
            .insert_one(&review, None)
            .await
            .map_err(classify)?;
        let mut new_review = review;
        new_review.id = result.inserted_id.as_object_id();
        Ok(new_review)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        self.get_profiles_collection()
            .find_one(doc! { "_id": user_id }, None)
            .await
            .map_err(classify)
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.get_profiles_collection()
            .update_one(
                doc! { "_id": &profile.id },
                doc! { "$set": { "full_name": profile.full_name.clone(), "phone": profile.phone.clone() } },
                options,
            )
            .await
            .map_err(classify)?;
        Ok(())
    }
}
