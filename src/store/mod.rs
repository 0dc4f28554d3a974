//! # Document store
//!
//! The booking services talk to persistence only through [`DocumentStore`].
//! A store knows how to insert one record and how to find many records of a
//! kind matching a [`Filter`]. Everything else (trip lookup by id, bookings of
//! a trip) is built on top of those two operations.

pub mod filter;
pub mod memory;
pub mod unavailable;

use {
    crate::models::{Booking, ID, NewRecord, Record, RecordKind, Route, TRIP_ID, Trip},
    mongodb::bson::oid::ObjectId,
    serde::Serialize,
    std::sync::Arc,
    thiserror::Error,
};

pub use filter::Filter;
pub use memory::MemoryStore;
pub use unavailable::UnavailableStore;

pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Mongo(#[from] rocket_db_pools::mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct StoreDiagnostics {
    pub backend: &'static str,
    pub database: String,
    pub collections: Vec<String>,
}

#[rocket::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new record and returns its generated id.
    async fn insert(&self, record: NewRecord) -> Result<ObjectId, StoreError>;

    /// Returns every record of `kind` matching `filter`, in store order.
    async fn find_many(&self, kind: RecordKind, filter: &Filter)
    -> Result<Vec<Record>, StoreError>;

    async fn diagnostics(&self) -> Result<StoreDiagnostics, StoreError>;
}

impl dyn DocumentStore {
    pub async fn routes(&self, filter: &Filter) -> Result<Vec<Route>, StoreError> {
        let records = self.find_many(RecordKind::Route, filter).await?;
        Ok(records.into_iter().filter_map(Record::into_route).collect())
    }

    pub async fn trips(&self, filter: &Filter) -> Result<Vec<Trip>, StoreError> {
        let records = self.find_many(RecordKind::Trip, filter).await?;
        Ok(records.into_iter().filter_map(Record::into_trip).collect())
    }

    pub async fn bookings(&self, filter: &Filter) -> Result<Vec<Booking>, StoreError> {
        let records = self.find_many(RecordKind::Booking, filter).await?;
        Ok(records.into_iter().filter_map(Record::into_booking).collect())
    }

    /// Looks a trip up by its hex id. Malformed ids are reported as absent.
    pub async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(trip_id) else {
            return Ok(None);
        };

        let trips = self.trips(&Filter::all().eq(ID, oid)).await?;
        Ok(trips.into_iter().next())
    }

    pub async fn bookings_for_trip(&self, trip_id: ObjectId) -> Result<Vec<Booking>, StoreError> {
        self.bookings(&Filter::all().eq(TRIP_ID, trip_id)).await
    }
}
