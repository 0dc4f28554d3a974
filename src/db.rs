//! # Database connection module
//!
//! This module provides the MongoDB connection pool (via rocket_db_pools) and
//! the [`MongoStore`] document store built on top of it.
//!
//! ## Configuration
//!
//! The database connection is configured in Rocket.toml or via environment variables:
//! - `[default.databases.busdata] url`: MongoDB connection string used by the server
//! - `DATABASE_URL` or `MONGODB_URL`: MongoDB connection string used by the CLI
//!
//! Collections are named after the record kinds: `busroute`, `trip` and `booking`.

use {
    crate::{
        models::{Booking, NewRecord, Record, RecordKind, Route, Trip},
        store::{DocumentStore, Filter, StoreDiagnostics, StoreError},
    },
    mongodb::bson::{doc, oid::ObjectId},
    rocket::futures::TryStreamExt,
    rocket_db_pools::{
        Database,
        mongodb::{Client, Collection, options::ClientOptions},
    },
    serde::{Serialize, de::DeserializeOwned},
};

/// MongoDB database connection pool.
///
/// Managed by Rocket; [`MongoStore`] clones the inner client once the pool
/// has been initialized.
#[derive(Database)]
#[database("busdata")]
pub struct BusData(Client);

/// Document store backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    pub fn from_pool(db: &BusData, database: impl Into<String>) -> Self {
        let client: &Client = db;
        Self::new(client.clone(), database)
    }

    /// Connects directly, outside of Rocket's pool. Used by the CLI.
    pub async fn connect(url: &str, database: impl Into<String>) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(url).await?;
        let client = Client::with_options(options)?;

        Ok(Self::new(client, database))
    }

    fn collection<T: Send + Sync>(&self, kind: RecordKind) -> Collection<T> {
        self.client
            .database(&self.database)
            .collection::<T>(kind.collection())
    }

    async fn insert_record<T: Serialize + Send + Sync>(
        &self,
        kind: RecordKind,
        record: &T,
    ) -> Result<(), StoreError> {
        self.collection::<T>(kind).insert_one(record, None).await?;
        Ok(())
    }

    async fn find_records<T>(&self, kind: RecordKind, filter: &Filter) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let mut cursor = self
            .collection::<T>(kind)
            .find(filter.to_document(), None)
            .await?;

        let mut results = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            results.push(record);
        }

        Ok(results)
    }
}

#[rocket::async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, record: NewRecord) -> Result<ObjectId, StoreError> {
        let oid = ObjectId::new();

        match record.with_id(oid) {
            Record::Route(route) => self.insert_record(RecordKind::Route, &route).await?,
            Record::Trip(trip) => self.insert_record(RecordKind::Trip, &trip).await?,
            Record::Booking(booking) => self.insert_record(RecordKind::Booking, &booking).await?,
        }

        Ok(oid)
    }

    async fn find_many(
        &self,
        kind: RecordKind,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let records: Vec<Record> = match kind {
            RecordKind::Route => self
                .find_records::<Route>(kind, filter)
                .await?
                .into_iter()
                .map(Record::Route)
                .collect(),
            RecordKind::Trip => self
                .find_records::<Trip>(kind, filter)
                .await?
                .into_iter()
                .map(Record::Trip)
                .collect(),
            RecordKind::Booking => self
                .find_records::<Booking>(kind, filter)
                .await?
                .into_iter()
                .map(Record::Booking)
                .collect(),
        };

        Ok(records)
    }

    async fn diagnostics(&self) -> Result<StoreDiagnostics, StoreError> {
        let database = self.client.database(&self.database);
        database.run_command(doc! { "ping": 1 }, None).await?;

        let mut collections = database.list_collection_names(doc! {}).await?;
        collections.sort();
        collections.truncate(10);

        Ok(StoreDiagnostics {
            backend: "mongodb",
            database: self.database.clone(),
            collections,
        })
    }
}
