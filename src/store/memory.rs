//! In-process document store.
//!
//! Used when `busline.store = "memory"` and by the test suites. Every operation
//! yields to the runtime before touching the records, so concurrent callers
//! interleave the same way they would against a remote database.

use {
    super::{DocumentStore, Filter, StoreDiagnostics, StoreError},
    crate::models::{NewRecord, Record, RecordKind},
    mongodb::bson::oid::ObjectId,
    std::{
        collections::HashMap,
        sync::{
            PoisonError, RwLock,
            atomic::{AtomicBool, Ordering},
        },
    },
};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordKind, Vec<Record>>>,
    queries: RwLock<HashMap<RecordKind, usize>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Number of `find_many` calls made against `kind` so far.
    pub fn query_count(&self, kind: RecordKind) -> usize {
        self.queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    #[cfg(test)]
    /// Makes every subsequent operation fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[rocket::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, record: NewRecord) -> Result<ObjectId, StoreError> {
        tokio::task::yield_now().await;
        self.ensure_online()?;

        let oid = ObjectId::new();
        let record = record.with_id(oid);
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(record.kind())
            .or_default()
            .push(record);

        Ok(oid)
    }

    async fn find_many(
        &self,
        kind: RecordKind,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        tokio::task::yield_now().await;
        self.ensure_online()?;

        *self
            .queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default() += 1;

        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn diagnostics(&self) -> Result<StoreDiagnostics, StoreError> {
        self.ensure_online()?;

        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let collections = RecordKind::ALL
            .iter()
            .filter(|kind| records.get(*kind).is_some_and(|records| !records.is_empty()))
            .map(|kind| kind.collection().to_string())
            .collect();

        Ok(StoreDiagnostics {
            backend: "memory",
            database: "memory".to_string(),
            collections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EMAIL, NewBooking, NewRoute, ORIGIN};

    fn new_route(origin: &str) -> NewRecord {
        NewRecord::Route(NewRoute {
            origin: origin.to_string(),
            destination: "Boston".to_string(),
            duration_minutes: 240,
        })
    }

    #[rocket::async_test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let oid = store.insert(new_route("New York")).await.unwrap();
        store.insert(new_route("Albany")).await.unwrap();

        let found = store
            .find_many(RecordKind::Route, &Filter::all().eq(ORIGIN, "New York"))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].oid(), oid);
        assert_eq!(store.query_count(RecordKind::Route), 1);
        assert_eq!(store.query_count(RecordKind::Trip), 0);
    }

    #[rocket::async_test]
    async fn test_kinds_are_separate_collections() {
        let store = MemoryStore::new();
        store.insert(new_route("New York")).await.unwrap();
        store
            .insert(NewRecord::Booking(NewBooking {
                trip_id: ObjectId::new(),
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                seats: 2,
                status: "confirmed".to_string(),
            }))
            .await
            .unwrap();

        let bookings = store
            .find_many(RecordKind::Booking, &Filter::all())
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].kind(), RecordKind::Booking);

        let by_email = store
            .find_many(
                RecordKind::Booking,
                &Filter::all().eq(EMAIL, "someone@example.com"),
            )
            .await
            .unwrap();
        assert!(by_email.is_empty());
    }

    #[rocket::async_test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);

        assert!(matches!(
            store.insert(new_route("New York")).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.diagnostics().await.is_err());

        store.set_offline(false);
        assert!(store.insert(new_route("New York")).await.is_ok());
    }

    #[rocket::async_test]
    async fn test_diagnostics_lists_populated_collections() {
        let store = MemoryStore::new();
        assert!(store.diagnostics().await.unwrap().collections.is_empty());

        store.insert(new_route("New York")).await.unwrap();
        let diagnostics = store.diagnostics().await.unwrap();
        assert_eq!(diagnostics.backend, "memory");
        assert_eq!(diagnostics.collections, vec!["busroute".to_string()]);
    }
}
