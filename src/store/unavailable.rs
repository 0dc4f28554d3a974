//! Stand-in for a database that was never configured. Every call fails with
//! [`StoreError::Unavailable`], which the API answers with 503.

use {
    super::{DocumentStore, Filter, StoreDiagnostics, StoreError},
    crate::models::{NewRecord, Record, RecordKind},
    mongodb::bson::oid::ObjectId,
};

pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[rocket::async_trait]
impl DocumentStore for UnavailableStore {
    async fn insert(&self, _: NewRecord) -> Result<ObjectId, StoreError> {
        self.fail()
    }

    async fn find_many(&self, _: RecordKind, _: &Filter) -> Result<Vec<Record>, StoreError> {
        self.fail()
    }

    async fn diagnostics(&self) -> Result<StoreDiagnostics, StoreError> {
        self.fail()
    }
}
