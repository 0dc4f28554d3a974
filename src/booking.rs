//! # Booking admission
//!
//! Admits a booking only when the trip still has enough seats. The
//! availability read and the booking write for one trip happen under that
//! trip's lock, so two concurrent requests can never both claim the last
//! seats. Requests for different trips do not contend.
//!
//! The lock lives in this process. Several server instances sharing one
//! database would need a conditional write in the store instead.

use {
    crate::{
        availability::available_seats,
        errors::ApiError,
        models::{BookingConfirmation, BookingRequest, CONFIRMED, NewRecord, Trip},
        store::{DocumentStore, SharedStore},
    },
    mongodb::bson::oid::ObjectId,
    std::{
        collections::HashMap,
        sync::{Arc, Mutex, PoisonError},
    },
    tokio::sync::Mutex as AsyncMutex,
    tracing::{info, warn},
};

/// One async mutex per trip, created on first use.
#[derive(Default, Clone)]
pub struct TripLocks {
    locks: Arc<Mutex<HashMap<ObjectId, Arc<AsyncMutex<()>>>>>,
}

impl TripLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_trip(&self, trip_id: ObjectId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(trip_id).or_default().clone()
    }

    /// Drops the trip's lock once no caller holds or waits on it.
    pub fn release(&self, trip_id: ObjectId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&trip_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&trip_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct BookingDesk {
    store: SharedStore,
    locks: TripLocks,
}

impl BookingDesk {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            locks: TripLocks::new(),
        }
    }

    /// Books `request` if the trip has room.
    ///
    /// Fails with `NotFound` for unknown or malformed trip ids and with
    /// `CapacityExceeded` (carrying the current availability) when the trip
    /// cannot fit the requested seats. Neither failure writes anything.
    /// Field validation is the caller's job.
    pub async fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation, ApiError> {
        let trip = self
            .store
            .find_trip(&request.trip_id)
            .await?
            .ok_or(ApiError::NotFound("Trip"))?;

        let lock = self.locks.for_trip(trip.oid);
        let admitted = {
            let _guard = lock.lock().await;
            self.admit(&trip, request).await
        };
        drop(lock);
        self.locks.release(trip.oid);

        admitted
    }

    async fn admit(
        &self,
        trip: &Trip,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let bookings = self.store.bookings_for_trip(trip.oid).await?;
        let available = available_seats(trip, &bookings);

        if request.seats > available {
            warn!(
                trip = %trip.oid,
                requested = request.seats,
                available,
                "booking rejected"
            );
            return Err(ApiError::CapacityExceeded { available });
        }

        let booking_id = self
            .store
            .insert(NewRecord::Booking(request.to_new_booking(trip.oid)))
            .await?;

        info!(
            trip = %trip.oid,
            booking = %booking_id,
            seats = request.seats,
            remaining = available - request.seats,
            "booking confirmed"
        );

        Ok(BookingConfirmation {
            status: CONFIRMED.to_string(),
            booking_id: booking_id.to_hex(),
        })
    }
}
