//! Sample routes and trips for a fresh database.

use {
    crate::{
        errors::ApiError,
        models::{NewRecord, NewRoute, NewTrip, RecordKind},
        store::{DocumentStore, Filter},
    },
    chrono::{Days, NaiveDate},
    mongodb::bson::oid::ObjectId,
    tracing::info,
    validator::Validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded { routes: usize, trips: usize },
}

impl SeedOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SeedOutcome::AlreadySeeded => "Trips already seeded",
            SeedOutcome::Seeded { .. } => "Seeded sample trips",
        }
    }
}

/// Seeds two routes with two trips each, unless any trip already exists.
///
/// New York to Boston runs on `today`, San Francisco to Los Angeles the day after.
pub async fn seed_sample_data(
    store: &dyn DocumentStore,
    today: NaiveDate,
) -> Result<SeedOutcome, ApiError> {
    if !store
        .find_many(RecordKind::Trip, &Filter::all())
        .await?
        .is_empty()
    {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    let ny_bos = insert_route(store, "New York", "Boston", 240).await?;
    let sf_la = insert_route(store, "San Francisco", "Los Angeles", 420).await?;

    let trips = [
        (ny_bos, today, "08:00", "SwiftBus", 39.99, 40),
        (ny_bos, today, "17:30", "MetroLines", 44.50, 50),
        (sf_la, tomorrow, "07:15", "Pacific Coaches", 59.00, 45),
        (sf_la, tomorrow, "18:45", "GoldenGate Bus", 62.50, 40),
    ];

    for (route_id, travel_date, departure_time, bus_company, price, capacity) in trips {
        let trip = NewTrip {
            route_id,
            travel_date,
            departure_time: departure_time.to_string(),
            bus_company: bus_company.to_string(),
            price,
            capacity,
        };
        trip.validate()?;
        store.insert(NewRecord::Trip(trip)).await?;
    }

    info!(routes = 2, trips = trips.len(), "seeded sample data");

    Ok(SeedOutcome::Seeded {
        routes: 2,
        trips: trips.len(),
    })
}

async fn insert_route(
    store: &dyn DocumentStore,
    origin: &str,
    destination: &str,
    duration_minutes: u32,
) -> Result<ObjectId, ApiError> {
    let route = NewRoute {
        origin: origin.to_string(),
        destination: destination.to_string(),
        duration_minutes,
    };
    route.validate()?;

    Ok(store.insert(NewRecord::Route(route)).await?)
}
