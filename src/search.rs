//! Trip search: joins routes and trips by route reference and attaches the
//! current availability of every trip found.

use {
    crate::{
        availability::available_seats,
        errors::ApiError,
        models::{DESTINATION, ORIGIN, ROUTE_ID, Route, TRAVEL_DATE, TripListing},
        store::{Filter, SharedStore},
    },
    chrono::NaiveDate,
    mongodb::bson::oid::ObjectId,
    std::collections::HashMap,
    tracing::debug,
};

pub struct TripSearch {
    store: SharedStore,
}

impl TripSearch {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Trips between `origin` and `destination` departing on `date`.
    ///
    /// City names match case-insensitively but otherwise exactly. When no route
    /// matches, trips are never queried.
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<TripListing>, ApiError> {
        let routes = self
            .store
            .routes(
                &Filter::all()
                    .eq_ignore_case(ORIGIN, origin)
                    .eq_ignore_case(DESTINATION, destination),
            )
            .await?;

        if routes.is_empty() {
            debug!(origin, destination, "no route matches");
            return Ok(Vec::new());
        }

        let routes: HashMap<ObjectId, Route> =
            routes.into_iter().map(|route| (route.oid, route)).collect();

        let trips = self
            .store
            .trips(
                &Filter::all()
                    .is_in(ROUTE_ID, routes.keys().copied())
                    .eq(TRAVEL_DATE, date),
            )
            .await?;

        let mut listings = Vec::with_capacity(trips.len());
        for trip in trips {
            let Some(route) = routes.get(&trip.route_id) else {
                continue;
            };
            let bookings = self.store.bookings_for_trip(trip.oid).await?;
            listings.push(TripListing::new(
                &trip,
                route,
                available_seats(&trip, &bookings),
            ));
        }

        debug!(origin, destination, %date, found = listings.len(), "trip search");
        Ok(listings)
    }
}
