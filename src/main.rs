//! # Busline - a booking API for scheduled bus trips
//!
//! Clients search trips by origin, destination and date, and reserve seats
//! against each trip's capacity.
//!
//! ## Environment Variables
//!
//! - `ROCKET_DATABASES={busdata={url="..."}}`: MongoDB connection string for the server
//! - `DATABASE_URL` or `MONGODB_URL`: MongoDB connection string for the `seed` command
//! - `RUST_LOG`: log filter, `info` by default

use std::sync::Arc;

use rocket::{Build, Rocket, catchers, fairing::AdHoc, http::Method, launch, routes};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    booking::BookingDesk,
    config::{AppConfig, StoreKind},
    db::{BusData, MongoStore},
    search::TripSearch,
    store::{MemoryStore, SharedStore, UnavailableStore},
};

pub mod availability;
pub mod booking;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod search;
pub mod seed;
pub mod store;

const POOL_URL: &str = "databases.busdata.url";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Routes, catchers and CORS. Store-independent.
pub fn mount_api(rocket: Rocket<Build>) -> Rocket<Build> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allow_credentials(true);

    rocket
        .attach(cors.to_cors().expect("Failed to build cors"))
        .register(
            "/",
            catchers![
                handlers::catch400,
                handlers::catch404,
                handlers::catch422,
                handlers::catch500
            ],
        )
        .mount("/", routes![handlers::index])
        .mount("/", handlers::misc::routes())
        .mount("/api", routes![handlers::hello])
        .mount("/api", handlers::misc::api_routes())
        .mount("/api", handlers::trips::routes())
        .mount("/api", handlers::bookings::routes())
}

/// Hands `store` to the services and to the handlers that read it directly.
pub fn with_store(rocket: Rocket<Build>, store: SharedStore) -> Rocket<Build> {
    rocket
        .manage(TripSearch::new(store.clone()))
        .manage(BookingDesk::new(store.clone()))
        .manage(store)
}

/// The full server: API plus the store selected by `busline.store`.
pub fn server(rocket: Rocket<Build>) -> Rocket<Build> {
    let config =
        AppConfig::from_figment(rocket.figment()).expect("Invalid `busline` configuration");

    let rocket = mount_api(rocket);

    let rocket = match config.store {
        StoreKind::Memory => {
            info!("using the in-memory document store");
            with_store(rocket, Arc::new(MemoryStore::new()))
        }
        StoreKind::Mongo if !rocket.figment().contains(POOL_URL) => {
            error!("`{POOL_URL}` is not set; every store call will fail with 503");
            with_store(
                rocket,
                Arc::new(UnavailableStore::new("MongoDB pool `busdata` is not configured")),
            )
        }
        StoreKind::Mongo => {
            let database = config.database.clone();
            rocket.attach(BusData::init()).attach(AdHoc::try_on_ignite(
                "MongoDB document store",
                move |rocket| async move {
                    match BusData::fetch(&rocket) {
                        Some(pool) => {
                            info!(database = %database, "using the MongoDB document store");
                            let store: SharedStore =
                                Arc::new(MongoStore::from_pool(pool, database));
                            Ok(with_store(rocket, store))
                        }
                        None => {
                            error!("MongoDB pool `busdata` is not initialized");
                            Err(rocket)
                        }
                    }
                },
            ))
        }
    };

    if !config.seed_on_launch {
        return rocket;
    }

    rocket.attach(AdHoc::on_liftoff("Sample data", |rocket| {
        Box::pin(async move {
            let Some(store) = rocket.state::<SharedStore>() else {
                return;
            };

            let today = chrono::Local::now().date_naive();
            match seed::seed_sample_data(store.as_ref(), today).await {
                Ok(outcome) => info!("{}", outcome.message()),
                Err(e) => error!(error = %e, "failed to seed sample data"),
            }
        })
    }))
}

/// Main entry point for the Rocket application.
///
/// With command-line arguments, runs the requested CLI command and exits
/// instead of starting the server.
#[launch]
async fn rocket() -> _ {
    dotenvy::dotenv().ok();
    init_tracing();

    if std::env::args().len() > 1 {
        cli::handle_cli().await.expect("Failed to handle CLI");
        std::process::exit(0);
    }

    server(rocket::build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::{figment::Figment, http::Status, local::asynchronous::Client};
    use serde_json::Value;

    #[rocket::async_test]
    async fn test_missing_pool_config_answers_service_unavailable() {
        let figment = Figment::from(rocket::Config::debug_default());
        let client = Client::tracked(server(rocket::custom(figment)))
            .await
            .expect("server ignites without a database pool");

        let response = client
            .get("/api/trips/search?origin=a&destination=b&travel_date=2026-10-19")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::ServiceUnavailable);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Database not available");

        let body: Value = client.get("/test").dispatch().await.into_json().await.unwrap();
        assert_eq!(body["connection_status"], "Not Connected");
    }

    #[rocket::async_test]
    async fn test_memory_store_from_config() {
        let figment = Figment::from(rocket::Config::debug_default()).merge(("busline.store", "memory"));
        let client = Client::tracked(server(rocket::custom(figment)))
            .await
            .expect("valid rocket instance");

        let response = client.post("/api/seed").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
    }
}
