use {
    crate::{
        errors::ApiError,
        seed::seed_sample_data,
        store::SharedStore,
    },
    rocket::{State, get, post, routes as rocket_routes, serde::json::Json},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, Clone, Default, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ConnectionReport {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde")]
pub struct SeedResponse {
    pub status: String,
    pub message: String,
}

/// Connection diagnostics. Always answers 200; store problems are reported in the body.
#[get("/test")]
pub async fn test_database(store: &State<SharedStore>) -> Json<ConnectionReport> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(_) => "set",
        Err(_) => "not set",
    };

    let mut report = ConnectionReport {
        backend: "running".to_string(),
        database_url: Some(database_url.to_string()),
        ..ConnectionReport::default()
    };

    match store.diagnostics().await {
        Ok(diagnostics) => {
            report.database = format!("connected ({})", diagnostics.backend);
            report.database_name = Some(diagnostics.database);
            report.connection_status = "Connected".to_string();
            report.collections = diagnostics.collections;
        }
        Err(e) => {
            let message: String = e.to_string().chars().take(50).collect();
            report.database = format!("error: {}", message);
            report.connection_status = "Not Connected".to_string();
        }
    }

    Json(report)
}

#[post("/seed")]
pub async fn seed(store: &State<SharedStore>) -> Result<Json<SeedResponse>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let outcome = seed_sample_data(store.inner().as_ref(), today).await?;

    Ok(Json(SeedResponse {
        status: "ok".to_string(),
        message: outcome.message().to_string(),
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    rocket_routes![test_database]
}

pub fn api_routes() -> Vec<rocket::Route> {
    rocket_routes![seed]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rocket::{http::Status, local::asynchronous::Client};
    use serde_json::Value;
    use std::sync::Arc;

    async fn client(store: Arc<MemoryStore>) -> Client {
        Client::tracked(crate::with_store(crate::mount_api(rocket::build()), store))
            .await
            .expect("valid rocket instance")
    }

    #[rocket::async_test]
    async fn test_seed_endpoint_is_idempotent() {
        let client = client(Arc::new(MemoryStore::new())).await;

        let first: SeedResponse = client
            .post("/api/seed")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(first.status, "ok");
        assert_eq!(first.message, "Seeded sample trips");

        let second: SeedResponse = client
            .post("/api/seed")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(second.message, "Trips already seeded");
    }

    #[rocket::async_test]
    async fn test_diagnostics_report_collections() {
        let client = client(Arc::new(MemoryStore::new())).await;
        client.post("/api/seed").dispatch().await;

        let response = client.get("/test").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let report: ConnectionReport = response.into_json().await.unwrap();
        assert_eq!(report.backend, "running");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database_name.as_deref(), Some("memory"));
        assert_eq!(report.collections, vec!["busroute", "trip"]);
    }

    #[rocket::async_test]
    async fn test_diagnostics_when_store_offline() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let client = client(store).await;

        let report: ConnectionReport = client
            .get("/test")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(report.connection_status, "Not Connected");
        assert!(report.database.starts_with("error"));
    }

    #[rocket::async_test]
    async fn test_offline_store_is_service_unavailable() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let client = client(store).await;

        let response = client.post("/api/seed").dispatch().await;
        assert_eq!(response.status(), Status::ServiceUnavailable);

        let response = client
            .get("/api/trips/search?origin=a&destination=b&travel_date=2026-10-19")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::ServiceUnavailable);

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "Database not available");
    }

    #[rocket::async_test]
    async fn test_root_and_hello() {
        let client = client(Arc::new(MemoryStore::new())).await;

        let body: Value = client.get("/").dispatch().await.into_json().await.unwrap();
        assert_eq!(body["message"], "Bus Booking API is running");

        let body: Value = client
            .get("/api/hello")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(body["message"], "Hello from the backend API!");

        let response = client.get("/api/nowhere").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["status"], 404);
    }
}
