//! # HTTP handlers
//!
//! Thin Rocket endpoints over the booking services. Every response body is JSON,
//! including errors produced by the catchers below.

pub mod bookings;
pub mod misc;
pub mod trips;

use rocket::{Request, catch, get, http::Status, serde::json::Json};
use serde_json::{Value, json};

#[get("/")]
pub fn index() -> Json<Value> {
    Json(json!({ "message": "Bus Booking API is running" }))
}

#[get("/hello")]
pub fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the backend API!" }))
}

fn error_body(status: Status, message: &str) -> Json<Value> {
    Json(json!({
        "error": message,
        "status": status.code
    }))
}

#[catch(404)]
pub fn catch404(request: &Request) -> Json<Value> {
    error_body(Status::NotFound, &format!("No route for {}", request.uri()))
}

#[catch(422)]
pub fn catch422(_: &Request) -> Json<Value> {
    error_body(
        Status::UnprocessableEntity,
        "Request is missing required fields or has malformed values",
    )
}

#[catch(400)]
pub fn catch400(_: &Request) -> Json<Value> {
    error_body(Status::BadRequest, "Malformed request")
}

#[catch(500)]
pub fn catch500(_: &Request) -> Json<Value> {
    error_body(Status::InternalServerError, "Internal server error")
}
