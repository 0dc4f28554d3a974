use {
    crate::{
        booking::BookingDesk,
        errors::ApiError,
        models::{BookingConfirmation, BookingRequest, BookingView, EMAIL},
        store::{Filter, SharedStore},
    },
    rocket::{State, get, post, routes, serde::json::Json},
    serde::Serialize,
    validator::Validate,
};

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct BookingsResponse {
    pub bookings: Vec<BookingView>,
}

#[post("/book", data = "<request>")]
pub async fn book_trip(
    desk: &State<BookingDesk>,
    request: Json<BookingRequest>,
) -> Result<Json<BookingConfirmation>, ApiError> {
    request.validate()?;

    let confirmation = desk.book(&request).await?;
    Ok(Json(confirmation))
}

/// Lists bookings, optionally only those made with `email`.
#[get("/bookings?<email>")]
pub async fn list_bookings(
    store: &State<SharedStore>,
    email: Option<&str>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let filter = match email.filter(|email| !email.is_empty()) {
        Some(email) => Filter::all().eq(EMAIL, email),
        None => Filter::all(),
    };

    let bookings = store
        .bookings(&filter)
        .await?
        .iter()
        .map(|booking| booking.to_view())
        .collect();

    Ok(Json(BookingsResponse { bookings }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![book_trip, list_bookings]
}
