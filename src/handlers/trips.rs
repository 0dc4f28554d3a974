use {
    crate::{errors::ApiError, models::TripListing, search::TripSearch},
    chrono::NaiveDate,
    rocket::{FromForm, State, get, routes, serde::json::Json},
    serde::Serialize,
};

/// Query string of `GET /api/trips/search`.
#[derive(FromForm, Debug)]
pub struct TripQuery {
    origin: String,
    destination: String,
    travel_date: String,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct TripsResponse {
    pub trips: Vec<TripListing>,
}

fn parse_travel_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("travel_date must be a YYYY-MM-DD date".to_string()))
}

#[get("/trips/search?<query..>")]
pub async fn search_trips(
    search: &State<TripSearch>,
    query: TripQuery,
) -> Result<Json<TripsResponse>, ApiError> {
    let travel_date = parse_travel_date(&query.travel_date)?;

    let trips = search
        .search(&query.origin, &query.destination, travel_date)
        .await?;

    Ok(Json(TripsResponse { trips }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![search_trips]
}
