use {
    chrono::{NaiveDate, NaiveTime},
    mongodb::bson::oid::ObjectId,
    serde::{Deserialize, Serialize},
    std::borrow::Cow,
    validator::{Validate, ValidationError},
};

pub const ID: &str = "_id";
pub const ORIGIN: &str = "origin";
pub const DESTINATION: &str = "destination";
pub const ROUTE_ID: &str = "route_id";
pub const TRAVEL_DATE: &str = "travel_date";
pub const TRIP_ID: &str = "trip_id";
pub const EMAIL: &str = "email";

pub const CONFIRMED: &str = "confirmed";

/// The three collections the booking service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Route,
    Trip,
    Booking,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Route, RecordKind::Trip, RecordKind::Booking];

    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::Route => "busroute",
            RecordKind::Trip => "trip",
            RecordKind::Booking => "booking",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct Route {
    #[serde(rename = "_id")]
    pub oid: ObjectId,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(crate = "rocket::serde")]
pub struct NewRoute {
    #[validate(length(min = 1, message = "origin is required"))]
    pub origin: String,
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub duration_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct Trip {
    #[serde(rename = "_id")]
    pub oid: ObjectId,
    pub route_id: ObjectId,
    pub travel_date: NaiveDate,
    pub departure_time: String,
    pub bus_company: String,
    pub price: f64,
    pub capacity: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(crate = "rocket::serde")]
pub struct NewTrip {
    pub route_id: ObjectId,
    pub travel_date: NaiveDate,
    #[validate(custom(function = "validate_departure_time"))]
    pub departure_time: String,
    #[validate(length(min = 1, message = "bus_company is required"))]
    pub bus_company: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub oid: ObjectId,
    pub trip_id: ObjectId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub seats: u32,
    #[serde(default = "confirmed")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct NewBooking {
    pub trip_id: ObjectId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub seats: u32,
    pub status: String,
}

fn confirmed() -> String {
    CONFIRMED.to_string()
}

fn validate_departure_time(value: &str) -> Result<(), ValidationError> {
    if value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("departure_time")
            .with_message(Cow::from("departure_time must be a 24-hour HH:MM time")))
    }
}

/// Body of `POST /api/book`.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(crate = "rocket::serde")]
pub struct BookingRequest {
    #[validate(length(min = 1, message = "trip_id is required"))]
    pub trip_id: String,
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(range(min = 1, max = 10, message = "seats must be between 1 and 10"))]
    pub seats: u32,
}

impl BookingRequest {
    pub fn to_new_booking(&self, trip_id: ObjectId) -> NewBooking {
        NewBooking {
            trip_id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            seats: self.seats,
            status: confirmed(),
        }
    }
}

/// A stored record, tagged by the collection it lives in.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Route(Route),
    Trip(Trip),
    Booking(Booking),
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Route(NewRoute),
    Trip(NewTrip),
    Booking(NewBooking),
}

/// A single field value as seen by store filters.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Id(ObjectId),
    Text(String),
    Date(NaiveDate),
}

impl From<ObjectId> for FieldValue {
    fn from(oid: ObjectId) -> Self {
        FieldValue::Id(oid)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        FieldValue::Date(date)
    }
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Route(_) => RecordKind::Route,
            Record::Trip(_) => RecordKind::Trip,
            Record::Booking(_) => RecordKind::Booking,
        }
    }

    pub fn oid(&self) -> ObjectId {
        match self {
            Record::Route(route) => route.oid,
            Record::Trip(trip) => trip.oid,
            Record::Booking(booking) => booking.oid,
        }
    }

    /// Looks up a filterable field by its stored name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        if name == ID {
            return Some(FieldValue::Id(self.oid()));
        }

        match self {
            Record::Route(route) => match name {
                ORIGIN => Some(route.origin.as_str().into()),
                DESTINATION => Some(route.destination.as_str().into()),
                _ => None,
            },
            Record::Trip(trip) => match name {
                ROUTE_ID => Some(trip.route_id.into()),
                TRAVEL_DATE => Some(trip.travel_date.into()),
                "bus_company" => Some(trip.bus_company.as_str().into()),
                "departure_time" => Some(trip.departure_time.as_str().into()),
                _ => None,
            },
            Record::Booking(booking) => match name {
                TRIP_ID => Some(booking.trip_id.into()),
                EMAIL => Some(booking.email.as_str().into()),
                "full_name" => Some(booking.full_name.as_str().into()),
                "phone" => Some(booking.phone.as_str().into()),
                "status" => Some(booking.status.as_str().into()),
                _ => None,
            },
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            Record::Route(route) => Some(route),
            _ => None,
        }
    }

    pub fn into_trip(self) -> Option<Trip> {
        match self {
            Record::Trip(trip) => Some(trip),
            _ => None,
        }
    }

    pub fn into_booking(self) -> Option<Booking> {
        match self {
            Record::Booking(booking) => Some(booking),
            _ => None,
        }
    }
}

impl NewRecord {
    pub fn with_id(self, oid: ObjectId) -> Record {
        match self {
            NewRecord::Route(route) => Record::Route(Route {
                oid,
                origin: route.origin,
                destination: route.destination,
                duration_minutes: route.duration_minutes,
            }),
            NewRecord::Trip(trip) => Record::Trip(Trip {
                oid,
                route_id: trip.route_id,
                travel_date: trip.travel_date,
                departure_time: trip.departure_time,
                bus_company: trip.bus_company,
                price: trip.price,
                capacity: trip.capacity,
            }),
            NewRecord::Booking(booking) => Record::Booking(Booking {
                oid,
                trip_id: booking.trip_id,
                full_name: booking.full_name,
                email: booking.email,
                phone: booking.phone,
                seats: booking.seats,
                status: booking.status,
            }),
        }
    }
}

/// A trip joined with its route and current availability, as returned by search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct TripListing {
    #[serde(rename = "_id")]
    pub id: String,
    pub route_id: String,
    pub travel_date: NaiveDate,
    pub departure_time: String,
    pub bus_company: String,
    pub price: f64,
    pub capacity: u32,
    pub available_seats: u32,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: u32,
}

impl TripListing {
    pub fn new(trip: &Trip, route: &Route, available_seats: u32) -> Self {
        TripListing {
            id: trip.oid.to_hex(),
            route_id: trip.route_id.to_hex(),
            travel_date: trip.travel_date,
            departure_time: trip.departure_time.clone(),
            bus_company: trip.bus_company.clone(),
            price: trip.price,
            capacity: trip.capacity,
            available_seats,
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            duration_minutes: route.duration_minutes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct BookingView {
    #[serde(rename = "_id")]
    pub id: String,
    pub trip_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub seats: u32,
    pub status: String,
}

impl Booking {
    pub fn to_view(&self) -> BookingView {
        BookingView {
            id: self.oid.to_hex(),
            trip_id: self.trip_id.to_hex(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            seats: self.seats,
            status: self.status.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct BookingConfirmation {
    pub status: String,
    pub booking_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(seats: u32, email: &str) -> BookingRequest {
        BookingRequest {
            trip_id: ObjectId::new().to_hex(),
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            phone: "+1 555 0100".to_string(),
            seats,
        }
    }

    #[test]
    fn test_booking_request_accepts_seat_bounds() {
        assert!(request(1, "ada@example.com").validate().is_ok());
        assert!(request(10, "ada@example.com").validate().is_ok());
    }

    #[test]
    fn test_booking_request_rejects_out_of_range_seats() {
        let errors = request(0, "ada@example.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("seats"));

        let errors = request(11, "ada@example.com").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("seats"));
    }

    #[test]
    fn test_booking_request_rejects_bad_email() {
        let errors = request(2, "not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_new_trip_departure_time() {
        let mut trip = NewTrip {
            route_id: ObjectId::new(),
            travel_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            departure_time: "08:00".to_string(),
            bus_company: "SwiftBus".to_string(),
            price: 39.99,
            capacity: 40,
        };
        assert!(trip.validate().is_ok());

        trip.departure_time = "8:00".to_string();
        assert!(trip.validate().is_err());

        trip.departure_time = "24:10".to_string();
        assert!(trip.validate().is_err());
    }

    #[test]
    fn test_new_trip_rejects_zero_capacity_and_negative_price() {
        let trip = NewTrip {
            route_id: ObjectId::new(),
            travel_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            departure_time: "17:30".to_string(),
            bus_company: "MetroLines".to_string(),
            price: -1.0,
            capacity: 0,
        };
        let errors = trip.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("capacity"));
    }

    #[test]
    fn test_new_route_requires_positive_duration() {
        let route = NewRoute {
            origin: "New York".to_string(),
            destination: "Boston".to_string(),
            duration_minutes: 0,
        };
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_record_fields() {
        let route_id = ObjectId::new();
        let record = NewRecord::Trip(NewTrip {
            route_id,
            travel_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            departure_time: "07:15".to_string(),
            bus_company: "Pacific Coaches".to_string(),
            price: 59.0,
            capacity: 45,
        })
        .with_id(ObjectId::new());

        assert_eq!(record.kind(), RecordKind::Trip);
        assert_eq!(record.field(ROUTE_ID), Some(FieldValue::Id(route_id)));
        assert_eq!(
            record.field(TRAVEL_DATE),
            Some(FieldValue::Date(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()))
        );
        assert_eq!(record.field(ORIGIN), None);
    }

    #[test]
    fn test_booking_missing_seats_defaults_to_zero() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "_id": { "$oid": "65f1c0a2b3c4d5e6f7a8b9c0" },
            "trip_id": { "$oid": "65f1c0a2b3c4d5e6f7a8b9c1" },
            "full_name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "555-0101"
        }))
        .unwrap();

        assert_eq!(booking.seats, 0);
        assert_eq!(booking.status, CONFIRMED);
    }
}
