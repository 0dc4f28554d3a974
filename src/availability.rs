use crate::models::{Booking, Trip};

/// Seats still open on `trip` given every booking made against it.
///
/// Never negative: a trip that ended up over-booked reports zero.
pub fn available_seats(trip: &Trip, bookings: &[Booking]) -> u32 {
    let booked: u64 = bookings.iter().map(|booking| u64::from(booking.seats)).sum();
    u64::from(trip.capacity).saturating_sub(booked) as u32
}
