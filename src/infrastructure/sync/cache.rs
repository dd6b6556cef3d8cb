use crate::domain::entities::{Booking, BookingPatch};

/// In-memory copy of the polled booking collection. Owned exclusively by one
/// polling controller; never shared between views. Every write is either a
/// wholesale replacement from an authoritative fetch or a local optimistic
/// patch, and the replacement always wins.
#[derive(Debug, Default)]
pub struct BookingCache {
    bookings: Vec<Booking>,
}

impl BookingCache {
    /// Install a fresh server snapshot, discarding any optimistic patches.
    pub fn replace(&mut self, bookings: Vec<Booking>) {
        self.bookings = bookings;
    }

    /// Patch one cached booking in place. Returns false when the booking is
    /// not in the cache (deleted or filtered out since the patch was built).
    pub fn patch(&mut self, booking_id: i64, patch: &BookingPatch) -> bool {
        match self.bookings.iter_mut().find(|b| b.booking_id == booking_id) {
            Some(booking) => {
                patch.apply(booking);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, booking_id: i64) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.booking_id == booking_id)
    }

    pub fn snapshot(&self) -> Vec<Booking> {
        self.bookings.clone()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
