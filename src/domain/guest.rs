//! Guests and the bookings they hold.

use crate::collections::{Instrument, KeyedStore, Sequence};
use crate::date::Date;

use super::booking::Booking;

#[derive(Debug, Default)]
pub struct Guest {
    /// Identity document, unique per guest.
    pub document: u64,
    pub name: String,
    pub credential: String,
    pub seniority_months: u16,
    pub rating: f32,
    /// Codes of the bookings this guest holds.
    pub bookings: Sequence<u32>,
}

impl Guest {
    pub fn attach_booking(&mut self, code: u32) {
        if !self.bookings.contains(&code) {
            self.bookings.push_front(code);
        }
    }

    pub fn detach_booking(&mut self, code: u32) -> bool {
        self.bookings.remove(&code)
    }

    /// Whether any of this guest's bookings overlaps the stay `[entry, exit)`.
    pub fn has_booking_between<I: Instrument>(
        &self,
        entry: Date,
        exit: Date,
        store: &KeyedStore<u32, Booking, I>,
    ) -> bool {
        self.bookings
            .iter()
            .filter_map(|code| store.find(code))
            .any(|booking| booking.overlaps(entry, exit))
    }
}
