//! Lodgings and their booking calendar.

use std::fmt;

use crate::collections::{Instrument, KeyedStore, Sequence};
use crate::date::Date;

use super::booking::Booking;

/// Kind of property, stored as `1` or `2` in the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LodgingKind {
    #[default]
    House,
    Apartment,
}

impl LodgingKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::House),
            2 => Some(Self::Apartment),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::House => 1,
            Self::Apartment => 2,
        }
    }
}

impl fmt::Display for LodgingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House => f.write_str("house"),
            Self::Apartment => f.write_str("apartment"),
        }
    }
}

/// A bookable property.
#[derive(Debug, Default)]
pub struct Lodging {
    /// Unique lodging code.
    pub code: u32,
    pub name: String,
    /// Identity document of the owning host.
    pub host_document: u64,
    pub department: String,
    pub municipality: String,
    pub kind: LodgingKind,
    pub address: String,
    /// Price of one night.
    pub nightly_price: f32,
    /// Amenities as listed in the data file.
    pub amenities: String,
    /// Codes of the bookings made for this lodging, resolved through the booking store.
    pub bookings: Sequence<u32>,
}

impl Lodging {
    /// Remember `code` as one of this lodging's bookings. Already known codes are ignored.
    pub fn attach_booking(&mut self, code: u32) {
        if !self.bookings.contains(&code) {
            self.bookings.push_front(code);
        }
    }

    pub fn detach_booking(&mut self, code: u32) -> bool {
        self.bookings.remove(&code)
    }

    /// Bookings of this lodging that are still present in `store`.
    pub fn resolve_bookings<'a, I: Instrument>(
        &'a self,
        store: &'a KeyedStore<u32, Booking, I>,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings.iter().filter_map(move |code| store.find(code))
    }

    /// Whether no booking of this lodging overlaps the stay `[entry, exit)`.
    pub fn is_available<I: Instrument>(
        &self,
        entry: Date,
        exit: Date,
        store: &KeyedStore<u32, Booking, I>,
    ) -> bool {
        !self
            .resolve_bookings(store)
            .any(|booking| booking.overlaps(entry, exit))
    }

    /// Available for the stay and located in `municipality` (case-insensitive).
    pub fn is_candidate<I: Instrument>(
        &self,
        entry: Date,
        exit: Date,
        municipality: &str,
        store: &KeyedStore<u32, Booking, I>,
    ) -> bool {
        self.municipality.trim().to_lowercase() == municipality.trim().to_lowercase()
            && self.is_available(entry, exit, store)
    }
}
