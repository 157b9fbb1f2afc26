//! Bookings (reservations) and how they occupy the calendar.

use std::fmt;

use crate::date::Date;

/// How a booking was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    /// Bank transfer, code `P`.
    #[default]
    Pse,
    /// Credit card, code `T`.
    CreditCard,
}

impl PaymentMethod {
    /// Parse the single-letter code used in the data files.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(Self::Pse),
            'T' => Some(Self::CreditCard),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::Pse => 'P',
            Self::CreditCard => 'T',
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pse => f.write_str("PSE"),
            Self::CreditCard => f.write_str("credit card"),
        }
    }
}

/// A stay of `nights` nights in one lodging, starting on `entry`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Booking {
    /// Unique booking code.
    pub code: u32,

    /// Code of the booked lodging.
    pub lodging_code: u32,

    /// Identity document of the guest.
    pub guest_document: u64,

    /// Check-in date.
    pub entry: Date,

    /// Length of the stay.
    pub nights: u16,

    pub payment: PaymentMethod,

    /// Date the payment was made.
    pub paid_on: Date,

    /// Total amount paid.
    pub amount: f32,

    /// Free-form guest notes.
    pub notes: String,
}

impl Booking {
    /// Check-out date: `entry` plus `nights`.
    pub fn exit(&self) -> Date {
        self.entry.add_nights(self.nights)
    }

    /// Whether the half-open stay `[entry, exit)` intersects this booking's stay.
    pub fn overlaps(&self, entry: Date, exit: Date) -> bool {
        entry < self.exit() && exit > self.entry
    }
}
