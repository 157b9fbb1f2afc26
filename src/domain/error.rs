//! Error types for registry operations.

use thiserror::Error;

use crate::date::Date;

use super::registry::Canceller;

/// Errors that can occur while querying or mutating the registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Host not found: {0}")]
    UnknownHost(u64),

    #[error("Guest not found: {0}")]
    UnknownGuest(u64),

    #[error("Lodging not found: {0}")]
    UnknownLodging(u32),

    #[error("Booking not found: {0}")]
    UnknownBooking(u32),

    #[error("Entry date {entry} is before the current date {today}")]
    EntryInPast { entry: Date, today: Date },

    #[error("Entry date {entry} is not before the booking horizon {limit}")]
    EntryBeyondHorizon { entry: Date, limit: Date },

    #[error("Stay of {nights} nights is outside 1..={max}")]
    InvalidNights { nights: u16, max: u16 },

    #[error("Exit date {exit} is after the latest allowed exit {limit}")]
    ExitBeyondHorizon { exit: Date, limit: Date },

    #[error("Payment date {paid_on} is after the current date {today}")]
    PaymentInFuture { paid_on: Date, today: Date },

    #[error("Notes are {len} characters long, at most {max} are allowed")]
    NotesTooLong { len: usize, max: usize },

    #[error("Guest {guest} already has a booking between {entry} and {exit}")]
    GuestOverlap { guest: u64, entry: Date, exit: Date },

    #[error("Lodging {lodging} is not available between {entry} and {exit}")]
    Unavailable { lodging: u32, entry: Date, exit: Date },

    #[error("Booking {code} does not belong to {by}")]
    NotOwner { code: u32, by: Canceller },

    #[error("Booking codes exhausted")]
    CodesExhausted,
}
