//! Reservation domain: hosts, guests, lodgings, bookings and the [`Registry`] that owns them.
//!
//! # Module Organization
//!
//! - `booking`: a stay and its payment
//! - `lodging`: bookable properties and their availability
//! - `host` / `guest`: people, linked to lodgings and bookings by key
//! - `registry`: the four stores and the booking rules
//! - `error`: [`DomainError`]

mod booking;
mod error;
mod guest;
mod host;
mod lodging;
mod registry;

pub use booking::{Booking, PaymentMethod};
pub use error::DomainError;
pub use guest::Guest;
pub use host::Host;
pub use lodging::{Lodging, LodgingKind};
pub use registry::{
    BookingPolicy, BookingRequest, Canceller, Registry, RegistrySizing, RegistryStats, SearchCriteria,
};
