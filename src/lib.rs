//! In-memory reservation simulator built on hand-rolled containers.
//!
//! Records of hosts, guests, lodgings and bookings are loaded from flat text
//! files into fixed-size chained hash stores, queried and mutated, and the
//! bookings written back.
//!
//! # Quick Start
//!
//! ```ignore
//! use lodging_store::prelude::*;
//!
//! let data = DataDir::new("data");
//! let (mut registry, report) = data.load(BookingPolicy::default())?;
//!
//! let entry = Date::parse("01/06/2025")?;
//! let free = registry.is_available(100, entry, entry.add_nights(3))?;
//! ```
//!
//! # Modules
//!
//! - [`date`] - Validated calendar dates and date arithmetic
//! - [`collections`] - The chained [`KeyedStore`] and the linked [`Sequence`]
//! - [`domain`] - Hosts, guests, lodgings, bookings and the [`Registry`]
//! - [`records`] - Parsing and writing the record files
//! - [`config`] - TOML configuration (requires `cli` feature)
//! - [`telemetry`] - Subscriber setup (requires `cli` feature)
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod collections;
#[cfg(feature = "cli")]
pub mod config;
pub mod date;
pub mod domain;
mod logging;
pub mod prelude;
pub mod records;
#[cfg(feature = "cli")]
pub mod telemetry;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

pub use collections::{Instrument, KeyedStore, NoInstrument, OpCounters, Sequence};
pub use date::{Date, InvalidDate, Weekday};
pub use domain::{
    Booking, BookingPolicy, BookingRequest, Canceller, DomainError, Guest, Host, Lodging, LodgingKind,
    PaymentMethod, Registry, RegistrySizing, SearchCriteria,
};
pub use records::{DataDir, LoadReport, RecordError};
