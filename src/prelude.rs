//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use lodging_store::prelude::*;
//!
//! let (registry, _) = DataDir::new("data").load(BookingPolicy::default())?;
//! println!("{} lodgings", registry.lodgings().len());
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Dates
pub use crate::date::{Date, InvalidDate, Weekday};

// Containers
pub use crate::collections::{
    Instrument, KeyedStore, NoInstrument, OpCounters, OpTally, Sequence, StoreOp,
};

// Domain
pub use crate::domain::{
    Booking, BookingPolicy, BookingRequest, Canceller, DomainError, Guest, Host, Lodging, LodgingKind,
    PaymentMethod, Registry, RegistrySizing, RegistryStats, SearchCriteria,
};

// Record files
pub use crate::records::{DataDir, FileNames, LoadReport, RecordError};
