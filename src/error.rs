//! Unified error type for the lodging-store library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, making it easier to handle errors in
//! application code.

use thiserror::Error;

use crate::date::InvalidDate;
use crate::domain::DomainError;
use crate::records::RecordError;

/// Unified error type for all lodging-store operations.
///
/// # Example
///
/// ```ignore
/// use lodging_store::{Date, DataDir, BookingPolicy, Result};
///
/// fn cancel(code: u32) -> Result<()> {
///     let data = DataDir::new("data");
///     let (mut registry, _) = data.load(BookingPolicy::default())?;
///     let booking = registry.cancel(code, None)?;
///     data.append_cancellation(&booking)?;
///     data.save_bookings(&registry)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-range date.
    #[error(transparent)]
    Date(#[from] InvalidDate),

    /// Booking rule violation or unknown record.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Error reading or writing record files.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a date error.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns `true` if this is a domain error.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Returns `true` if this is a record file error.
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns `true` for I/O errors, including those raised while touching record files.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Record(RecordError::Io { .. }))
    }
}
