//! Error types for calendar date construction and parsing.

use thiserror::Error;

/// Reasons a date can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDate {
    #[error("Invalid date length: expected 10 characters (DD/MM/YYYY), got {0}")]
    Length(usize),

    #[error("Invalid date layout: expected '/' at position {position}")]
    MissingSeparator { position: usize },

    #[error("Invalid date layout: expected a digit at position {position}")]
    NotADigit { position: usize },

    #[error("Month out of range: {0}")]
    Month(u8),

    #[error("Day {day} out of range for {month:02}/{year:04}")]
    Day { day: u8, month: u8, year: i16 },

    #[error("Year out of range: {0}")]
    Year(i16),
}
