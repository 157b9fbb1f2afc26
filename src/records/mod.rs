//! Flat text record files.
//!
//! # Module Organization
//!
//! - [`format`]: line splitting, parsing and rendering of single records
//! - `files`: the [`DataDir`] that loads a registry and persists bookings
//! - `error`: [`RecordError`]

mod error;
mod files;
pub mod format;

pub use error::RecordError;
pub use files::{DataDir, FileNames, LoadReport, SkippedLine};
pub use format::{
    parse_booking, parse_guest, parse_host, parse_lodging, render_booking, split_fields,
};
