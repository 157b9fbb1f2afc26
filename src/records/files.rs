//! The data directory: loading a [`Registry`] and persisting bookings.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::collections::{Instrument, NoInstrument};
use crate::domain::{Booking, BookingPolicy, Registry, RegistrySizing};
use crate::logging::{debug, error, info, warn};

use super::error::RecordError;
use super::format::{
    parse_booking, parse_booking_header, parse_count_header, parse_guest, parse_host,
    parse_lodging, render_booking,
};

/// File names inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub hosts: String,
    pub guests: String,
    pub lodgings: String,
    pub bookings: String,
    pub history: String,
    pub cancellations: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            hosts: "anfitriones.txt".to_string(),
            guests: "huespedes.txt".to_string(),
            lodgings: "alojamientos.txt".to_string(),
            bookings: "reservaciones.txt".to_string(),
            history: "historico.txt".to_string(),
            cancellations: "cancelaciones.txt".to_string(),
        }
    }
}

/// A record line that could not be parsed.
#[derive(Debug)]
pub struct SkippedLine {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub reason: RecordError,
}

/// What [`DataDir::load`] read.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub hosts: usize,
    pub guests: usize,
    pub lodgings: usize,
    pub bookings: usize,
    /// Lines whose key replaced a record loaded earlier from the same file.
    pub replaced: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    /// Records present after loading; replaced lines are not counted twice.
    pub fn loaded(&self) -> usize {
        self.hosts + self.guests + self.lodgings + self.bookings
    }

    fn skip(&mut self, file: &Path, line: usize, reason: RecordError) {
        warn!(file = %file.display(), line, error = %reason, "skipping malformed record");
        self.skipped.push(SkippedLine {
            file: file.to_path_buf(),
            line,
            reason,
        });
    }

    fn replace(&mut self, file: &Path, line: usize) {
        warn!(file = %file.display(), line, "record replaces an earlier one with the same key");
        self.replaced += 1;
    }
}

/// A directory holding the six record files.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    names: FileNames,
}

struct RecordFile {
    path: PathBuf,
    header: String,
    body: Vec<(usize, String)>,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_names(root, FileNames::default())
    }

    pub fn with_names(root: impl Into<PathBuf>, names: FileNames) -> Self {
        Self {
            root: root.into(),
            names,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &FileNames {
        &self.names
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load every record file into a fresh registry.
    ///
    /// Header counts only size the stores. Malformed lines are skipped and
    /// listed in the report; a missing or unreadable file is an error.
    pub fn load(&self, policy: BookingPolicy) -> Result<(Registry, LoadReport), RecordError> {
        self.load_with_instrument(policy, NoInstrument)
    }

    /// Like [`DataDir::load`], with every store reporting to `instrument`.
    pub fn load_with_instrument<I: Instrument + Clone>(
        &self,
        policy: BookingPolicy,
        instrument: I,
    ) -> Result<(Registry<I>, LoadReport), RecordError> {
        info!(root = %self.root.display(), "loading data directory");

        let hosts = self.read(&self.names.hosts)?;
        let guests = self.read(&self.names.guests)?;
        let lodgings = self.read(&self.names.lodgings)?;
        let bookings = self.read(&self.names.bookings)?;

        let (booking_count, last_code) = parse_booking_header(&bookings.header)
            .map_err(|err| header_error(&bookings.path, err))?;
        let sizing = RegistrySizing {
            hosts: parse_count_header(&hosts.header).map_err(|err| header_error(&hosts.path, err))?,
            guests: parse_count_header(&guests.header)
                .map_err(|err| header_error(&guests.path, err))?,
            lodgings: parse_count_header(&lodgings.header)
                .map_err(|err| header_error(&lodgings.path, err))?,
            bookings: booking_count,
        };

        let mut registry = Registry::with_instrument(sizing, policy, instrument);
        registry.bump_last_booking_code(last_code);
        let mut report = LoadReport::default();

        // Hosts may span lines freely, so they are read as a token stream.
        let tokens: Vec<(usize, &str)> = hosts
            .body
            .iter()
            .flat_map(|(line, text)| text.split_whitespace().map(move |token| (*line, token)))
            .collect();
        for chunk in tokens.chunks(4) {
            let line = chunk.first().map_or(0, |(line, _)| *line);
            let text = chunk.iter().map(|(_, token)| *token).collect::<Vec<_>>().join(" ");
            match parse_host(&text) {
                Ok(host) => match registry.insert_host(host) {
                    None => report.hosts += 1,
                    Some(_) => report.replace(&hosts.path, line),
                },
                Err(reason) => report.skip(&hosts.path, line, reason),
            }
        }

        for (line, text) in &guests.body {
            match parse_guest(text) {
                Ok(guest) => match registry.insert_guest(guest) {
                    None => report.guests += 1,
                    Some(_) => report.replace(&guests.path, *line),
                },
                Err(reason) => report.skip(&guests.path, *line, reason),
            }
        }

        for (line, text) in &lodgings.body {
            match parse_lodging(text) {
                Ok(lodging) => match registry.insert_lodging(lodging) {
                    None => report.lodgings += 1,
                    Some(_) => report.replace(&lodgings.path, *line),
                },
                Err(reason) => report.skip(&lodgings.path, *line, reason),
            }
        }

        for (line, text) in &bookings.body {
            match parse_booking(text) {
                Ok(booking) => match registry.insert_booking(booking) {
                    None => report.bookings += 1,
                    Some(_) => report.replace(&bookings.path, *line),
                },
                Err(reason) => report.skip(&bookings.path, *line, reason),
            }
        }

        info!(
            hosts = report.hosts,
            guests = report.guests,
            lodgings = report.lodgings,
            bookings = report.bookings,
            replaced = report.replaced,
            skipped = report.skipped.len(),
            "data directory loaded"
        );
        Ok((registry, report))
    }

    /// Rewrite the booking file from the registry, ordered by booking code.
    pub fn save_bookings<I: Instrument>(&self, registry: &Registry<I>) -> Result<(), RecordError> {
        let path = self.path(&self.names.bookings);
        let mut bookings: Vec<&Booking> = registry.bookings().iter().map(|(_, booking)| booking).collect();
        bookings.sort_by_key(|booking| booking.code);

        let mut contents = format!("{} {}\n", bookings.len(), registry.last_booking_code());
        for booking in bookings {
            contents.push_str(&render_booking(booking));
            contents.push('\n');
        }
        fs::write(&path, contents).map_err(|err| RecordError::io(&path, err))?;
        debug!(path = %path.display(), count = registry.bookings().len(), "bookings saved");
        Ok(())
    }

    /// Append archived bookings to the history file.
    pub fn append_history(&self, bookings: &[Booking]) -> Result<(), RecordError> {
        self.append(&self.names.history, bookings)
    }

    /// Append a cancelled booking to the cancellation file.
    pub fn append_cancellation(&self, booking: &Booking) -> Result<(), RecordError> {
        self.append(&self.names.cancellations, std::slice::from_ref(booking))
    }

    fn append(&self, name: &str, bookings: &[Booking]) -> Result<(), RecordError> {
        let path = self.path(name);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| RecordError::io(&path, err))?;
        for booking in bookings {
            writeln!(file, "{}", render_booking(booking)).map_err(|err| RecordError::io(&path, err))?;
        }
        debug!(path = %path.display(), count = bookings.len(), "bookings appended");
        Ok(())
    }

    fn read(&self, name: &str) -> Result<RecordFile, RecordError> {
        let path = self.path(name);
        let contents = fs::read_to_string(&path).map_err(|err| {
            error!(path = %path.display(), error = %err, "cannot read record file");
            RecordError::io(&path, err)
        })?;
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Err(RecordError::MissingHeader(path));
        };
        let header = header.to_string();
        let body = lines.map(|(line, text)| (line, text.to_string())).collect();
        Ok(RecordFile { path, header, body })
    }
}

fn header_error(path: &Path, err: RecordError) -> RecordError {
    match err {
        RecordError::InvalidHeader(line) => {
            RecordError::InvalidHeader(format!("{}: {line}", path.display()))
        }
        RecordError::InvalidNumber { value, .. } => {
            RecordError::InvalidHeader(format!("{}: {value}", path.display()))
        }
        other => other,
    }
}
