//! The registry owns the four authoritative stores and enforces booking rules.
//!
//! Hosts, guests, lodgings and bookings each live in exactly one
//! [`KeyedStore`]. Objects refer to each other by key only: a lodging keeps the
//! codes of its bookings, a host the codes of its lodgings. Those codes are
//! resolved through the owning store every time they are followed, so erasing
//! a booking can never leave a dangling reference behind.

use std::fmt;

use crate::collections::{Instrument, KeyedStore, NoInstrument, Sequence};
use crate::date::Date;
use crate::logging::{debug, info, trace};

use super::booking::{Booking, PaymentMethod};
use super::error::DomainError;
use super::guest::Guest;
use super::host::Host;
use super::lodging::Lodging;

/// Expected number of records per store. Each store's bucket count is fixed from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySizing {
    pub hosts: usize,
    pub guests: usize,
    pub lodgings: usize,
    pub bookings: usize,
}

impl Default for RegistrySizing {
    fn default() -> Self {
        Self {
            hosts: 10,
            guests: 10,
            lodgings: 10,
            bookings: 10,
        }
    }
}

/// Limits applied by [`Registry::book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Longest stay, in nights.
    pub max_nights: u16,
    /// Longest notes text, in characters.
    pub max_notes_len: usize,
    /// How far ahead an entry date may be, and how long after entry the exit may fall.
    pub horizon_years: u8,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_nights: 365,
            max_notes_len: 1000,
            horizon_years: 1,
        }
    }
}

/// A booking as requested by a guest, before a code and amount are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub lodging_code: u32,
    pub guest_document: u64,
    pub entry: Date,
    pub nights: u16,
    pub payment: PaymentMethod,
    pub paid_on: Date,
    pub notes: String,
}

/// Filters for [`Registry::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub entry: Date,
    pub nights: u16,
    /// Compared case-insensitively.
    pub municipality: String,
    /// Highest nightly price. `None` or a non-positive value disables the filter.
    pub max_price: Option<f32>,
    /// Lowest host rating. `None` or a non-positive value disables the filter.
    pub min_rating: Option<f32>,
}

/// Who asks for a cancellation.
///
/// A host may cancel bookings of its own lodgings; a guest only its own bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canceller {
    Host(u64),
    Guest(u64),
}

impl fmt::Display for Canceller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(document) => write!(f, "host {document}"),
            Self::Guest(document) => write!(f, "guest {document}"),
        }
    }
}

/// Record counts and memory figures for every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub hosts: usize,
    pub guests: usize,
    pub lodgings: usize,
    pub bookings: usize,
    pub last_booking_code: u32,
    /// Longest chain across all stores.
    pub longest_chain: usize,
    pub approx_memory_usage: usize,
}

/// In-memory database of the simulator.
#[derive(Debug)]
pub struct Registry<I: Instrument = NoInstrument> {
    hosts: KeyedStore<u64, Host, I>,
    guests: KeyedStore<u64, Guest, I>,
    lodgings: KeyedStore<u32, Lodging, I>,
    bookings: KeyedStore<u32, Booking, I>,
    last_booking_code: u32,
    policy: BookingPolicy,
}

impl Registry {
    pub fn new(sizing: RegistrySizing, policy: BookingPolicy) -> Self {
        Self::with_instrument(sizing, policy, NoInstrument)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistrySizing::default(), BookingPolicy::default())
    }
}

impl<I: Instrument + Clone> Registry<I> {
    /// Build a registry whose four stores all report to `instrument`.
    pub fn with_instrument(sizing: RegistrySizing, policy: BookingPolicy, instrument: I) -> Self {
        debug!(
            hosts = sizing.hosts,
            guests = sizing.guests,
            lodgings = sizing.lodgings,
            bookings = sizing.bookings,
            "creating registry"
        );
        Self {
            hosts: KeyedStore::with_instrument(sizing.hosts, instrument.clone()),
            guests: KeyedStore::with_instrument(sizing.guests, instrument.clone()),
            lodgings: KeyedStore::with_instrument(sizing.lodgings, instrument.clone()),
            bookings: KeyedStore::with_instrument(sizing.bookings, instrument),
            last_booking_code: 0,
            policy,
        }
    }
}

impl<I: Instrument> Registry<I> {
    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    pub fn hosts(&self) -> &KeyedStore<u64, Host, I> {
        &self.hosts
    }

    pub fn guests(&self) -> &KeyedStore<u64, Guest, I> {
        &self.guests
    }

    pub fn lodgings(&self) -> &KeyedStore<u32, Lodging, I> {
        &self.lodgings
    }

    pub fn bookings(&self) -> &KeyedStore<u32, Booking, I> {
        &self.bookings
    }

    /// Highest booking code handed out or loaded so far.
    pub fn last_booking_code(&self) -> u32 {
        self.last_booking_code
    }

    /// Raise the last booking code, e.g. from a data file header. Never lowers it.
    pub fn bump_last_booking_code(&mut self, code: u32) {
        self.last_booking_code = self.last_booking_code.max(code);
    }

    /// Insert a host, linking lodgings already registered under its document.
    ///
    /// Returns the host previously stored under the same document.
    pub fn insert_host(&mut self, mut host: Host) -> Option<Host> {
        for (code, lodging) in self.lodgings.iter() {
            if lodging.host_document == host.document {
                host.attach_lodging(*code);
            }
        }
        self.hosts.insert(host.document, host)
    }

    /// Insert a guest, linking bookings already registered under its document.
    pub fn insert_guest(&mut self, mut guest: Guest) -> Option<Guest> {
        for (code, booking) in self.bookings.iter() {
            if booking.guest_document == guest.document {
                guest.attach_booking(*code);
            }
        }
        self.guests.insert(guest.document, guest)
    }

    /// Insert a lodging, linking it to its host and to bookings already registered for it.
    ///
    /// A lodging replaced under the same code by another host is detached from the old host.
    pub fn insert_lodging(&mut self, mut lodging: Lodging) -> Option<Lodging> {
        let previous_host = self
            .lodgings
            .find(&lodging.code)
            .map(|previous| previous.host_document)
            .filter(|document| *document != lodging.host_document);
        if let Some(document) = previous_host {
            if let Some(host) = self.hosts.find_mut(&document) {
                host.detach_lodging(lodging.code);
            }
            trace!(code = lodging.code, from = document, to = lodging.host_document, "lodging changed host");
        }
        for (code, booking) in self.bookings.iter() {
            if booking.lodging_code == lodging.code {
                lodging.attach_booking(*code);
            }
        }
        if let Some(host) = self.hosts.find_mut(&lodging.host_document) {
            host.attach_lodging(lodging.code);
        }
        self.lodgings.insert(lodging.code, lodging)
    }

    /// Insert a booking, linking it to its lodging and guest when they exist.
    ///
    /// A booking replaced under the same code is unlinked first and returned.
    pub fn insert_booking(&mut self, booking: Booking) -> Option<Booking> {
        if let Some(previous) = self.bookings.find(&booking.code) {
            let (lodging_code, guest_document) = (previous.lodging_code, previous.guest_document);
            self.unlink_booking(booking.code, lodging_code, guest_document);
        }
        if let Some(lodging) = self.lodgings.find_mut(&booking.lodging_code) {
            lodging.attach_booking(booking.code);
        }
        if let Some(guest) = self.guests.find_mut(&booking.guest_document) {
            guest.attach_booking(booking.code);
        }
        self.bump_last_booking_code(booking.code);
        trace!(code = booking.code, lodging = booking.lodging_code, "booking linked");
        self.bookings.insert(booking.code, booking)
    }

    /// Whether the lodging has no booking overlapping `[entry, exit)`.
    pub fn is_available(&self, lodging_code: u32, entry: Date, exit: Date) -> Result<bool, DomainError> {
        let lodging = self
            .lodgings
            .find(&lodging_code)
            .ok_or(DomainError::UnknownLodging(lodging_code))?;
        Ok(lodging.is_available(entry, exit, &self.bookings))
    }

    /// Validate `request` against the booking rules and store it under the next code.
    pub fn book(&mut self, request: BookingRequest, today: Date) -> Result<&Booking, DomainError> {
        let policy = self.policy;
        let entry = request.entry;

        if entry < today {
            return Err(DomainError::EntryInPast { entry, today });
        }
        let limit = today.add_years(policy.horizon_years);
        if entry >= limit {
            return Err(DomainError::EntryBeyondHorizon { entry, limit });
        }
        if request.nights == 0 || request.nights > policy.max_nights {
            return Err(DomainError::InvalidNights {
                nights: request.nights,
                max: policy.max_nights,
            });
        }
        let exit = entry.add_nights(request.nights);
        let exit_limit = entry.add_years(policy.horizon_years);
        if exit > exit_limit {
            return Err(DomainError::ExitBeyondHorizon { exit, limit: exit_limit });
        }
        if request.paid_on > today {
            return Err(DomainError::PaymentInFuture {
                paid_on: request.paid_on,
                today,
            });
        }
        let notes_len = request.notes.chars().count();
        if notes_len > policy.max_notes_len {
            return Err(DomainError::NotesTooLong {
                len: notes_len,
                max: policy.max_notes_len,
            });
        }

        let guest = self
            .guests
            .find(&request.guest_document)
            .ok_or(DomainError::UnknownGuest(request.guest_document))?;
        let lodging = self
            .lodgings
            .find(&request.lodging_code)
            .ok_or(DomainError::UnknownLodging(request.lodging_code))?;

        if guest.has_booking_between(entry, exit, &self.bookings) {
            return Err(DomainError::GuestOverlap {
                guest: request.guest_document,
                entry,
                exit,
            });
        }
        if !lodging.is_available(entry, exit, &self.bookings) {
            return Err(DomainError::Unavailable {
                lodging: request.lodging_code,
                entry,
                exit,
            });
        }

        let amount = lodging.nightly_price * f32::from(request.nights);
        let code = self
            .last_booking_code
            .checked_add(1)
            .ok_or(DomainError::CodesExhausted)?;

        let booking = Booking {
            code,
            lodging_code: request.lodging_code,
            guest_document: request.guest_document,
            entry,
            nights: request.nights,
            payment: request.payment,
            paid_on: request.paid_on,
            amount,
            notes: request.notes,
        };
        info!(
            code,
            lodging = booking.lodging_code,
            guest = booking.guest_document,
            entry = %entry,
            exit = %exit,
            amount,
            "booking created"
        );
        self.insert_booking(booking);
        self.bookings.find(&code).ok_or(DomainError::UnknownBooking(code))
    }

    /// Remove a booking and every back-reference to it, handing it to the caller.
    ///
    /// With `by`, the booking must belong to one of that host's lodgings or to that guest.
    pub fn cancel(&mut self, code: u32, by: Option<Canceller>) -> Result<Booking, DomainError> {
        let booking = self.bookings.find(&code).ok_or(DomainError::UnknownBooking(code))?;
        if let Some(by) = by {
            let owned = match by {
                Canceller::Host(document) => self
                    .hosts
                    .find(&document)
                    .ok_or(DomainError::UnknownHost(document))?
                    .owns_lodging(booking.lodging_code),
                Canceller::Guest(document) => self
                    .guests
                    .find(&document)
                    .ok_or(DomainError::UnknownGuest(document))?
                    .bookings
                    .contains(&code),
            };
            if !owned {
                return Err(DomainError::NotOwner { code, by });
            }
        }

        let booking = self.take_booking(code).ok_or(DomainError::UnknownBooking(code))?;
        info!(code, lodging = booking.lodging_code, guest = booking.guest_document, "booking cancelled");
        Ok(booking)
    }

    /// Remove every booking whose exit date precedes `cutoff`, oldest exit first.
    ///
    /// With `host`, only bookings of that host's lodgings are considered.
    pub fn archive_before(&mut self, cutoff: Date, host: Option<u64>) -> Result<Vec<Booking>, DomainError> {
        let scope: Option<Vec<u32>> = match host {
            Some(document) => {
                let host = self.hosts.find(&document).ok_or(DomainError::UnknownHost(document))?;
                Some(host.lodgings.iter().copied().collect())
            }
            None => None,
        };

        let codes: Vec<u32> = {
            let mut ordered: Sequence<&Booking> = Sequence::new();
            for (_, booking) in self.bookings.iter() {
                let in_scope = scope
                    .as_ref()
                    .is_none_or(|lodgings| lodgings.contains(&booking.lodging_code));
                if in_scope && booking.exit() < cutoff {
                    ordered.insert_sorted(booking, |a, b| a.exit() < b.exit());
                }
            }
            ordered.iter().map(|booking| booking.code).collect()
        };

        let archived: Vec<Booking> = codes
            .into_iter()
            .filter_map(|code| self.take_booking(code))
            .collect();
        info!(count = archived.len(), cutoff = %cutoff, "bookings archived");
        Ok(archived)
    }

    /// Bookings of the host's lodgings whose entry date lies in `[from, to]`.
    ///
    /// Results are grouped per lodging and ordered by entry date within each group.
    pub fn host_bookings_between(&self, host: u64, from: Date, to: Date) -> Result<Vec<&Booking>, DomainError> {
        let host = self.hosts.find(&host).ok_or(DomainError::UnknownHost(host))?;
        let mut found = Vec::new();
        for lodging in host.resolve_lodgings(&self.lodgings) {
            let mut ordered: Sequence<&Booking> = Sequence::new();
            for booking in lodging.resolve_bookings(&self.bookings) {
                if booking.entry >= from && booking.entry <= to {
                    ordered.insert_sorted(booking, |a, b| a.entry < b.entry);
                }
            }
            found.extend(ordered.iter().copied());
        }
        Ok(found)
    }

    /// Lodgings free for the requested stay that pass every active filter, ordered by code.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&Lodging> {
        let exit = criteria.entry.add_nights(criteria.nights);
        let max_price = criteria.max_price.filter(|price| *price > 0.0);
        let min_rating = criteria.min_rating.filter(|rating| *rating > 0.0);

        let mut found: Vec<&Lodging> = self
            .lodgings
            .iter()
            .map(|(_, lodging)| lodging)
            .filter(|lodging| max_price.is_none_or(|max| lodging.nightly_price <= max))
            .filter(|lodging| {
                self.hosts
                    .find(&lodging.host_document)
                    .is_some_and(|host| min_rating.is_none_or(|min| host.rating >= min))
            })
            .filter(|lodging| lodging.is_candidate(criteria.entry, exit, &criteria.municipality, &self.bookings))
            .collect();
        found.sort_by_key(|lodging| lodging.code);
        debug!(count = found.len(), municipality = %criteria.municipality, "search finished");
        found
    }

    pub fn approx_memory_usage(&self) -> usize {
        self.hosts.approx_memory_usage()
            + self.guests.approx_memory_usage()
            + self.lodgings.approx_memory_usage()
            + self.bookings.approx_memory_usage()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            hosts: self.hosts.len(),
            guests: self.guests.len(),
            lodgings: self.lodgings.len(),
            bookings: self.bookings.len(),
            last_booking_code: self.last_booking_code,
            longest_chain: [
                self.hosts.longest_chain(),
                self.guests.longest_chain(),
                self.lodgings.longest_chain(),
                self.bookings.longest_chain(),
            ]
            .into_iter()
            .max()
            .unwrap_or(0),
            approx_memory_usage: self.approx_memory_usage(),
        }
    }

    fn take_booking(&mut self, code: u32) -> Option<Booking> {
        let booking = self.bookings.erase(&code)?;
        self.unlink_booking(code, booking.lodging_code, booking.guest_document);
        Some(booking)
    }

    fn unlink_booking(&mut self, code: u32, lodging_code: u32, guest_document: u64) {
        if let Some(lodging) = self.lodgings.find_mut(&lodging_code) {
            lodging.detach_booking(code);
        }
        if let Some(guest) = self.guests.find_mut(&guest_document) {
            guest.detach_booking(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::OpCounters;
    use crate::domain::LodgingKind;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn sample() -> Registry {
        let mut registry: Registry = Registry::default();
        registry.insert_host(Host {
            document: 1,
            credential: "secret".to_string(),
            seniority_months: 12,
            rating: 4.5,
            ..Default::default()
        });
        registry.insert_host(Host {
            document: 2,
            rating: 3.0,
            ..Default::default()
        });
        registry.insert_guest(Guest {
            document: 900,
            name: "Ana".to_string(),
            ..Default::default()
        });
        registry.insert_guest(Guest {
            document: 901,
            name: "Luis".to_string(),
            ..Default::default()
        });
        registry.insert_lodging(Lodging {
            code: 100,
            name: "Casa Azul".to_string(),
            host_document: 1,
            municipality: "Medellin".to_string(),
            kind: LodgingKind::House,
            nightly_price: 150.0,
            ..Default::default()
        });
        registry.insert_lodging(Lodging {
            code: 200,
            name: "Loft".to_string(),
            host_document: 2,
            municipality: "Medellin".to_string(),
            kind: LodgingKind::Apartment,
            nightly_price: 80.0,
            ..Default::default()
        });
        registry
    }

    fn request(lodging: u32, guest: u64, entry: &str, nights: u16) -> BookingRequest {
        BookingRequest {
            lodging_code: lodging,
            guest_document: guest,
            entry: d(entry),
            nights,
            payment: PaymentMethod::CreditCard,
            paid_on: d("15/05/2025"),
            notes: String::new(),
        }
    }

    const TODAY: &str = "20/05/2025";

    #[test]
    fn test_book_assigns_code_and_amount() {
        let mut registry = sample();
        registry.bump_last_booking_code(41);

        let booking = registry
            .book(request(100, 900, "01/06/2025", 3), d(TODAY))
            .unwrap();
        assert_eq!(booking.code, 42);
        assert_eq!(booking.amount, 450.0);
        assert_eq!(booking.exit(), d("04/06/2025"));

        assert!(registry.lodgings().find(&100).unwrap().bookings.contains(&42));
        assert!(registry.guests().find(&900).unwrap().bookings.contains(&42));
        assert_eq!(registry.last_booking_code(), 42);
    }

    #[test]
    fn test_book_rejects_rule_violations() {
        let mut registry = sample();
        let today = d(TODAY);

        let err = registry.book(request(100, 900, "19/05/2025", 1), today).unwrap_err();
        assert!(matches!(err, DomainError::EntryInPast { .. }));

        let err = registry.book(request(100, 900, "20/05/2026", 1), today).unwrap_err();
        assert!(matches!(err, DomainError::EntryBeyondHorizon { .. }));

        let err = registry.book(request(100, 900, "01/06/2025", 0), today).unwrap_err();
        assert!(matches!(err, DomainError::InvalidNights { nights: 0, .. }));

        let err = registry.book(request(100, 900, "01/06/2025", 366), today).unwrap_err();
        assert!(matches!(err, DomainError::InvalidNights { nights: 366, .. }));

        let mut late_payment = request(100, 900, "01/06/2025", 2);
        late_payment.paid_on = d("21/05/2025");
        let err = registry.book(late_payment, today).unwrap_err();
        assert!(matches!(err, DomainError::PaymentInFuture { .. }));

        let mut chatty = request(100, 900, "01/06/2025", 2);
        chatty.notes = "x".repeat(1001);
        let err = registry.book(chatty, today).unwrap_err();
        assert_eq!(err, DomainError::NotesTooLong { len: 1001, max: 1000 });

        let err = registry.book(request(999, 900, "01/06/2025", 2), today).unwrap_err();
        assert_eq!(err, DomainError::UnknownLodging(999));

        let err = registry.book(request(100, 5, "01/06/2025", 2), today).unwrap_err();
        assert_eq!(err, DomainError::UnknownGuest(5));

        assert!(registry.bookings().is_empty());
    }

    #[test]
    fn test_book_rejects_overlaps() {
        let mut registry = sample();
        let today = d(TODAY);
        registry.book(request(100, 900, "01/06/2025", 3), today).unwrap();

        let err = registry.book(request(100, 901, "02/06/2025", 1), today).unwrap_err();
        assert!(matches!(err, DomainError::Unavailable { lodging: 100, .. }));

        let err = registry.book(request(200, 900, "03/06/2025", 2), today).unwrap_err();
        assert!(matches!(err, DomainError::GuestOverlap { guest: 900, .. }));

        // Back-to-back stays are fine.
        registry.book(request(100, 901, "04/06/2025", 2), today).unwrap();
        assert_eq!(registry.bookings().len(), 2);
    }

    #[test]
    fn test_availability_queries() {
        let mut registry = sample();
        registry.book(request(100, 900, "01/06/2025", 3), d(TODAY)).unwrap();

        assert!(!registry.is_available(100, d("02/06/2025"), d("03/06/2025")).unwrap());
        assert!(registry.is_available(100, d("05/06/2025"), d("07/06/2025")).unwrap());
        assert_eq!(
            registry.is_available(7, d("05/06/2025"), d("07/06/2025")),
            Err(DomainError::UnknownLodging(7))
        );
    }

    #[test]
    fn test_cancel_detaches_everything() {
        let mut registry = sample();
        let code = registry.book(request(100, 900, "01/06/2025", 3), d(TODAY)).unwrap().code;

        let cancelled = registry.cancel(code, None).unwrap();
        assert_eq!(cancelled.code, code);
        assert!(registry.bookings().is_empty());
        assert!(registry.lodgings().find(&100).unwrap().bookings.is_empty());
        assert!(registry.guests().find(&900).unwrap().bookings.is_empty());
        assert!(registry.is_available(100, d("01/06/2025"), d("04/06/2025")).unwrap());

        assert_eq!(registry.cancel(code, None), Err(DomainError::UnknownBooking(code)));
    }

    #[test]
    fn test_cancel_checks_owner() {
        let mut registry = sample();
        let code = registry.book(request(100, 900, "01/06/2025", 3), d(TODAY)).unwrap().code;

        assert_eq!(
            registry.cancel(code, Some(Canceller::Host(2))),
            Err(DomainError::NotOwner {
                code,
                by: Canceller::Host(2)
            })
        );
        assert_eq!(
            registry.cancel(code, Some(Canceller::Guest(901))),
            Err(DomainError::NotOwner {
                code,
                by: Canceller::Guest(901)
            })
        );
        assert_eq!(
            registry.cancel(code, Some(Canceller::Host(7))),
            Err(DomainError::UnknownHost(7))
        );
        assert!(registry.bookings().contains_key(&code));

        let cancelled = registry.cancel(code, Some(Canceller::Host(1))).unwrap();
        assert_eq!(cancelled.code, code);

        let code = registry.book(request(200, 901, "01/06/2025", 2), d(TODAY)).unwrap().code;
        assert!(registry.cancel(code, Some(Canceller::Guest(901))).is_ok());
        assert!(registry.bookings().is_empty());
    }

    #[test]
    fn test_archive_orders_by_exit() {
        let mut registry = sample();
        for (code, lodging, entry, nights) in [
            (1, 100, "10/01/2025", 5),
            (2, 200, "01/01/2025", 2),
            (3, 100, "02/01/2025", 3),
            (4, 200, "01/03/2025", 2),
        ] {
            registry.insert_booking(Booking {
                code,
                lodging_code: lodging,
                guest_document: 900,
                entry: d(entry),
                nights,
                ..Default::default()
            });
        }

        let archived = registry.archive_before(d("01/02/2025"), None).unwrap();
        let codes: Vec<u32> = archived.iter().map(|b| b.code).collect();
        assert_eq!(codes, vec![2, 3, 1]);
        assert_eq!(registry.bookings().len(), 1);
        assert_eq!(registry.guests().find(&900).unwrap().bookings.len(), 1);
        assert_eq!(registry.last_booking_code(), 4);
    }

    #[test]
    fn test_archive_scoped_to_host() {
        let mut registry = sample();
        registry.insert_booking(Booking {
            code: 1,
            lodging_code: 100,
            entry: d("01/01/2025"),
            nights: 1,
            ..Default::default()
        });
        registry.insert_booking(Booking {
            code: 2,
            lodging_code: 200,
            entry: d("01/01/2025"),
            nights: 1,
            ..Default::default()
        });

        let archived = registry.archive_before(d("01/02/2025"), Some(2)).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].code, 2);
        assert!(registry.bookings().contains_key(&1));

        assert_eq!(
            registry.archive_before(d("01/02/2025"), Some(3)).unwrap_err(),
            DomainError::UnknownHost(3)
        );
    }

    #[test]
    fn test_host_bookings_between() {
        let mut registry = sample();
        for (code, entry) in [(1, "20/06/2025"), (2, "05/06/2025"), (3, "01/08/2025")] {
            registry.insert_booking(Booking {
                code,
                lodging_code: 100,
                entry: d(entry),
                nights: 2,
                ..Default::default()
            });
        }

        let found = registry
            .host_bookings_between(1, d("01/06/2025"), d("30/06/2025"))
            .unwrap();
        let codes: Vec<u32> = found.iter().map(|b| b.code).collect();
        assert_eq!(codes, vec![2, 1]);

        assert!(registry
            .host_bookings_between(2, d("01/06/2025"), d("30/06/2025"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_search_filters() {
        let mut registry = sample();
        let mut criteria = SearchCriteria {
            entry: d("01/06/2025"),
            nights: 2,
            municipality: "medellin".to_string(),
            max_price: None,
            min_rating: None,
        };
        let codes = |found: Vec<&Lodging>| found.iter().map(|l| l.code).collect::<Vec<_>>();

        assert_eq!(codes(registry.search(&criteria)), vec![100, 200]);

        criteria.max_price = Some(100.0);
        assert_eq!(codes(registry.search(&criteria)), vec![200]);

        criteria.max_price = Some(0.0);
        criteria.min_rating = Some(4.0);
        assert_eq!(codes(registry.search(&criteria)), vec![100]);

        criteria.min_rating = None;
        registry.book(request(200, 901, "01/06/2025", 1), d(TODAY)).unwrap();
        assert_eq!(codes(registry.search(&criteria)), vec![100]);

        criteria.municipality = "Cali".to_string();
        assert!(registry.search(&criteria).is_empty());
    }

    #[test]
    fn test_search_skips_lodgings_without_host() {
        let mut registry = sample();
        registry.insert_lodging(Lodging {
            code: 300,
            host_document: 77,
            municipality: "Medellin".to_string(),
            nightly_price: 50.0,
            ..Default::default()
        });
        let criteria = SearchCriteria {
            entry: d("01/06/2025"),
            nights: 2,
            municipality: "Medellin".to_string(),
            max_price: None,
            min_rating: None,
        };

        let codes: Vec<u32> = registry.search(&criteria).iter().map(|l| l.code).collect();
        assert_eq!(codes, vec![100, 200]);
    }

    #[test]
    fn test_links_are_order_independent() {
        let mut registry: Registry = Registry::default();
        registry.insert_booking(Booking {
            code: 9,
            lodging_code: 100,
            guest_document: 900,
            entry: d("01/06/2025"),
            nights: 1,
            ..Default::default()
        });
        registry.insert_lodging(Lodging {
            code: 100,
            host_document: 1,
            ..Default::default()
        });
        registry.insert_host(Host {
            document: 1,
            ..Default::default()
        });
        registry.insert_guest(Guest {
            document: 900,
            ..Default::default()
        });

        assert!(registry.lodgings().find(&100).unwrap().bookings.contains(&9));
        assert!(registry.hosts().find(&1).unwrap().lodgings.contains(&100));
        assert!(registry.guests().find(&900).unwrap().bookings.contains(&9));
    }

    #[test]
    fn test_replacing_booking_moves_links() {
        let mut registry = sample();
        let original = Booking {
            code: 1,
            lodging_code: 100,
            guest_document: 900,
            entry: d("01/06/2025"),
            nights: 1,
            ..Default::default()
        };
        registry.insert_booking(original.clone());
        let replaced = registry.insert_booking(Booking {
            lodging_code: 200,
            ..original.clone()
        });

        assert_eq!(replaced, Some(original));
        assert!(registry.lodgings().find(&100).unwrap().bookings.is_empty());
        assert!(registry.lodgings().find(&200).unwrap().bookings.contains(&1));
    }

    #[test]
    fn test_replacing_lodging_moves_host_link() {
        let mut registry = sample();
        registry.insert_booking(Booking {
            code: 5,
            lodging_code: 100,
            guest_document: 900,
            entry: d("01/01/2025"),
            nights: 1,
            ..Default::default()
        });
        registry.insert_lodging(Lodging {
            code: 100,
            host_document: 2,
            municipality: "Medellin".to_string(),
            ..Default::default()
        });

        assert!(!registry.hosts().find(&1).unwrap().owns_lodging(100));
        assert!(registry.hosts().find(&2).unwrap().owns_lodging(100));
        assert!(registry.lodgings().find(&100).unwrap().bookings.contains(&5));
        assert!(registry
            .host_bookings_between(1, d("01/01/2025"), d("31/12/2025"))
            .unwrap()
            .is_empty());

        assert!(registry.archive_before(d("01/02/2025"), Some(1)).unwrap().is_empty());
        assert!(registry.bookings().contains_key(&5));
        assert_eq!(registry.archive_before(d("01/02/2025"), Some(2)).unwrap().len(), 1);
    }

    #[test]
    fn test_shared_instrument_counts_all_stores() {
        let counters = OpCounters::new();
        let mut registry =
            Registry::with_instrument(RegistrySizing::default(), BookingPolicy::default(), &counters);
        registry.insert_host(Host {
            document: 1,
            ..Default::default()
        });
        registry.insert_guest(Guest {
            document: 2,
            ..Default::default()
        });

        let tally = counters.snapshot();
        assert_eq!(tally.inserts, 2);

        let stats = registry.stats();
        assert_eq!(stats.hosts, 1);
        assert_eq!(stats.guests, 1);
        assert_eq!(stats.longest_chain, 1);
        assert!(stats.approx_memory_usage >= 4 * std::mem::size_of::<usize>());
    }
}
