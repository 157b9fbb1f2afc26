//! End-to-end tests of the reservation workflow against the record fixtures.

mod common;

use common::{data_dir, date};
use lodging_store::prelude::*;

fn codes(bookings: &[&Booking]) -> Vec<u32> {
    let mut codes: Vec<u32> = bookings.iter().map(|booking| booking.code).collect();
    codes.sort_unstable();
    codes
}

// =============================================================================
// Availability
// =============================================================================

#[test]
fn test_lodging_100_overlap_by_hand() -> anyhow::Result<()> {
    let mut bookings: KeyedStore<u32, Booking> = KeyedStore::new(1);
    let mut lodging = Lodging {
        code: 100,
        nightly_price: 150.0,
        ..Default::default()
    };
    assert!(lodging.bookings.is_empty());

    let booking = Booking {
        code: 1,
        lodging_code: 100,
        entry: date("01/06/2025")?,
        nights: 3,
        ..Default::default()
    };
    assert_eq!(booking.exit(), date("04/06/2025")?);
    bookings.insert(booking.code, booking);
    lodging.attach_booking(1);

    assert!(!lodging.is_available(date("02/06/2025")?, date("03/06/2025")?, &bookings));
    assert!(lodging.is_available(date("05/06/2025")?, date("07/06/2025")?, &bookings));
    Ok(())
}

#[test]
fn test_lodging_100_overlap_through_registry() -> anyhow::Result<()> {
    let mut registry: Registry = Registry::default();
    registry.insert_guest(Guest {
        document: 7,
        ..Default::default()
    });
    registry.insert_lodging(Lodging {
        code: 100,
        nightly_price: 150.0,
        ..Default::default()
    });

    let booking = registry.book(
        BookingRequest {
            lodging_code: 100,
            guest_document: 7,
            entry: date("01/06/2025")?,
            nights: 3,
            payment: PaymentMethod::Pse,
            paid_on: date("01/05/2025")?,
            notes: String::new(),
        },
        date("01/05/2025")?,
    )?;
    assert_eq!(booking.exit(), date("04/06/2025")?);
    assert_eq!(booking.amount, 450.0);

    assert!(!registry.is_available(100, date("02/06/2025")?, date("03/06/2025")?)?);
    assert!(registry.is_available(100, date("05/06/2025")?, date("07/06/2025")?)?);
    Ok(())
}

#[test]
fn test_loaded_records_answer_availability() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let (registry, report) = DataDir::new(dir.path()).load(BookingPolicy::default())?;

    assert!(report.skipped.is_empty());
    assert_eq!(report.loaded(), 3 + 3 + 4 + 4);
    assert!(!registry.is_available(100, date("02/06/2025")?, date("03/06/2025")?)?);
    assert!(registry.is_available(100, date("05/06/2025")?, date("07/06/2025")?)?);
    Ok(())
}

// =============================================================================
// Mutations persisted to disk
// =============================================================================

#[test]
fn test_book_save_reload() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let data = DataDir::new(dir.path());
    let today = date("25/05/2025")?;

    let (mut registry, _) = data.load(BookingPolicy::default())?;
    let code = registry
        .book(
            BookingRequest {
                lodging_code: 200,
                guest_document: 2002,
                entry: date("10/07/2025")?,
                nights: 2,
                payment: PaymentMethod::CreditCard,
                paid_on: today,
                notes: "two adults".to_string(),
            },
            today,
        )?
        .code;
    assert_eq!(code, 58);
    data.save_bookings(&registry)?;

    let (reloaded, _) = data.load(BookingPolicy::default())?;
    assert_eq!(reloaded.last_booking_code(), 58);
    let booking = reloaded
        .bookings()
        .find(&58)
        .ok_or_else(|| anyhow::anyhow!("booking 58 missing"))?;
    assert_eq!(booking.amount, 420.0);
    assert_eq!(booking.notes, "two adults");
    assert!(!reloaded.is_available(200, date("11/07/2025")?, date("12/07/2025")?)?);
    Ok(())
}

#[test]
fn test_cancel_detaches_and_records() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let data = DataDir::new(dir.path());
    let (mut registry, _) = data.load(BookingPolicy::default())?;

    let err = registry.cancel(50, Some(Canceller::Host(1002))).map(|_| ()).unwrap_err();
    assert_eq!(
        err,
        DomainError::NotOwner {
            code: 50,
            by: Canceller::Host(1002)
        }
    );

    let cancelled = registry.cancel(50, Some(Canceller::Guest(2001)))?;
    data.append_cancellation(&cancelled)?;
    data.save_bookings(&registry)?;

    assert!(registry.is_available(100, date("02/06/2025")?, date("03/06/2025")?)?);
    let guest = registry
        .guests()
        .find(&2001)
        .ok_or_else(|| anyhow::anyhow!("guest 2001 missing"))?;
    assert!(!guest.bookings.contains(&50));

    let err = registry.cancel(50, None).map(|_| ()).unwrap_err();
    assert_eq!(err, DomainError::UnknownBooking(50));

    let cancellations = std::fs::read_to_string(dir.path().join("cancelaciones.txt"))?;
    assert_eq!(
        cancellations,
        "01/06/2025;3;50;100;2001;T;20/05/2025;450;llegamos tarde\n"
    );

    let (reloaded, _) = data.load(BookingPolicy::default())?;
    assert_eq!(reloaded.bookings().len(), 3);
    assert_eq!(reloaded.last_booking_code(), 57);
    Ok(())
}

#[test]
fn test_archive_moves_past_stays_to_history() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let data = DataDir::new(dir.path());
    let (mut registry, _) = data.load(BookingPolicy::default())?;

    let archived = registry.archive_before(date("01/03/2025")?, None)?;
    let order: Vec<u32> = archived.iter().map(|booking| booking.code).collect();
    assert_eq!(order, vec![51, 57]);
    data.append_history(&archived)?;
    data.save_bookings(&registry)?;

    let history = std::fs::read_to_string(dir.path().join("historico.txt"))?;
    assert_eq!(history.lines().count(), 2);

    let (reloaded, _) = data.load(BookingPolicy::default())?;
    assert_eq!(reloaded.bookings().len(), 2);
    assert!(reloaded.bookings().contains_key(&50));
    assert!(reloaded.bookings().contains_key(&55));
    Ok(())
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_host_bookings_between() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let (registry, _) = DataDir::new(dir.path()).load(BookingPolicy::default())?;

    let found = registry.host_bookings_between(1001, date("01/01/2025")?, date("30/06/2025")?)?;
    assert_eq!(codes(&found), vec![50, 51]);

    let found = registry.host_bookings_between(1001, date("01/02/2025")?, date("30/06/2025")?)?;
    assert_eq!(codes(&found), vec![50]);

    let err = registry
        .host_bookings_between(9, date("01/01/2025")?, date("30/06/2025")?)
        .map(|_| ())
        .unwrap_err();
    assert_eq!(err, DomainError::UnknownHost(9));
    Ok(())
}

#[test]
fn test_search_in_municipality() -> anyhow::Result<()> {
    let dir = data_dir()?;
    let (registry, _) = DataDir::new(dir.path()).load(BookingPolicy::default())?;

    let mut criteria = SearchCriteria {
        entry: date("02/06/2025")?,
        nights: 2,
        municipality: "MEDELLÍN".to_string(),
        max_price: None,
        min_rating: None,
    };
    let found: Vec<u32> = registry.search(&criteria).iter().map(|l| l.code).collect();
    assert_eq!(found, vec![101, 300]);

    criteria.max_price = Some(100.0);
    let found: Vec<u32> = registry.search(&criteria).iter().map(|l| l.code).collect();
    assert_eq!(found, vec![101]);

    criteria.max_price = None;
    criteria.min_rating = Some(4.5);
    let found: Vec<u32> = registry.search(&criteria).iter().map(|l| l.code).collect();
    assert_eq!(found, vec![101]);
    Ok(())
}

#[test]
fn test_unified_error_from_each_layer() -> anyhow::Result<()> {
    fn availability(registry: &Registry, code: u32, entry: &str) -> lodging_store::Result<bool> {
        let entry = Date::parse(entry)?;
        Ok(registry.is_available(code, entry, entry.add_nights(1))?)
    }

    let dir = data_dir()?;
    let (registry, _) = DataDir::new(dir.path()).load(BookingPolicy::default())?;

    assert!(availability(&registry, 100, "10/06/2025")?);
    assert!(availability(&registry, 100, "10-06-2025").map(|_| ()).unwrap_err().is_date());
    assert!(availability(&registry, 999, "10/06/2025").map(|_| ()).unwrap_err().is_domain());

    let missing = tempfile::TempDir::new()?;
    let err: Error = DataDir::new(missing.path())
        .load(BookingPolicy::default())
        .map(|_| ())
        .unwrap_err()
        .into();
    assert!(err.is_record());
    assert!(err.is_io());
    Ok(())
}
