//! Line formats of the record files.
//!
//! Hosts are whitespace separated; every other record is `;` separated.
//! The last field of a `;` line keeps any remaining separators, so booking
//! notes may contain `;`.

use std::str::FromStr;

use crate::date::Date;
use crate::domain::{Booking, Guest, Host, Lodging, LodgingKind, PaymentMethod};

use super::error::RecordError;

/// `document credential seniority rating`
pub const HOST_FIELDS: usize = 4;
/// `document;name;credential;seniority;rating`
pub const GUEST_FIELDS: usize = 5;
/// `name;code;host_document;department;municipality;kind;address;price;amenities`
pub const LODGING_FIELDS: usize = 9;
/// `entry;nights;code;lodging;guest;payment;paid_on;amount;notes`
pub const BOOKING_FIELDS: usize = 9;

/// Split `line` at `;` into at most `max` fields, dropping a trailing `\r`.
pub fn split_fields(line: &str, max: usize) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).splitn(max, ';').collect()
}

fn fields(line: &str, expected: usize) -> Result<Vec<&str>, RecordError> {
    let fields = split_fields(line, expected);
    if fields.len() < expected {
        return Err(RecordError::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn number<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    let value = value.trim();
    value.parse().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn date(field: &'static str, value: &str) -> Result<Date, RecordError> {
    Date::parse(value.trim()).map_err(|source| RecordError::InvalidDate { field, source })
}

fn text(value: &str) -> String {
    value.trim().to_string()
}

/// Parse the `count` header of the host, guest and lodging files.
pub fn parse_count_header(line: &str) -> Result<usize, RecordError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(count), None) => number("count", count),
        _ => Err(RecordError::InvalidHeader(line.to_string())),
    }
}

/// Parse the `count last_code` header of the booking file.
pub fn parse_booking_header(line: &str) -> Result<(usize, u32), RecordError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(count), Some(last_code), None) => {
            Ok((number("count", count)?, number("last_code", last_code)?))
        }
        _ => Err(RecordError::InvalidHeader(line.to_string())),
    }
}

pub fn parse_host(line: &str) -> Result<Host, RecordError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [document, credential, seniority, rating] = parts.as_slice() else {
        return Err(RecordError::MissingFields {
            expected: HOST_FIELDS,
            found: parts.len(),
        });
    };
    Ok(Host {
        document: number("document", document)?,
        credential: text(credential),
        seniority_months: number("seniority", seniority)?,
        rating: number("rating", rating)?,
        ..Default::default()
    })
}

pub fn parse_guest(line: &str) -> Result<Guest, RecordError> {
    let fields = fields(line, GUEST_FIELDS)?;
    let [document, name, credential, seniority, rating] = fields.as_slice() else {
        return Err(RecordError::MissingFields {
            expected: GUEST_FIELDS,
            found: fields.len(),
        });
    };
    Ok(Guest {
        document: number("document", document)?,
        name: text(name),
        credential: text(credential),
        seniority_months: number("seniority", seniority)?,
        rating: number("rating", rating)?,
        ..Default::default()
    })
}

pub fn parse_lodging(line: &str) -> Result<Lodging, RecordError> {
    let fields = fields(line, LODGING_FIELDS)?;
    let [name, code, host, department, municipality, kind, address, price, amenities] =
        fields.as_slice()
    else {
        return Err(RecordError::MissingFields {
            expected: LODGING_FIELDS,
            found: fields.len(),
        });
    };
    let kind_code: u8 = number("kind", kind)?;
    Ok(Lodging {
        code: number("code", code)?,
        name: text(name),
        host_document: number("host_document", host)?,
        department: text(department),
        municipality: text(municipality),
        kind: LodgingKind::from_code(kind_code).ok_or(RecordError::InvalidKind(kind_code))?,
        address: text(address),
        nightly_price: number("price", price)?,
        amenities: text(amenities),
        ..Default::default()
    })
}

pub fn parse_booking(line: &str) -> Result<Booking, RecordError> {
    let fields = fields(line, BOOKING_FIELDS)?;
    let [entry, nights, code, lodging, guest, payment, paid_on, amount, notes] = fields.as_slice()
    else {
        return Err(RecordError::MissingFields {
            expected: BOOKING_FIELDS,
            found: fields.len(),
        });
    };
    let payment = payment
        .trim()
        .chars()
        .next()
        .and_then(PaymentMethod::from_code)
        .ok_or_else(|| RecordError::InvalidPayment(payment.trim().to_string()))?;
    Ok(Booking {
        code: number("code", code)?,
        lodging_code: number("lodging_code", lodging)?,
        guest_document: number("guest_document", guest)?,
        entry: date("entry", entry)?,
        nights: number("nights", nights)?,
        payment,
        paid_on: date("paid_on", paid_on)?,
        amount: number("amount", amount)?,
        notes: notes.to_string(),
    })
}

/// Render a booking in the line format read by [`parse_booking`], without a newline.
pub fn render_booking(booking: &Booking) -> String {
    format!(
        "{};{};{};{};{};{};{};{};{}",
        booking.entry,
        booking.nights,
        booking.code,
        booking.lodging_code,
        booking.guest_document,
        booking.payment.code(),
        booking.paid_on,
        booking.amount,
        booking.notes.replace(['\r', '\n'], " "),
    )
}
