//! Field-level checks shared by the services. Each returns the normalized
//! value or an [`StoreError::InvalidInput`] naming the field.

use chrono::{DateTime, Datelike, Utc};
use sea_orm::prelude::Decimal;

use crate::error::{Result, StoreError};

/// Trimmed, upper-cased code of exactly `len` characters (aircraft and
/// airport codes, flight numbers).
pub(crate) fn code(field: &str, value: &str, len: usize) -> Result<String> {
    let value = value.trim().to_uppercase();
    if value.chars().count() != len {
        return Err(StoreError::invalid(format!(
            "{field} must be exactly {len} characters, got {value:?}"
        )));
    }
    Ok(value)
}

/// Booking reference: six letters or digits, upper-cased.
pub(crate) fn book_ref(value: &str) -> Result<String> {
    let value = code("booking reference", value, 6)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StoreError::invalid(format!(
            "booking reference {value:?} may contain only letters and digits"
        )));
    }
    Ok(value)
}

/// Ticket number: exactly 13 characters, kept as written.
pub(crate) fn ticket_no(value: &str) -> Result<String> {
    let value = value.trim();
    if value.chars().count() != 13 {
        return Err(StoreError::invalid(format!(
            "ticket number must be exactly 13 characters, got {value:?}"
        )));
    }
    Ok(value.to_string())
}

/// Non-blank text of at most `max` characters.
pub(crate) fn bounded(field: &str, value: &str, max: usize) -> Result<String> {
    let value = non_blank(field, value)?;
    if value.chars().count() > max {
        return Err(StoreError::invalid(format!(
            "{field} must not exceed {max} characters"
        )));
    }
    Ok(value)
}

pub(crate) fn non_blank(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::invalid(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Seat label in an aircraft layout, 1 to 4 characters.
pub(crate) fn seat_no(value: &str) -> Result<String> {
    bounded("seat number", &value.to_uppercase(), 4)
}

/// Seat on a boarding pass: row digits followed by one letter, e.g. `12A`.
pub(crate) fn boarding_seat_no(value: &str) -> Result<String> {
    let value = seat_no(value)?;
    let mut chars = value.chars();
    let letter = chars.next_back();
    let row: String = chars.collect();
    let well_formed = !row.is_empty()
        && row.chars().all(|c| c.is_ascii_digit())
        && letter.is_some_and(|c| c.is_ascii_alphabetic());
    if !well_formed {
        return Err(StoreError::invalid(format!(
            "seat number {value:?} must be a row number followed by a letter, e.g. 12A"
        )));
    }
    Ok(value)
}

pub(crate) fn positive(field: &str, value: i32) -> Result<i32> {
    if value <= 0 {
        return Err(StoreError::invalid(format!("{field} must be positive")));
    }
    Ok(value)
}

pub(crate) fn positive_amount(field: &str, value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(StoreError::invalid(format!("{field} must be greater than 0")));
    }
    Ok(value)
}

pub(crate) fn non_negative_amount(field: &str, value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(StoreError::invalid(format!("{field} must not be negative")));
    }
    Ok(value)
}

/// Arrival strictly after departure.
pub(crate) fn ordered(
    what: &str,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> Result<()> {
    if arrival <= departure {
        return Err(StoreError::invalid(format!(
            "{what} arrival must be later than departure"
        )));
    }
    Ok(())
}

/// Booking dates before the 21st century are rejected as typos.
pub(crate) fn book_date(value: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if value.year() <= 2000 {
        return Err(StoreError::invalid(format!("booking date {value} is too old")));
    }
    Ok(value)
}

pub(crate) fn coordinates(longitude: f64, latitude: f64) -> Result<(f64, f64)> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(StoreError::invalid(format!(
            "longitude {longitude} is outside -180..180"
        )));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(StoreError::invalid(format!(
            "latitude {latitude} is outside -90..90"
        )));
    }
    Ok((longitude, latitude))
}
