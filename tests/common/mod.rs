#![allow(dead_code)]

use bookings_seaorm_store::{
    entity::flight, BookingsStore, DatabaseConfig, FareConditions, LocalizedText, NewAircraft,
    NewAirport, NewBooking, NewFlight, NewSeat, NewTicket, NewTicketFlight,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sea_orm::prelude::Decimal;

/// Fixed "current time" used across the tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 8, 15, 12, 0, 0).unwrap()
}

/// A migrated in-memory SQLite store. The single pooled connection keeps
/// the database alive for the lifetime of the store.
pub async fn store() -> BookingsStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        schema: None,
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let conn = config.connect().await.expect("open in-memory sqlite");
    let store = BookingsStore::new(conn);
    store.migrate().await.expect("apply migrations");
    store
}

pub async fn seed_aircraft(store: &BookingsStore, code: &str, model: &str) {
    store
        .aircraft()
        .create(NewAircraft {
            aircraft_code: code.to_string(),
            model: LocalizedText::uniform(model).unwrap(),
            range: 5700,
        })
        .await
        .unwrap();
}

pub async fn seed_airport(store: &BookingsStore, code: &str, city: &str) {
    store
        .airports()
        .create(NewAirport {
            airport_code: code.to_string(),
            airport_name: LocalizedText::uniform(format!("{city} airport")).unwrap(),
            city: LocalizedText::uniform(city).unwrap(),
            longitude: 37.4146,
            latitude: 55.9726,
            timezone: "Europe/Moscow".to_string(),
        })
        .await
        .unwrap();
}

/// Aircraft `773` and `SU9`, airports `SVO`, `LED` and `DME`.
pub async fn seed_reference_data(store: &BookingsStore) {
    seed_aircraft(store, "773", "Boeing 777-300").await;
    seed_aircraft(store, "SU9", "Sukhoi Superjet-100").await;
    seed_airport(store, "SVO", "Moscow").await;
    seed_airport(store, "LED", "St. Petersburg").await;
    seed_airport(store, "DME", "Moscow").await;
}

pub fn new_flight(flight_no: &str, departure: DateTime<Utc>, from: &str, to: &str) -> NewFlight {
    NewFlight {
        flight_no: flight_no.to_string(),
        scheduled_departure: departure,
        scheduled_arrival: departure + TimeDelta::minutes(90),
        departure_airport: from.to_string(),
        arrival_airport: to.to_string(),
        aircraft_code: "773".to_string(),
        status: Default::default(),
    }
}

pub async fn seed_flight(
    store: &BookingsStore,
    flight_no: &str,
    departure: DateTime<Utc>,
) -> flight::Model {
    store
        .flights()
        .create(new_flight(flight_no, departure, "SVO", "LED"))
        .await
        .unwrap()
}

pub async fn seed_seat(store: &BookingsStore, aircraft: &str, seat_no: &str, fare: FareConditions) {
    store
        .seats()
        .create(NewSeat {
            aircraft_code: aircraft.to_string(),
            seat_no: seat_no.to_string(),
            fare_conditions: fare,
        })
        .await
        .unwrap();
}

pub async fn seed_booking(store: &BookingsStore, book_ref: &str, total: i64) {
    store
        .bookings()
        .create(
            NewBooking {
                book_ref: book_ref.to_string(),
                book_date: None,
                total_amount: Decimal::new(total, 0),
            },
            now(),
        )
        .await
        .unwrap();
}

pub async fn seed_ticket(store: &BookingsStore, ticket_no: &str, book_ref: &str, name: &str) {
    store
        .tickets()
        .create(NewTicket {
            ticket_no: ticket_no.to_string(),
            book_ref: book_ref.to_string(),
            passenger_id: "4030 855525".to_string(),
            passenger_name: name.to_string(),
            contact_data: None,
        })
        .await
        .unwrap();
}

pub async fn seed_segment(store: &BookingsStore, ticket_no: &str, flight_id: i32, amount: i64) {
    store
        .ticket_flights()
        .create(NewTicketFlight {
            ticket_no: ticket_no.to_string(),
            flight_id,
            fare_conditions: FareConditions::Economy,
            amount: Decimal::new(amount, 0),
        })
        .await
        .unwrap();
}
