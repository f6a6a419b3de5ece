//! Sea-ORM entity definitions for the `bookings` schema.
//!
//! One module per table. The column types and constraints match the
//! migration in `crate::migration`; with the `postgres` feature the tables
//! are expected in the schema configured through
//! [`DatabaseConfig::schema`](crate::DatabaseConfig::schema).

/// Aircraft models and their flight range (`aircrafts_data`).
pub mod aircraft;
/// Airports with localized names and coordinates (`airports_data`).
pub mod airport;
/// Boarding passes issued for a ticket segment (`boarding_passes`).
pub mod boarding_pass;
/// Bookings grouping one or more tickets (`bookings`).
pub mod booking;
/// Scheduled flights (`flights`).
pub mod flight;
/// Seat layout per aircraft (`seats`).
pub mod seat;
/// Passenger tickets (`tickets`).
pub mod ticket;
/// Ticket segments linking tickets to flights (`ticket_flights`).
pub mod ticket_flight;
