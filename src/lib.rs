//! # Bookings data-access layer for Sea-ORM
//!
//! Typed services over the PostgreSQL airline `bookings` schema: aircraft,
//! airports, flights, seats, bookings, tickets, ticket segments and
//! boarding passes, built on [Sea-ORM](https://crates.io/crates/sea-orm).
//!
//! ## Features
//!
//! - One service per table with validated create, read, update and delete
//! - Paginated, case-insensitive search over every table ([`Page`], [`PageRequest`])
//! - Flight status derivation from scheduled and actual times ([`FlightStatus`])
//! - Bulk status refresh and per-table statistics
//! - Schema migrations behind the `migration` feature
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookings_seaorm_store::{BookingsStore, DatabaseConfig, PageRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // DATABASE_URL, DATABASE_SCHEMA, ...
//! let conn = DatabaseConfig::from_env()?.connect().await?;
//! let store = BookingsStore::new(conn);
//!
//! // Second page of flights touching Sheremetyevo, ten per page
//! let page = store.flights().search("SVO", PageRequest::new(2, 10)?).await?;
//! println!(
//!     "page {} of {} ({} flights in total)",
//!     page.page,
//!     page.total_pages(),
//!     page.total_count
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Flight statuses
//!
//! Statuses are derived, never scheduled by a background job. Call
//! [`FlightService::refresh_statuses`] whenever the stored labels should
//! catch up with the clock:
//!
//! ```no_run
//! use bookings_seaorm_store::BookingsStore;
//! use chrono::Utc;
//!
//! # async fn example(store: BookingsStore) -> Result<(), Box<dyn std::error::Error>> {
//! let changed = store.flights().refresh_statuses(Utc::now()).await?;
//! println!("{changed} flights changed status");
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`StoreError`]: `InvalidInput` when a request is
//! rejected before touching the database, `Conflict` when a key or
//! constraint refuses the write, and `Unavailable` for anything else.

pub mod entity;

mod config;
mod error;
#[cfg(feature = "migration")]
mod migration;
mod pagination;
mod service;
mod status;
mod store;
mod validate;
mod value;

pub use config::{ConfigError, DatabaseConfig};
pub use error::{Result, StoreError};
pub use pagination::{Page, PageRequest};
pub use service::*;
pub use status::{FlightStatus, FlightTimes, DELAY_THRESHOLD_MINUTES};
pub use store::BookingsStore;
pub use value::{ContactData, FareConditions, LocalizedText, LocalizedTextError, FALLBACK_LANGUAGE};

/// Schema migrations for every table of the store.
///
/// Run with `Migrator::up(&conn, None)` or through [`BookingsStore::migrate`].
#[cfg(feature = "migration")]
pub use migration::Migrator;
