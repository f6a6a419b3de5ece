//! Flight entity.
//!
//! The `status` column holds the last derived [`FlightStatus`]; call
//! [`Model::refresh_status`] to bring it up to date for a given instant.

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::status::{FlightStatus, FlightTimes};

/// A row of `flights`.
///
/// | Column              | Type                 | Description                                  |
/// |---------------------|----------------------|----------------------------------------------|
/// | flight_id           | SERIAL PK            | Surrogate key                                |
/// | flight_no           | CHAR(6)              | Flight number, unique per departure time     |
/// | scheduled_departure | TIMESTAMPTZ          |                                              |
/// | scheduled_arrival   | TIMESTAMPTZ          | Later than `scheduled_departure`             |
/// | departure_airport   | CHAR(3) FK           | `airports_data.airport_code`                 |
/// | arrival_airport     | CHAR(3) FK           | Differs from `departure_airport`             |
/// | status              | VARCHAR(20)          | One of the [`FlightStatus`] labels           |
/// | aircraft_code       | CHAR(3) FK           | `aircrafts_data.aircraft_code`               |
/// | actual_departure    | TIMESTAMPTZ NULL     |                                              |
/// | actual_arrival      | TIMESTAMPTZ NULL     | Later than `actual_departure` when both set  |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub flight_id: i32,
    #[sea_orm(column_type = "Char(Some(6))")]
    pub flight_no: String,
    pub scheduled_departure: DateTimeUtc,
    pub scheduled_arrival: DateTimeUtc,
    #[sea_orm(column_type = "Char(Some(3))")]
    pub departure_airport: String,
    #[sea_orm(column_type = "Char(Some(3))")]
    pub arrival_airport: String,
    pub status: FlightStatus,
    #[sea_orm(column_type = "Char(Some(3))")]
    pub aircraft_code: String,
    pub actual_departure: Option<DateTimeUtc>,
    pub actual_arrival: Option<DateTimeUtc>,
}

impl Model {
    pub fn times(&self) -> FlightTimes {
        FlightTimes {
            scheduled_departure: self.scheduled_departure,
            actual_departure: self.actual_departure,
            actual_arrival: self.actual_arrival,
        }
    }

    /// The status this flight should display at `now`.
    pub fn derived_status(&self, now: DateTime<Utc>) -> FlightStatus {
        self.status.derive(&self.times(), now)
    }

    /// Re-derives `status` in place. Returns `true` when it changed.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        let derived = self.derived_status(now);
        let changed = derived != self.status;
        self.status = derived;
        changed
    }

    pub fn scheduled_duration(&self) -> TimeDelta {
        self.scheduled_arrival - self.scheduled_departure
    }

    pub fn actual_duration(&self) -> Option<TimeDelta> {
        Some(self.actual_arrival? - self.actual_departure?)
    }

    /// Short description such as `PG0403 DME→LED (Scheduled)`.
    pub fn summary(&self) -> String {
        format!(
            "{} {}→{} ({})",
            self.flight_no, self.departure_airport, self.arrival_airport, self.status
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::aircraft::Entity",
        from = "Column::AircraftCode",
        to = "super::aircraft::Column::AircraftCode"
    )]
    Aircraft,
    #[sea_orm(
        belongs_to = "super::airport::Entity",
        from = "Column::DepartureAirport",
        to = "super::airport::Column::AirportCode"
    )]
    DepartureAirport,
    #[sea_orm(
        belongs_to = "super::airport::Entity",
        from = "Column::ArrivalAirport",
        to = "super::airport::Column::AirportCode"
    )]
    ArrivalAirport,
    #[sea_orm(has_many = "super::ticket_flight::Entity")]
    TicketFlight,
}

impl Related<super::aircraft::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aircraft.def()
    }
}

impl Related<super::ticket_flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketFlight.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
