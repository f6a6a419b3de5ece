use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::aircraft::{self, Entity as AircraftEntity};
use crate::entity::airport::{self, Entity as AirportEntity};
use crate::entity::flight::{self, ActiveModel as FlightActiveModel, Entity as FlightEntity};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, search_condition, Page, PageRequest};
use crate::status::FlightStatus;
use crate::validate;

/// Values for a new flight. Actual times are recorded later through
/// [`FlightService::update`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlight {
    pub flight_no: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub aircraft_code: String,
    #[serde(default)]
    pub status: FlightStatus,
}

/// Operational changes to a flight. `None` leaves a field untouched.
///
/// The actual times take `Some(Some(t))` to record a time and `Some(None)`
/// to clear one (`null` in JSON). Touching either re-derives the status, so
/// setting `actual_departure` alone marks a flight `Departed` and clearing
/// it puts the flight back to `Scheduled`, `On Time` or `Delayed`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FlightStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub actual_departure: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub actual_arrival: Option<Option<DateTime<Utc>>>,
}

/// A field that is present, even as `null`, is `Some`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A flight together with the rows it references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
    pub flight: flight::Model,
    pub aircraft: Option<aircraft::Model>,
    pub departure_airport: Option<airport::Model>,
    pub arrival_airport: Option<airport::Model>,
}

/// Per-status counts and the departure range over all flights.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatistics {
    pub total: u64,
    pub by_status: BTreeMap<FlightStatus, u64>,
    pub earliest_departure: Option<DateTime<Utc>>,
    pub latest_departure: Option<DateTime<Utc>>,
}

impl FlightStatistics {
    pub fn count(&self, status: FlightStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or_default()
    }
}

/// Flights: CRUD, the paginated finders and status maintenance.
///
/// Status derivation never runs on a timer. Callers decide when to bring
/// stored statuses up to date with [`FlightService::refresh_statuses`].
#[derive(Debug, Clone)]
pub struct FlightService {
    conn: DatabaseConnection,
}

impl FlightService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Schedules a new flight.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidInput`] for a malformed flight number or code,
    ///   an arrival not after the departure, identical airports, or an
    ///   aircraft or airport that does not exist.
    /// * [`StoreError::Conflict`] when the same flight number already departs
    ///   at the same scheduled time.
    pub async fn create(&self, new: NewFlight) -> Result<flight::Model> {
        let flight_no = validate::code("flight number", &new.flight_no, 6)?;
        let departure_airport = validate::code("departure airport", &new.departure_airport, 3)?;
        let arrival_airport = validate::code("arrival airport", &new.arrival_airport, 3)?;
        let aircraft_code = validate::code("aircraft code", &new.aircraft_code, 3)?;
        validate::ordered("scheduled", new.scheduled_departure, new.scheduled_arrival)?;
        if departure_airport == arrival_airport {
            return Err(StoreError::invalid(
                "departure and arrival airports must differ",
            ));
        }

        let txn = self.conn.begin().await?;

        if AircraftEntity::find_by_id(aircraft_code.clone())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::invalid(format!(
                "aircraft {aircraft_code} does not exist"
            )));
        }
        for (role, code) in [("departure", &departure_airport), ("arrival", &arrival_airport)] {
            if AirportEntity::find_by_id(code.clone()).one(&txn).await?.is_none() {
                return Err(StoreError::invalid(format!(
                    "{role} airport {code} does not exist"
                )));
            }
        }

        let duplicate = FlightEntity::find()
            .filter(flight::Column::FlightNo.eq(flight_no.as_str()))
            .filter(flight::Column::ScheduledDeparture.eq(new.scheduled_departure))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(StoreError::conflict(format!(
                "flight {flight_no} departing at {} already exists",
                new.scheduled_departure.format("%Y-%m-%d %H:%M")
            )));
        }

        let model = FlightActiveModel {
            flight_no: Set(flight_no),
            scheduled_departure: Set(new.scheduled_departure),
            scheduled_arrival: Set(new.scheduled_arrival),
            departure_airport: Set(departure_airport),
            arrival_airport: Set(arrival_airport),
            status: Set(new.status),
            aircraft_code: Set(aircraft_code),
            actual_departure: Set(None),
            actual_arrival: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(flight_id = model.flight_id, flight = %model.summary(), "flight created");
        Ok(model)
    }

    pub async fn get(&self, flight_id: i32) -> Result<Option<flight::Model>> {
        Ok(FlightEntity::find_by_id(flight_id).one(&self.conn).await?)
    }

    pub async fn exists(&self, flight_id: i32) -> Result<bool> {
        Ok(self.get(flight_id).await?.is_some())
    }

    /// Loads a flight with its aircraft and both airports.
    pub async fn details(&self, flight_id: i32) -> Result<Option<FlightDetails>> {
        let Some((flight, aircraft)) = FlightEntity::find_by_id(flight_id)
            .find_also_related(AircraftEntity)
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let airports = AirportEntity::find()
            .filter(
                airport::Column::AirportCode
                    .is_in([flight.departure_airport.clone(), flight.arrival_airport.clone()]),
            )
            .all(&self.conn)
            .await?;
        let find = |code: &str| airports.iter().find(|a| a.airport_code == code).cloned();

        Ok(Some(FlightDetails {
            departure_airport: find(&flight.departure_airport),
            arrival_airport: find(&flight.arrival_airport),
            aircraft,
            flight,
        }))
    }

    /// Applies operational changes observed at `now`.
    ///
    /// When an actual time is recorded or cleared the status is re-derived
    /// after the explicit status (if any) has been applied, so a flight
    /// cancelled in the same update stays `Cancelled`. Returns `None` when
    /// the flight does not exist.
    pub async fn update(
        &self,
        flight_id: i32,
        changes: FlightUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<flight::Model>> {
        let Some(existing) = self.get(flight_id).await? else {
            return Ok(None);
        };

        let mut flight = existing.clone();
        if let Some(status) = changes.status {
            flight.status = status;
        }
        if let Some(departure) = changes.actual_departure {
            flight.actual_departure = departure;
        }
        if let Some(arrival) = changes.actual_arrival {
            flight.actual_arrival = arrival;
        }
        if changes.actual_departure.is_some() || changes.actual_arrival.is_some() {
            flight.refresh_status(now);
        }
        if let (Some(departure), Some(arrival)) = (flight.actual_departure, flight.actual_arrival) {
            validate::ordered("actual", departure, arrival)?;
        }

        if flight == existing {
            return Ok(Some(existing));
        }

        let mut active_model = existing.into_active_model();
        active_model.status = Set(flight.status);
        active_model.actual_departure = Set(flight.actual_departure);
        active_model.actual_arrival = Set(flight.actual_arrival);

        let updated = active_model.update(&self.conn).await?;
        tracing::info!(flight_id, status = %updated.status, "flight updated");
        Ok(Some(updated))
    }

    /// Deletes a flight that has not completed yet.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidInput`] for `Arrived` or `Cancelled` flights,
    /// which are kept as history.
    pub async fn delete(&self, flight_id: i32) -> Result<bool> {
        let Some(flight) = self.get(flight_id).await? else {
            return Ok(false);
        };
        if flight.status.is_completed() {
            return Err(StoreError::invalid(format!(
                "flight {} is {} and cannot be deleted",
                flight.flight_no, flight.status
            )));
        }
        let res = FlightEntity::delete_by_id(flight_id).exec(&self.conn).await?;
        tracing::info!(flight_id, "flight deleted");
        Ok(res.rows_affected > 0)
    }

    /// Flights whose number, airports, status or aircraft contain `term`,
    /// latest departure first.
    pub async fn search(&self, term: &str, request: PageRequest) -> Result<Page<flight::Model>> {
        let mut select = FlightEntity::find();
        if let Some(condition) = search_condition(
            term,
            &[
                flight::Column::FlightNo,
                flight::Column::DepartureAirport,
                flight::Column::ArrivalAirport,
                flight::Column::Status,
                flight::Column::AircraftCode,
            ],
        ) {
            select = select.filter(condition);
        }
        let select = select
            .order_by_desc(flight::Column::ScheduledDeparture)
            .order_by_asc(flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Departures from one airport in chronological order.
    pub async fn by_departure_airport(
        &self,
        airport_code: &str,
        request: PageRequest,
    ) -> Result<Page<flight::Model>> {
        let select = FlightEntity::find()
            .filter(flight::Column::DepartureAirport.eq(airport_code.trim().to_uppercase()))
            .order_by_asc(flight::Column::ScheduledDeparture)
            .order_by_asc(flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Arrivals at one airport ordered by scheduled arrival.
    pub async fn by_arrival_airport(
        &self,
        airport_code: &str,
        request: PageRequest,
    ) -> Result<Page<flight::Model>> {
        let select = FlightEntity::find()
            .filter(flight::Column::ArrivalAirport.eq(airport_code.trim().to_uppercase()))
            .order_by_asc(flight::Column::ScheduledArrival)
            .order_by_asc(flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    pub async fn by_status(
        &self,
        status: FlightStatus,
        request: PageRequest,
    ) -> Result<Page<flight::Model>> {
        let select = FlightEntity::find()
            .filter(flight::Column::Status.eq(status))
            .order_by_asc(flight::Column::ScheduledDeparture)
            .order_by_asc(flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Flights scheduled to depart on `date` (UTC calendar day).
    pub async fn by_departure_date(
        &self,
        date: NaiveDate,
        request: PageRequest,
    ) -> Result<Page<flight::Model>> {
        let select = FlightEntity::find()
            .filter(departs_on(date))
            .order_by_asc(flight::Column::ScheduledDeparture)
            .order_by_asc(flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// The departure of `flight_no` scheduled on `date` (UTC calendar day).
    pub async fn by_flight_no_and_date(
        &self,
        flight_no: &str,
        date: NaiveDate,
    ) -> Result<Option<flight::Model>> {
        Ok(FlightEntity::find()
            .filter(flight::Column::FlightNo.eq(flight_no.trim().to_uppercase()))
            .filter(departs_on(date))
            .order_by_asc(flight::Column::ScheduledDeparture)
            .one(&self.conn)
            .await?)
    }

    /// Re-derives the status of every flight that is neither `Arrived` nor
    /// `Cancelled` as of `now` and stores the ones that changed.
    ///
    /// Returns the number of flights whose status changed.
    pub async fn refresh_statuses(&self, now: DateTime<Utc>) -> Result<u64> {
        let txn = self.conn.begin().await?;

        let flights = FlightEntity::find()
            .filter(
                flight::Column::Status.is_not_in([FlightStatus::Arrived, FlightStatus::Cancelled]),
            )
            .all(&txn)
            .await?;
        let checked = flights.len();

        let mut moved: BTreeMap<FlightStatus, Vec<i32>> = BTreeMap::new();
        for mut flight in flights {
            if flight.refresh_status(now) {
                moved.entry(flight.status).or_default().push(flight.flight_id);
            }
        }

        let mut changed = 0;
        for (status, ids) in moved {
            let res = FlightEntity::update_many()
                .col_expr(flight::Column::Status, Expr::value(status.as_str()))
                .filter(flight::Column::FlightId.is_in(ids))
                .exec(&txn)
                .await?;
            changed += res.rows_affected;
        }

        txn.commit().await?;

        tracing::info!(checked, changed, %now, "flight statuses refreshed");
        Ok(changed)
    }

    pub async fn statistics(&self) -> Result<FlightStatistics> {
        let rows: Vec<(FlightStatus, i64)> = FlightEntity::find()
            .select_only()
            .column(flight::Column::Status)
            .column_as(flight::Column::FlightId.count(), "count")
            .group_by(flight::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await?;

        let by_status: BTreeMap<FlightStatus, u64> = rows
            .into_iter()
            .map(|(status, count)| (status, count.max(0) as u64))
            .collect();

        let earliest = FlightEntity::find()
            .order_by_asc(flight::Column::ScheduledDeparture)
            .one(&self.conn)
            .await?;
        let latest = FlightEntity::find()
            .order_by_desc(flight::Column::ScheduledDeparture)
            .one(&self.conn)
            .await?;

        Ok(FlightStatistics {
            total: by_status.values().sum(),
            by_status,
            earliest_departure: earliest.map(|f| f.scheduled_departure),
            latest_departure: latest.map(|f| f.scheduled_departure),
        })
    }
}

fn departs_on(date: NaiveDate) -> Condition {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    Condition::all()
        .add(flight::Column::ScheduledDeparture.gte(start))
        .add(flight::Column::ScheduledDeparture.lt(start + TimeDelta::days(1)))
}
