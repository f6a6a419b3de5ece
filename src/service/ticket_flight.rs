use std::collections::BTreeMap;

use sea_orm::{
    prelude::Decimal, sea_query::SimpleExpr, ActiveModelTrait, ColumnTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::flight::Entity as FlightEntity;
use crate::entity::ticket::Entity as TicketEntity;
use crate::entity::ticket_flight::{
    self, ActiveModel as TicketFlightActiveModel, Entity as TicketFlightEntity,
};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, Page, PageRequest};
use crate::validate;
use crate::value::FareConditions;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicketFlight {
    pub ticket_no: String,
    pub flight_id: i32,
    pub fare_conditions: FareConditions,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFlightUpdate {
    pub fare_conditions: Option<FareConditions>,
    pub amount: Option<Decimal>,
}

/// Flight segments of tickets, keyed by `(ticket_no, flight_id)`.
#[derive(Debug, Clone)]
pub struct TicketFlightService {
    conn: DatabaseConnection,
}

impl TicketFlightService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Adds a flight to a ticket.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidInput`] for a negative amount or when the
    ///   ticket or the flight does not exist.
    /// * [`StoreError::Conflict`] when the ticket already holds the flight.
    pub async fn create(&self, new: NewTicketFlight) -> Result<ticket_flight::Model> {
        let ticket_no = validate::ticket_no(&new.ticket_no)?;
        let amount = validate::non_negative_amount("amount", new.amount)?;

        let txn = self.conn.begin().await?;

        if TicketEntity::find_by_id(ticket_no.clone()).one(&txn).await?.is_none() {
            return Err(StoreError::invalid(format!("ticket {ticket_no} does not exist")));
        }
        if FlightEntity::find_by_id(new.flight_id).one(&txn).await?.is_none() {
            return Err(StoreError::invalid(format!(
                "flight {} does not exist",
                new.flight_id
            )));
        }
        if TicketFlightEntity::find_by_id((ticket_no.clone(), new.flight_id))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::conflict(format!(
                "ticket {ticket_no} already holds flight {}",
                new.flight_id
            )));
        }

        let model = TicketFlightActiveModel {
            ticket_no: Set(ticket_no),
            flight_id: Set(new.flight_id),
            fare_conditions: Set(new.fare_conditions),
            amount: Set(amount),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            ticket_no = %model.ticket_no,
            flight_id = model.flight_id,
            fare = %model.fare_conditions,
            "ticket segment created"
        );
        Ok(model)
    }

    pub async fn get(
        &self,
        ticket_no: &str,
        flight_id: i32,
    ) -> Result<Option<ticket_flight::Model>> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(None);
        };
        Ok(TicketFlightEntity::find_by_id((ticket_no, flight_id))
            .one(&self.conn)
            .await?)
    }

    pub async fn update(
        &self,
        ticket_no: &str,
        flight_id: i32,
        changes: TicketFlightUpdate,
    ) -> Result<Option<ticket_flight::Model>> {
        let Some(existing) = self.get(ticket_no, flight_id).await? else {
            return Ok(None);
        };

        let mut active_model = existing.clone().into_active_model();
        if let Some(fare) = changes.fare_conditions {
            active_model.fare_conditions = Set(fare);
        }
        if let Some(amount) = changes.amount {
            active_model.amount = Set(validate::non_negative_amount("amount", amount)?);
        }
        if !active_model.is_changed() {
            return Ok(Some(existing));
        }

        let updated = active_model.update(&self.conn).await?;
        tracing::info!(
            ticket_no = %updated.ticket_no,
            flight_id = updated.flight_id,
            "ticket segment updated"
        );
        Ok(Some(updated))
    }

    pub async fn delete(&self, ticket_no: &str, flight_id: i32) -> Result<bool> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(false);
        };
        let res = TicketFlightEntity::delete_by_id((ticket_no, flight_id))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Segments of one ticket in flight order.
    pub async fn by_ticket(
        &self,
        ticket_no: &str,
        request: PageRequest,
    ) -> Result<Page<ticket_flight::Model>> {
        let select = TicketFlightEntity::find()
            .filter(ticket_flight::Column::TicketNo.eq(ticket_no.trim()))
            .order_by_asc(ticket_flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Passengers' segments on one flight, ordered by ticket number.
    pub async fn by_flight(
        &self,
        flight_id: i32,
        request: PageRequest,
    ) -> Result<Page<ticket_flight::Model>> {
        let select = TicketFlightEntity::find()
            .filter(ticket_flight::Column::FlightId.eq(flight_id))
            .order_by_asc(ticket_flight::Column::TicketNo);
        fetch_page(select, request, &self.conn).await
    }

    /// Segments priced between `min` and `max`, both inclusive, cheapest
    /// first.
    pub async fn by_amount_range(
        &self,
        min: Decimal,
        max: Decimal,
        request: PageRequest,
    ) -> Result<Page<ticket_flight::Model>> {
        if max < min {
            return Err(StoreError::invalid(format!(
                "amount range {min}..{max} is empty"
            )));
        }
        let select = TicketFlightEntity::find()
            .filter(ticket_flight::Column::Amount.between(min, max))
            .order_by_asc(ticket_flight::Column::Amount)
            .order_by_asc(ticket_flight::Column::TicketNo)
            .order_by_asc(ticket_flight::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Sum of the segment amounts of one ticket; zero for a ticket without
    /// segments.
    pub async fn total_by_ticket(&self, ticket_no: &str) -> Result<Decimal> {
        self.total(ticket_flight::Column::TicketNo.eq(ticket_no.trim())).await
    }

    /// Revenue of one flight; zero when nobody holds it.
    pub async fn total_by_flight(&self, flight_id: i32) -> Result<Decimal> {
        self.total(ticket_flight::Column::FlightId.eq(flight_id)).await
    }

    /// Number of segments sold per fare class on one flight.
    pub async fn fare_statistics(&self, flight_id: i32) -> Result<BTreeMap<FareConditions, u64>> {
        let rows: Vec<(FareConditions, i64)> = TicketFlightEntity::find()
            .select_only()
            .column(ticket_flight::Column::FareConditions)
            .column_as(ticket_flight::Column::TicketNo.count(), "count")
            .filter(ticket_flight::Column::FlightId.eq(flight_id))
            .group_by(ticket_flight::Column::FareConditions)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(fare, count)| (fare, count.max(0) as u64))
            .collect())
    }

    async fn total(&self, filter: SimpleExpr) -> Result<Decimal> {
        let sum: Option<Option<Decimal>> = TicketFlightEntity::find()
            .select_only()
            .column_as(ticket_flight::Column::Amount.sum(), "total")
            .filter(filter)
            .into_tuple()
            .one(&self.conn)
            .await?;
        Ok(sum.flatten().unwrap_or_default().round_dp(2))
    }
}
