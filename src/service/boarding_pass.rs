use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::boarding_pass::{
    self, ActiveModel as BoardingPassActiveModel, Entity as BoardingPassEntity,
};
use crate::entity::ticket_flight::Entity as TicketFlightEntity;
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, Page, PageRequest};
use crate::validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBoardingPass {
    pub ticket_no: String,
    pub flight_id: i32,
    pub boarding_no: i32,
    pub seat_no: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingPassUpdate {
    pub boarding_no: Option<i32>,
    pub seat_no: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BoardingPassService {
    conn: DatabaseConnection,
}

impl BoardingPassService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issues a boarding pass for an existing ticket segment.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidInput`] for a malformed seat, a non-positive
    ///   boarding number or a missing ticket segment.
    /// * [`StoreError::Conflict`] when the segment already has a pass, or the
    ///   boarding number or seat is taken on this flight.
    pub async fn create(&self, new: NewBoardingPass) -> Result<boarding_pass::Model> {
        let ticket_no = validate::ticket_no(&new.ticket_no)?;
        let boarding_no = validate::positive("boarding number", new.boarding_no)?;
        let seat_no = validate::boarding_seat_no(&new.seat_no)?;

        let txn = self.conn.begin().await?;

        if TicketFlightEntity::find_by_id((ticket_no.clone(), new.flight_id))
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(StoreError::invalid(format!(
                "ticket {ticket_no} does not hold flight {}",
                new.flight_id
            )));
        }
        if BoardingPassEntity::find_by_id((ticket_no.clone(), new.flight_id))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::conflict(format!(
                "ticket {ticket_no} already has a boarding pass for flight {}",
                new.flight_id
            )));
        }
        ensure_free(&txn, new.flight_id, None, Some(boarding_no), Some(&seat_no)).await?;

        let model = BoardingPassActiveModel {
            ticket_no: Set(ticket_no),
            flight_id: Set(new.flight_id),
            boarding_no: Set(boarding_no),
            seat_no: Set(seat_no),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            ticket_no = %model.ticket_no,
            flight_id = model.flight_id,
            boarding_no = model.boarding_no,
            seat_no = %model.seat_no,
            "boarding pass issued"
        );
        Ok(model)
    }

    pub async fn get(
        &self,
        ticket_no: &str,
        flight_id: i32,
    ) -> Result<Option<boarding_pass::Model>> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(None);
        };
        Ok(BoardingPassEntity::find_by_id((ticket_no, flight_id))
            .one(&self.conn)
            .await?)
    }

    /// Reassigns the boarding number or seat. The new values must not be
    /// held by another pass on the same flight.
    pub async fn update(
        &self,
        ticket_no: &str,
        flight_id: i32,
        changes: BoardingPassUpdate,
    ) -> Result<Option<boarding_pass::Model>> {
        let boarding_no = changes
            .boarding_no
            .map(|n| validate::positive("boarding number", n))
            .transpose()?;
        let seat_no = changes
            .seat_no
            .as_deref()
            .map(validate::boarding_seat_no)
            .transpose()?;

        let txn = self.conn.begin().await?;

        let Some(existing) = self.find(&txn, ticket_no, flight_id).await? else {
            return Ok(None);
        };

        let mut active_model = existing.clone().into_active_model();
        if let Some(boarding_no) = boarding_no {
            active_model.boarding_no = Set(boarding_no);
        }
        if let Some(seat_no) = seat_no.clone() {
            active_model.seat_no = Set(seat_no);
        }
        if !active_model.is_changed() {
            return Ok(Some(existing));
        }
        ensure_free(
            &txn,
            flight_id,
            Some(&existing.ticket_no),
            boarding_no.filter(|n| *n != existing.boarding_no),
            seat_no.as_deref().filter(|s| *s != existing.seat_no),
        )
        .await?;

        let updated = active_model.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            ticket_no = %updated.ticket_no,
            flight_id = updated.flight_id,
            boarding_no = updated.boarding_no,
            seat_no = %updated.seat_no,
            "boarding pass updated"
        );
        Ok(Some(updated))
    }

    pub async fn delete(&self, ticket_no: &str, flight_id: i32) -> Result<bool> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(false);
        };
        let res = BoardingPassEntity::delete_by_id((ticket_no, flight_id))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Passes issued for one flight in boarding order.
    pub async fn by_flight(
        &self,
        flight_id: i32,
        request: PageRequest,
    ) -> Result<Page<boarding_pass::Model>> {
        let select = BoardingPassEntity::find()
            .filter(boarding_pass::Column::FlightId.eq(flight_id))
            .order_by_asc(boarding_pass::Column::BoardingNo);
        fetch_page(select, request, &self.conn).await
    }

    /// Passes issued to one ticket, in flight order.
    pub async fn by_ticket(
        &self,
        ticket_no: &str,
        request: PageRequest,
    ) -> Result<Page<boarding_pass::Model>> {
        let select = BoardingPassEntity::find()
            .filter(boarding_pass::Column::TicketNo.eq(ticket_no.trim()))
            .order_by_asc(boarding_pass::Column::FlightId);
        fetch_page(select, request, &self.conn).await
    }

    /// Boarding numbers in `1..=max` not yet issued on the flight, ascending.
    pub async fn available_boarding_numbers(&self, flight_id: i32, max: i32) -> Result<Vec<i32>> {
        validate::positive("maximum boarding number", max)?;

        let taken: BTreeSet<i32> = BoardingPassEntity::find()
            .select_only()
            .column(boarding_pass::Column::BoardingNo)
            .filter(boarding_pass::Column::FlightId.eq(flight_id))
            .into_tuple::<i32>()
            .all(&self.conn)
            .await?
            .into_iter()
            .collect();

        Ok((1..=max).filter(|n| !taken.contains(n)).collect())
    }

    async fn find<C: ConnectionTrait>(
        &self,
        db: &C,
        ticket_no: &str,
        flight_id: i32,
    ) -> Result<Option<boarding_pass::Model>> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(None);
        };
        Ok(BoardingPassEntity::find_by_id((ticket_no, flight_id))
            .one(db)
            .await?)
    }
}

/// Fails with a conflict when another pass on `flight_id` already holds
/// `boarding_no` or `seat_no`. The pass of `except` is ignored.
async fn ensure_free<C: ConnectionTrait>(
    db: &C,
    flight_id: i32,
    except: Option<&str>,
    boarding_no: Option<i32>,
    seat_no: Option<&str>,
) -> Result<()> {
    let others = || {
        let select =
            BoardingPassEntity::find().filter(boarding_pass::Column::FlightId.eq(flight_id));
        match except {
            Some(ticket_no) => select.filter(boarding_pass::Column::TicketNo.ne(ticket_no)),
            None => select,
        }
    };

    if let Some(boarding_no) = boarding_no {
        if let Some(holder) = others()
            .filter(boarding_pass::Column::BoardingNo.eq(boarding_no))
            .one(db)
            .await?
        {
            return Err(StoreError::conflict(format!(
                "boarding number {boarding_no} on flight {flight_id} is held by ticket {}",
                holder.ticket_no
            )));
        }
    }
    if let Some(seat_no) = seat_no {
        if let Some(holder) = others()
            .filter(boarding_pass::Column::SeatNo.eq(seat_no))
            .one(db)
            .await?
        {
            return Err(StoreError::conflict(format!(
                "seat {seat_no} on flight {flight_id} is held by ticket {}",
                holder.ticket_no
            )));
        }
    }
    Ok(())
}
