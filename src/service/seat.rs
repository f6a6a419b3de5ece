use std::collections::BTreeMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::aircraft::Entity as AircraftEntity;
use crate::entity::seat::{self, ActiveModel as SeatActiveModel, Entity as SeatEntity};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, search_condition, Page, PageRequest};
use crate::validate;
use crate::value::FareConditions;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSeat {
    pub aircraft_code: String,
    pub seat_no: String,
    pub fare_conditions: FareConditions,
}

/// Seat layouts, keyed by `(aircraft_code, seat_no)`.
#[derive(Debug, Clone)]
pub struct SeatService {
    conn: DatabaseConnection,
}

impl SeatService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Adds a seat to an existing aircraft.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidInput`] for malformed keys or an unknown
    ///   aircraft.
    /// * [`StoreError::Conflict`] when the seat already exists.
    pub async fn create(&self, new: NewSeat) -> Result<seat::Model> {
        let aircraft_code = validate::code("aircraft code", &new.aircraft_code, 3)?;
        let seat_no = validate::seat_no(&new.seat_no)?;

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
        if SeatEntity::find_by_id((aircraft_code.clone(), seat_no.clone()))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(StoreError::conflict(format!(
                "seat {seat_no} already exists on aircraft {aircraft_code}"
            )));
        }

        let model = SeatActiveModel {
            aircraft_code: Set(aircraft_code),
            seat_no: Set(seat_no),
            fare_conditions: Set(new.fare_conditions),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            aircraft_code = %model.aircraft_code,
            seat_no = %model.seat_no,
            fare = %model.fare_conditions,
            "seat created"
        );
        Ok(model)
    }

    pub async fn get(&self, aircraft_code: &str, seat_no: &str) -> Result<Option<seat::Model>> {
        let (Ok(code), Ok(seat_no)) = (
            validate::code("aircraft code", aircraft_code, 3),
            validate::seat_no(seat_no),
        ) else {
            return Ok(None);
        };
        Ok(SeatEntity::find_by_id((code, seat_no)).one(&self.conn).await?)
    }

    /// Moves a seat to another fare class.
    pub async fn update(
        &self,
        aircraft_code: &str,
        seat_no: &str,
        fare_conditions: FareConditions,
    ) -> Result<Option<seat::Model>> {
        let Some(existing) = self.get(aircraft_code, seat_no).await? else {
            return Ok(None);
        };
        if existing.fare_conditions == fare_conditions {
            return Ok(Some(existing));
        }

        let mut active_model = existing.into_active_model();
        active_model.fare_conditions = Set(fare_conditions);
        let updated = active_model.update(&self.conn).await?;

        tracing::info!(
            aircraft_code = %updated.aircraft_code,
            seat_no = %updated.seat_no,
            fare = %updated.fare_conditions,
            "seat updated"
        );
        Ok(Some(updated))
    }

    pub async fn delete(&self, aircraft_code: &str, seat_no: &str) -> Result<bool> {
        let Some(existing) = self.get(aircraft_code, seat_no).await? else {
            return Ok(false);
        };
        let res = SeatEntity::delete_by_id((existing.aircraft_code, existing.seat_no))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Seats whose aircraft code, seat number or fare class contains `term`,
    /// ordered by aircraft and seat.
    pub async fn search(&self, term: &str, request: PageRequest) -> Result<Page<seat::Model>> {
        let mut select = SeatEntity::find();
        if let Some(condition) = search_condition(
            term,
            &[
                seat::Column::AircraftCode,
                seat::Column::SeatNo,
                seat::Column::FareConditions,
            ],
        ) {
            select = select.filter(condition);
        }
        let select = select
            .order_by_asc(seat::Column::AircraftCode)
            .order_by_asc(seat::Column::SeatNo);
        fetch_page(select, request, &self.conn).await
    }

    /// The seat layout of one aircraft.
    pub async fn by_aircraft(
        &self,
        aircraft_code: &str,
        request: PageRequest,
    ) -> Result<Page<seat::Model>> {
        let select = SeatEntity::find()
            .filter(seat::Column::AircraftCode.eq(aircraft_code.trim().to_uppercase()))
            .order_by_asc(seat::Column::SeatNo);
        fetch_page(select, request, &self.conn).await
    }

    pub async fn by_fare_conditions(
        &self,
        fare_conditions: FareConditions,
        request: PageRequest,
    ) -> Result<Page<seat::Model>> {
        let select = SeatEntity::find()
            .filter(seat::Column::FareConditions.eq(fare_conditions))
            .order_by_asc(seat::Column::AircraftCode)
            .order_by_asc(seat::Column::SeatNo);
        fetch_page(select, request, &self.conn).await
    }

    /// Number of seats per fare class on one aircraft.
    pub async fn fare_statistics(
        &self,
        aircraft_code: &str,
    ) -> Result<BTreeMap<FareConditions, u64>> {
        let rows: Vec<(FareConditions, i64)> = SeatEntity::find()
            .select_only()
            .column(seat::Column::FareConditions)
            .column_as(seat::Column::SeatNo.count(), "count")
            .filter(seat::Column::AircraftCode.eq(aircraft_code.trim().to_uppercase()))
            .group_by(seat::Column::FareConditions)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(fare, count)| (fare, count.max(0) as u64))
            .collect())
    }
}
