use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value::FareConditions;

/// A row of `ticket_flights`: one flight segment of a ticket, keyed by
/// `(ticket_no, flight_id)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ticket_flights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(13))")]
    pub ticket_no: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub flight_id: i32,
    pub fare_conditions: FareConditions,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ticket::Entity",
        from = "Column::TicketNo",
        to = "super::ticket::Column::TicketNo"
    )]
    Ticket,
    #[sea_orm(
        belongs_to = "super::flight::Entity",
        from = "Column::FlightId",
        to = "super::flight::Column::FlightId"
    )]
    Flight,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<super::flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flight.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
