use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value::ContactData;

/// A row of `tickets`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(13))")]
    pub ticket_no: String,
    #[sea_orm(column_type = "Char(Some(6))")]
    pub book_ref: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub passenger_id: String,
    #[sea_orm(column_type = "Text")]
    pub passenger_name: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub contact_data: Option<ContactData>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookRef",
        to = "super::booking::Column::BookRef"
    )]
    Booking,
    #[sea_orm(has_many = "super::ticket_flight::Entity")]
    TicketFlight,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::ticket_flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketFlight.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
