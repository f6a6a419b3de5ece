//! Aircraft entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value::LocalizedText;

/// A row of `aircrafts_data`.
///
/// | Column        | Type            | Description                          |
/// |---------------|-----------------|--------------------------------------|
/// | aircraft_code | CHAR(3) PK      | IATA aircraft code                   |
/// | model         | JSONB           | Model name per language              |
/// | range         | INTEGER, > 0    | Maximum flight range in kilometres   |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "aircrafts_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(3))")]
    pub aircraft_code: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub model: LocalizedText,
    pub range: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seat::Entity")]
    Seat,
    #[sea_orm(has_many = "super::flight::Entity")]
    Flight,
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seat.def()
    }
}

impl Related<super::flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flight.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
