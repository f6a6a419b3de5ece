use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value::FareConditions;

/// A row of `seats`, keyed by `(aircraft_code, seat_no)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(3))")]
    pub aircraft_code: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(4))")]
    pub seat_no: String,
    pub fare_conditions: FareConditions,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::aircraft::Entity",
        from = "Column::AircraftCode",
        to = "super::aircraft::Column::AircraftCode",
        on_delete = "Cascade"
    )]
    Aircraft,
}

impl Related<super::aircraft::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aircraft.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
