use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value::LocalizedText;

/// A row of `airports_data`.
///
/// Coordinates are kept as two `DOUBLE PRECISION` columns in WGS 84
/// degrees.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "airports_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(3))")]
    pub airport_code: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub airport_name: LocalizedText,
    #[sea_orm(column_type = "JsonBinary")]
    pub city: LocalizedText,
    pub longitude: f64,
    pub latitude: f64,
    /// IANA zone name, e.g. `Europe/Moscow`.
    #[sea_orm(column_type = "Text")]
    pub timezone: String,
}

impl Model {
    /// `(longitude, latitude)` in degrees.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
