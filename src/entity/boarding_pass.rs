use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A row of `boarding_passes`.
///
/// Keyed by the ticket segment `(ticket_no, flight_id)`. Within one flight
/// both `boarding_no` and `seat_no` are unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boarding_passes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Char(Some(13))")]
    pub ticket_no: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub flight_id: i32,
    pub boarding_no: i32,
    #[sea_orm(column_type = "String(StringLen::N(4))")]
    pub seat_no: String,
}

impl Model {
    /// Row part of the seat, `"12"` for `12A`.
    pub fn seat_row(&self) -> &str {
        self.seat_no
            .trim_end_matches(|c: char| c.is_ascii_alphabetic())
    }

    /// Letter part of the seat, `'A'` for `12A`.
    pub fn seat_letter(&self) -> Option<char> {
        self.seat_no.chars().last().filter(char::is_ascii_alphabetic)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
