use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Service tier of a seat or a ticket segment.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum FareConditions {
    #[sea_orm(string_value = "Economy")]
    Economy,
    #[sea_orm(string_value = "Comfort")]
    Comfort,
    #[sea_orm(string_value = "Business")]
    Business,
}

impl FareConditions {
    pub const ALL: [FareConditions; 3] = [Self::Economy, Self::Comfort, Self::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Comfort => "Comfort",
            Self::Business => "Business",
        }
    }
}

impl FromStr for FareConditions {
    type Err = StoreError;

    /// Case-insensitive, so `"economy"` and `"ECONOMY"` both normalize to
    /// [`FareConditions::Economy`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|fare| fare.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                StoreError::invalid(format!(
                    "unknown fare class {s:?}; expected Economy, Comfort or Business"
                ))
            })
    }
}

impl fmt::Display for FareConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
