//! Flight status lifecycle.
//!
//! A flight's displayed status is derived from its timestamps and the
//! current time:
//!
//! | Condition (checked top to bottom)               | Status      |
//! |-------------------------------------------------|-------------|
//! | already `Cancelled` (manual override)           | `Cancelled` |
//! | `actual_arrival` is set                         | `Arrived`   |
//! | `actual_departure` is set                       | `Departed`  |
//! | `scheduled_departure <= now - 15 min`           | `Delayed`   |
//! | `scheduled_departure <= now`                    | `On Time`   |
//! | otherwise                                       | `Scheduled` |
//!
//! Derivation is a pure function. Nothing refreshes statuses in the
//! background; see [`FlightService::refresh_statuses`](crate::FlightService::refresh_statuses).

use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Minutes past the scheduled departure after which a flight that has not
/// left counts as delayed.
pub const DELAY_THRESHOLD_MINUTES: i64 = 15;

/// Display status of a flight, stored as its label in `flights.status`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum FlightStatus {
    #[default]
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    #[sea_orm(string_value = "On Time")]
    #[serde(rename = "On Time")]
    OnTime,
    #[sea_orm(string_value = "Delayed")]
    Delayed,
    #[sea_orm(string_value = "Departed")]
    Departed,
    #[sea_orm(string_value = "Arrived")]
    Arrived,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

/// The timestamps status derivation looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlightTimes {
    pub scheduled_departure: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 6] = [
        Self::Scheduled,
        Self::OnTime,
        Self::Delayed,
        Self::Departed,
        Self::Arrived,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::OnTime => "On Time",
            Self::Delayed => "Delayed",
            Self::Departed => "Departed",
            Self::Arrived => "Arrived",
            Self::Cancelled => "Cancelled",
        }
    }

    /// `Arrived` and `Cancelled` never change again.
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Arrived | Self::Cancelled)
    }

    /// Computes the status a flight currently in `self` should have at `now`.
    pub fn derive(self, times: &FlightTimes, now: DateTime<Utc>) -> FlightStatus {
        if self == Self::Cancelled {
            return Self::Cancelled;
        }
        if times.actual_arrival.is_some() {
            return Self::Arrived;
        }
        if times.actual_departure.is_some() {
            return Self::Departed;
        }
        if times.scheduled_departure <= now - TimeDelta::minutes(DELAY_THRESHOLD_MINUTES) {
            Self::Delayed
        } else if times.scheduled_departure <= now {
            Self::OnTime
        } else {
            Self::Scheduled
        }
    }
}

impl FromStr for FlightStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                StoreError::invalid(format!(
                    "unknown flight status {s:?}; expected one of Scheduled, On Time, Delayed, Departed, Arrived, Cancelled"
                ))
            })
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
