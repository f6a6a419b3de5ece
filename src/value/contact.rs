use std::fmt;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Passenger contact details stored in the `tickets.contact_data` JSON column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct ContactData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactData {
    /// Trims every field and drops the blank ones.
    pub fn new(phone: Option<&str>, email: Option<&str>, address: Option<&str>) -> Self {
        Self {
            phone: non_blank(phone),
            email: non_blank(email),
            address: non_blank(address),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none() && self.address.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl fmt::Display for ContactData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();

        if parts.is_empty() {
            f.write_str("no contact data")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
