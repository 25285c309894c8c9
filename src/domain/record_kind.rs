use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EtlError;

/// The table kind a dataset belongs to. Decides which cleaning pipeline runs;
/// it is fixed by the caller and never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Card,
    Store,
    Product,
    Order,
    EventDate,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::User,
        RecordKind::Card,
        RecordKind::Store,
        RecordKind::Product,
        RecordKind::Order,
        RecordKind::EventDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Card => "card",
            RecordKind::Store => "store",
            RecordKind::Product => "product",
            RecordKind::Order => "order",
            RecordKind::EventDate => "event_date",
        }
    }

    /// Table name used in the destination store when a job doesn't override it
    pub fn default_destination(&self) -> &'static str {
        match self {
            RecordKind::User => "dim_users",
            RecordKind::Card => "dim_card_details",
            RecordKind::Store => "dim_store_details",
            RecordKind::Product => "dim_products",
            RecordKind::Order => "orders_table",
            RecordKind::EventDate => "dim_date_times",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(RecordKind::User),
            "card" | "cards" => Ok(RecordKind::Card),
            "store" | "stores" => Ok(RecordKind::Store),
            "product" | "products" => Ok(RecordKind::Product),
            "order" | "orders" => Ok(RecordKind::Order),
            "event_date" | "event_dates" | "date" | "dates" => Ok(RecordKind::EventDate),
            other => Err(EtlError::UnknownRecordKind(other.to_string())),
        }
    }
}
