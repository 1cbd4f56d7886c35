//! Committee budgets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_default, require, Validate};

/// A committee budget as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Committee {
    /// Store identifier as a hex string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Committee name; natural key.
    pub name: String,
    /// Allocated budget; `null` when not yet set.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget: Option<Decimal>,
    /// Planned activities, stored as given.
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Value>,
}

/// Payload of `POST /add_committee`; also the replacement document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCommittee {
    /// Committee name.
    pub name: String,
    /// Allocated budget; missing and `null` are both stored as `null`.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget: Option<Decimal>,
    /// Planned activities; `null` is stored as an empty list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Value>,
}

impl NewCommittee {
    /// Attach a store identifier.
    pub fn with_id(self, id: impl Into<String>) -> Committee {
        Committee {
            id: id.into(),
            name: self.name,
            budget: self.budget,
            activities: self.activities,
        }
    }
}

impl Validate for NewCommittee {
    fn validate(&self) -> Result<(), String> {
        require("name", &self.name)
    }
}
