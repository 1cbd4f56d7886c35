//! Committee funding requests.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use super::{require, Validate};

/// Lifecycle of a funding request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved.
    Accepted,
    /// Rejected; drained on the next declined listing.
    Declined,
}

/// A funding request as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRequest {
    /// Store identifier as a hex string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Requesting department.
    pub department: String,
    /// Requested amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// What the money is for.
    pub description: String,
    /// Who asked.
    pub requester: String,
    /// Status; normally a [`RequestStatus`] value but stored as given.
    pub status: String,
    /// When the request was created.
    pub date_submitted: DateTime<Utc>,
    /// When the status last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_processed: Option<DateTime<Utc>>,
}

impl FundingRequest {
    /// A fresh pending request with a newly generated identifier.
    pub fn submit(new: NewFundingRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            department: new.department,
            amount: new.amount,
            description: new.description,
            requester: new.requester,
            status: RequestStatus::Pending.to_string(),
            date_submitted: now,
            date_processed: None,
        }
    }
}

/// Payload of `POST /requests/new`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFundingRequest {
    /// Requesting department.
    pub department: String,
    /// Amount; a JSON number or a numeric string.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    /// What the money is for; missing and `null` read as empty.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    /// Who asked.
    pub requester: String,
}

impl Validate for NewFundingRequest {
    fn validate(&self) -> Result<(), String> {
        require("department", &self.department)?;
        require("requester", &self.requester)
    }
}

/// Payload of `POST /requests/<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestStatusUpdate {
    /// New status; any non-empty string is stored.
    pub status: String,
}

impl Validate for RequestStatusUpdate {
    fn validate(&self) -> Result<(), String> {
        require("status", &self.status)
    }
}

/// Parse an amount from text, allowing surrounding whitespace and exponents.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| format!("amount must be numeric, got {raw:?}"))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    let raw = match RawAmount::deserialize(deserializer) {
        Ok(RawAmount::Number(n)) => n.to_string(),
        Ok(RawAmount::Text(s)) => s,
        Err(_) => {
            return Err(de::Error::custom(
                "amount must be a number or numeric string",
            ))
        }
    };
    parse_amount(&raw).map_err(de::Error::custom)
}
