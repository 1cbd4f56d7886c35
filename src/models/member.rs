//! Member records and dues.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{require, Validate};

/// Member type that carries the higher dues amount.
pub const PLEDGE_MEMBER_TYPE: &str = "PLEDGE";

/// Dues owed by a pledge.
pub const PLEDGE_DUES: Decimal = dec!(350);

/// Dues owed by every other member type.
pub const STANDARD_DUES: Decimal = dec!(250);

/// Message returned when a status update names an unknown status.
pub const INVALID_STATUS_MESSAGE: &str = "Invalid status. Must be ACTIVE, LOA, or PART-TIME";

/// Dues standing of a member.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum DuesStatus {
    /// Full member paying full dues.
    #[default]
    #[serde(rename = "ACTIVE")]
    #[strum(serialize = "ACTIVE")]
    Active,
    /// Leave of absence.
    #[serde(rename = "LOA")]
    #[strum(serialize = "LOA")]
    Loa,
    /// Part-time member.
    #[serde(rename = "PART-TIME")]
    #[strum(serialize = "PART-TIME")]
    PartTime,
}

/// A member's financial obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dues {
    /// Amount owed for the term; fixed at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_due: Decimal,
    /// Amount paid so far.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    /// Dues standing.
    pub status: DuesStatus,
}

impl Dues {
    /// Fresh dues for a member of the given type: nothing paid, status ACTIVE.
    pub fn for_member_type(member_type: &str) -> Self {
        Self {
            total_due: dues_for(member_type),
            total_paid: Decimal::ZERO,
            status: DuesStatus::Active,
        }
    }
}

/// Total dues for a member type; the comparison ignores case.
pub fn dues_for(member_type: &str) -> Decimal {
    if member_type.to_uppercase() == PLEDGE_MEMBER_TYPE {
        PLEDGE_DUES
    } else {
        STANDARD_DUES
    }
}

/// A tracked member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Externally supplied identifier; primary key.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Member type, upper-case (e.g. PLEDGE, BROTHER).
    pub member_type: String,
    /// Pledge class, upper-case.
    pub pledge_class: String,
    /// Dues record.
    pub dues: Dues,
}

impl Member {
    /// Build a new member record from a creation payload.
    pub fn enroll(new: NewMember) -> Self {
        let member_type = new.member_type.to_uppercase();
        let dues = Dues::for_member_type(&member_type);
        Self {
            user_id: new.user_id,
            name: new.name,
            member_type,
            pledge_class: new.pledge_class.to_uppercase(),
            dues,
        }
    }

    /// Upper-case the member type of a record read back from the store.
    pub fn normalized(mut self) -> Self {
        self.member_type = self.member_type.to_uppercase();
        self
    }
}

/// Payload of `POST /createMember`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    /// Member identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Member type, any case.
    pub member_type: String,
    /// Pledge class, any case.
    pub pledge_class: String,
}

impl Validate for NewMember {
    fn validate(&self) -> Result<(), String> {
        require("userId", &self.user_id)?;
        require("name", &self.name)?;
        require("memberType", &self.member_type)?;
        require("pledgeClass", &self.pledge_class)
    }
}

/// Query string of `GET /getMemberData`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    /// Member identifier.
    pub user_id: String,
}

impl Validate for MemberQuery {
    fn validate(&self) -> Result<(), String> {
        require("userId", &self.user_id)
    }
}

/// Payload of `PATCH /updateStatus`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Member identifier.
    pub user_id: String,
    /// Requested dues status; must name a [`DuesStatus`].
    pub status: String,
}

impl StatusUpdate {
    /// Parse the requested status, exact match only.
    pub fn dues_status(&self) -> Result<DuesStatus, String> {
        self.status
            .parse()
            .map_err(|_| INVALID_STATUS_MESSAGE.to_string())
    }
}

impl Validate for StatusUpdate {
    fn validate(&self) -> Result<(), String> {
        require("userId", &self.user_id)?;
        self.dues_status().map(|_| ())
    }
}
