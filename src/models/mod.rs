//! Domain records and inbound payloads.
//!
//! - [`member`]: members and their dues
//! - [`committee`]: committee budgets
//! - [`request`]: committee funding requests

pub mod committee;
pub mod member;
pub mod request;

pub use committee::{Committee, NewCommittee};
pub use member::{Dues, DuesStatus, Member, MemberQuery, NewMember, StatusUpdate};
pub use request::{FundingRequest, NewFundingRequest, RequestStatus, RequestStatusUpdate};

/// Boundary checks applied to a payload after it has been deserialized.
pub trait Validate {
    /// Returns a human-readable message describing the first violation.
    fn validate(&self) -> Result<(), String>;
}

/// Reject a required string field that is empty or whitespace.
pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// Deserialize an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]` so a missing field also gets the default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
