//! Document store access.
//!
//! Handlers only see the [`Store`] trait. [`MongoStore`] talks to MongoDB;
//! [`MemoryStore`] keeps everything in process and backs the tests.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Committee, DuesStatus, FundingRequest, Member, NewCommittee, RequestStatus};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Operations over the `members`, `budgets` and `requests` collections.
#[async_trait]
pub trait Store: Send + Sync {
    // Members

    /// Look up a member by id.
    async fn find_member(&self, user_id: &str) -> StoreResult<Option<Member>>;

    /// Insert a new member. A colliding id is an error.
    async fn insert_member(&self, member: &Member) -> StoreResult<()>;

    /// Set a member's dues status. Returns the number of members changed;
    /// a member already holding `status` is not counted.
    async fn update_member_status(&self, user_id: &str, status: DuesStatus) -> StoreResult<u64>;

    // Committee budgets

    /// Insert or fully replace the committee with the same name.
    async fn upsert_committee(&self, committee: &NewCommittee) -> StoreResult<()>;

    /// Every committee document.
    async fn list_committees(&self) -> StoreResult<Vec<Committee>>;

    /// Every committee, restricted to name, budget and activities.
    async fn list_committee_budgets(&self) -> StoreResult<Vec<Committee>>;

    // Funding requests

    /// Insert a new funding request.
    async fn insert_request(&self, request: &FundingRequest) -> StoreResult<()>;

    /// Requests whose status equals `status`.
    async fn find_requests(&self, status: RequestStatus) -> StoreResult<Vec<FundingRequest>>;

    /// Delete every request whose status equals `status`. Returns the count.
    async fn delete_requests(&self, status: RequestStatus) -> StoreResult<u64>;

    /// Set a request's status and processed time. Returns the number matched;
    /// an id that cannot name a request matches nothing.
    async fn update_request_status(
        &self,
        id: &str,
        status: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<u64>;
}
