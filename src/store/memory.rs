//! In-process store for tests and local experiments.
//!
//! Mirrors the MongoDB semantics the handlers depend on: member ids are
//! unique, committees upsert by name, requests keep insertion order.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{Committee, DuesStatus, FundingRequest, Member, NewCommittee, RequestStatus};

use super::{Store, StoreResult};

/// Knobs for simulating store failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreConfig {
    /// Reject every insert as if the store never acknowledged it.
    pub fail_inserts: bool,
}

#[derive(Debug, Default)]
struct Collections {
    members: BTreeMap<String, Member>,
    committees: Vec<Committee>,
    requests: Vec<FundingRequest>,
}

/// Store holding all records in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    config: MemoryStoreConfig,
    data: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom failure behavior.
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            data: Arc::default(),
        }
    }

    /// Number of stored requests in any status.
    pub async fn request_count(&self) -> usize {
        self.data.lock().await.requests.len()
    }

    /// Number of stored committees.
    pub async fn committee_count(&self) -> usize {
        self.data.lock().await.committees.len()
    }

    fn check_insert(&self) -> StoreResult<()> {
        if self.config.fail_inserts {
            return Err(StoreError::Unacknowledged);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_member(&self, user_id: &str) -> StoreResult<Option<Member>> {
        Ok(self.data.lock().await.members.get(user_id).cloned())
    }

    async fn insert_member(&self, member: &Member) -> StoreResult<()> {
        self.check_insert()?;
        let mut data = self.data.lock().await;
        if data.members.contains_key(&member.user_id) {
            return Err(StoreError::DuplicateKey(member.user_id.clone()));
        }
        data.members.insert(member.user_id.clone(), member.clone());
        Ok(())
    }

    async fn update_member_status(&self, user_id: &str, status: DuesStatus) -> StoreResult<u64> {
        let mut data = self.data.lock().await;
        match data.members.get_mut(user_id) {
            Some(member) if member.dues.status != status => {
                member.dues.status = status;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn upsert_committee(&self, committee: &NewCommittee) -> StoreResult<()> {
        let mut data = self.data.lock().await;
        match data.committees.iter_mut().find(|c| c.name == committee.name) {
            Some(existing) => {
                let id = std::mem::take(&mut existing.id);
                *existing = committee.clone().with_id(id);
            }
            None => {
                self.check_insert()?;
                data.committees
                    .push(committee.clone().with_id(ObjectId::new().to_hex()));
            }
        }
        Ok(())
    }

    async fn list_committees(&self) -> StoreResult<Vec<Committee>> {
        Ok(self.data.lock().await.committees.clone())
    }

    async fn list_committee_budgets(&self) -> StoreResult<Vec<Committee>> {
        self.list_committees().await
    }

    async fn insert_request(&self, request: &FundingRequest) -> StoreResult<()> {
        self.check_insert()?;
        self.data.lock().await.requests.push(request.clone());
        Ok(())
    }

    async fn find_requests(&self, status: RequestStatus) -> StoreResult<Vec<FundingRequest>> {
        let status = status.to_string();
        let data = self.data.lock().await;
        Ok(data
            .requests
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn delete_requests(&self, status: RequestStatus) -> StoreResult<u64> {
        let status = status.to_string();
        let mut data = self.data.lock().await;
        let before = data.requests.len();
        data.requests.retain(|r| r.status != status);
        Ok((before - data.requests.len()) as u64)
    }

    async fn update_request_status(
        &self,
        id: &str,
        status: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut data = self.data.lock().await;
        match data.requests.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.status = status.to_string();
                request.date_processed = Some(processed_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
