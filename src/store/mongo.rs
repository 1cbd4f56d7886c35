//! MongoDB-backed store.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::StoreError;
use crate::metrics::record_store_latency;
use crate::models::{
    Committee, Dues, DuesStatus, FundingRequest, Member, NewCommittee, RequestStatus,
};

use super::{Store, StoreResult};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Member as stored: the user id is the document `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberDocument {
    #[serde(rename = "_id")]
    user_id: String,
    name: String,
    member_type: String,
    pledge_class: String,
    dues: Dues,
}

impl From<&Member> for MemberDocument {
    fn from(member: &Member) -> Self {
        Self {
            user_id: member.user_id.clone(),
            name: member.name.clone(),
            member_type: member.member_type.clone(),
            pledge_class: member.pledge_class.clone(),
            dues: member.dues.clone(),
        }
    }
}

impl From<MemberDocument> for Member {
    fn from(doc: MemberDocument) -> Self {
        Self {
            user_id: doc.user_id,
            name: doc.name,
            member_type: doc.member_type,
            pledge_class: doc.pledge_class,
            dues: doc.dues,
        }
    }
}

/// Committee as stored. `_id` is omitted on replacement so upserts keep it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommitteeDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    budget: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    activities: Vec<Value>,
}

impl From<&NewCommittee> for CommitteeDocument {
    fn from(committee: &NewCommittee) -> Self {
        Self {
            id: None,
            name: committee.name.clone(),
            budget: committee.budget,
            activities: committee.activities.clone(),
        }
    }
}

impl From<CommitteeDocument> for Committee {
    fn from(doc: CommitteeDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            budget: doc.budget,
            activities: doc.activities,
        }
    }
}

/// Funding request as stored, with native ids and dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    department: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    description: String,
    requester: String,
    status: String,
    date_submitted: BsonDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_processed: Option<BsonDateTime>,
}

impl TryFrom<&FundingRequest> for RequestDocument {
    type Error = StoreError;

    fn try_from(request: &FundingRequest) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&request.id)
            .map_err(|e| StoreError::Malformed(format!("request id {}: {e}", request.id)))?;
        Ok(Self {
            id,
            department: request.department.clone(),
            amount: request.amount,
            description: request.description.clone(),
            requester: request.requester.clone(),
            status: request.status.clone(),
            date_submitted: to_bson_date(request.date_submitted),
            date_processed: request.date_processed.map(to_bson_date),
        })
    }
}

impl From<RequestDocument> for FundingRequest {
    fn from(doc: RequestDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            department: doc.department,
            amount: doc.amount,
            description: doc.description,
            requester: doc.requester,
            status: doc.status,
            date_submitted: from_bson_date(doc.date_submitted),
            date_processed: doc.date_processed.map(from_bson_date),
        }
    }
}

fn to_bson_date(at: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        &*error.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Store backed by one long-lived MongoDB client.
#[derive(Debug, Clone)]
pub struct MongoStore {
    members: Collection<MemberDocument>,
    budgets: Collection<CommitteeDocument>,
    requests: Collection<RequestDocument>,
}

impl MongoStore {
    /// Create the client and bind the configured collections.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.connection_string).await?;
        info!(
            database = %config.database_name,
            "MongoDB client created"
        );
        Ok(Self::with_database(&client.database(&config.database_name), config))
    }

    /// Bind the configured collections of an existing database handle.
    pub fn with_database(database: &Database, config: &Config) -> Self {
        Self {
            members: database.collection(&config.members_collection),
            budgets: database.collection(&config.budgets_collection),
            requests: database.collection(&config.requests_collection),
        }
    }
}

#[async_trait]
impl Store for MongoStore {
    #[instrument(skip(self))]
    async fn find_member(&self, user_id: &str) -> StoreResult<Option<Member>> {
        let start = Instant::now();
        let found = self.members.find_one(doc! { "_id": user_id }).await?;
        record_store_latency("find_member", start);
        Ok(found.map(Member::from))
    }

    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    async fn insert_member(&self, member: &Member) -> StoreResult<()> {
        let start = Instant::now();
        let result = self.members.insert_one(MemberDocument::from(member)).await;
        record_store_latency("insert_member", start);
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey(member.user_id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn update_member_status(&self, user_id: &str, status: DuesStatus) -> StoreResult<u64> {
        let start = Instant::now();
        let result = self
            .members
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": { "dues.status": status.to_string() } },
            )
            .await?;
        record_store_latency("update_member_status", start);
        debug!(
            matched = result.matched_count,
            modified = result.modified_count,
            "Member status update applied"
        );
        Ok(result.modified_count)
    }

    #[instrument(skip(self, committee), fields(name = %committee.name))]
    async fn upsert_committee(&self, committee: &NewCommittee) -> StoreResult<()> {
        let start = Instant::now();
        let result = self
            .budgets
            .replace_one(
                doc! { "name": &committee.name },
                CommitteeDocument::from(committee),
            )
            .upsert(true)
            .await?;
        record_store_latency("upsert_committee", start);
        debug!(
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Committee upserted"
        );
        Ok(())
    }

    async fn list_committees(&self) -> StoreResult<Vec<Committee>> {
        let start = Instant::now();
        let docs: Vec<CommitteeDocument> = self.budgets.find(doc! {}).await?.try_collect().await?;
        record_store_latency("list_committees", start);
        Ok(docs.into_iter().map(Committee::from).collect())
    }

    async fn list_committee_budgets(&self) -> StoreResult<Vec<Committee>> {
        let start = Instant::now();
        let docs: Vec<CommitteeDocument> = self
            .budgets
            .find(doc! {})
            .projection(doc! { "name": 1, "budget": 1, "activities": 1 })
            .await?
            .try_collect()
            .await?;
        record_store_latency("list_committee_budgets", start);
        Ok(docs.into_iter().map(Committee::from).collect())
    }

    #[instrument(skip(self, request), fields(id = %request.id))]
    async fn insert_request(&self, request: &FundingRequest) -> StoreResult<()> {
        let document = RequestDocument::try_from(request)?;
        let start = Instant::now();
        self.requests.insert_one(document).await?;
        record_store_latency("insert_request", start);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_requests(&self, status: RequestStatus) -> StoreResult<Vec<FundingRequest>> {
        let start = Instant::now();
        let docs: Vec<RequestDocument> = self
            .requests
            .find(doc! { "status": status.to_string() })
            .await?
            .try_collect()
            .await?;
        record_store_latency("find_requests", start);
        Ok(docs.into_iter().map(FundingRequest::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_requests(&self, status: RequestStatus) -> StoreResult<u64> {
        let start = Instant::now();
        let result = self
            .requests
            .delete_many(doc! { "status": status.to_string() })
            .await?;
        record_store_latency("delete_requests", start);
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn update_request_status(
        &self,
        id: &str,
        status: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            debug!("Request id is not an ObjectId; nothing to update");
            return Ok(0);
        };

        let start = Instant::now();
        let result = self
            .requests
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "status": status, "dateProcessed": to_bson_date(processed_at) } },
            )
            .await?;
        record_store_latency("update_request_status", start);
        Ok(result.matched_count)
    }
}
