//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{error, info, warn};

use super::extract::{ValidJson, ValidQuery};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{
    Committee, FundingRequest, Member, MemberQuery, NewCommittee, NewFundingRequest, NewMember,
    RequestStatus, RequestStatusUpdate, StatusUpdate,
};
use crate::sheets::{
    parse_budget, parse_membership, BudgetSummary, MembershipSummary, SheetRows,
};
use crate::store::Store;

const MEMBER_NOT_FOUND: &str = "Member not found";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store; the only shared state.
    pub store: Arc<dyn Store>,
    /// Prometheus handle when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// `{ success, member }` response.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// Always `true`.
    pub success: bool,
    /// The member record.
    pub member: Member,
}

impl MemberResponse {
    fn new(member: Member) -> Self {
        Self {
            success: true,
            member,
        }
    }
}

/// `{ message }` response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: &'static str,
}

/// `{ message, id }` response for a created funding request.
#[derive(Debug, Serialize)]
pub struct CreatedRequestResponse {
    /// Human-readable outcome.
    pub message: &'static str,
    /// Identifier of the new request.
    pub id: String,
}

/// Liveness check handler - always returns 200.
pub async fn home() -> impl IntoResponse {
    Json(MessageResponse {
        message: "BudgetCents API is live!",
    })
}

/// Prometheus scrape handler - 404 when no recorder is installed.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// === Members ===

/// `GET /getMemberData?userId=`
pub async fn get_member_data(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<MemberQuery>,
) -> Result<Json<MemberResponse>> {
    let member = state
        .store
        .find_member(&query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

    Ok(Json(MemberResponse::new(member.normalized())))
}

/// `POST /createMember`
pub async fn create_member(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewMember>,
) -> Result<(StatusCode, Json<MemberResponse>)> {
    let member = Member::enroll(payload);

    if let Err(e) = state.store.insert_member(&member).await {
        error!(user_id = %member.user_id, "Member insert failed: {e}");
        return Err(AppError::InsertFailed);
    }

    metrics::inc_members_created();
    info!(
        user_id = %member.user_id,
        member_type = %member.member_type,
        total_due = %member.dues.total_due,
        "Member created"
    );

    Ok((StatusCode::CREATED, Json(MemberResponse::new(member))))
}

/// `PATCH /updateStatus`
pub async fn update_status(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<StatusUpdate>,
) -> Result<Json<MemberResponse>> {
    let status = payload.dues_status().map_err(AppError::Validation)?;

    let modified = state
        .store
        .update_member_status(&payload.user_id, status)
        .await?;
    if modified == 0 {
        return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
    }

    let member = state
        .store
        .find_member(&payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;

    metrics::inc_member_status_updates();
    info!(user_id = %payload.user_id, %status, "Member dues status updated");

    Ok(Json(MemberResponse::new(member.normalized())))
}

// === Committee budgets ===

/// `POST /add_committee`
pub async fn add_committee(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewCommittee>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.store.upsert_committee(&payload).await?;

    metrics::inc_committees_upserted();
    info!(name = %payload.name, budget = ?payload.budget, "Committee budget saved");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Committee added successfully!",
        }),
    ))
}

/// `GET /get_committees`
pub async fn get_committees(State(state): State<AppState>) -> Result<Json<Vec<Committee>>> {
    Ok(Json(state.store.list_committees().await?))
}

/// `GET /get_committee_budgets`
pub async fn get_committee_budgets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Committee>>> {
    Ok(Json(state.store.list_committee_budgets().await?))
}

// === Funding requests ===

/// `GET /requests` - pending requests.
pub async fn list_pending_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<FundingRequest>>> {
    Ok(Json(state.store.find_requests(RequestStatus::Pending).await?))
}

/// `GET /requests/accepted`
pub async fn list_accepted_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<FundingRequest>>> {
    Ok(Json(state.store.find_requests(RequestStatus::Accepted).await?))
}

/// `GET /requests/declined` - returns declined requests, then deletes every
/// declined request. A second call returns an empty list.
pub async fn list_declined_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<FundingRequest>>> {
    let declined = state.store.find_requests(RequestStatus::Declined).await?;
    let purged = state.store.delete_requests(RequestStatus::Declined).await?;

    metrics::add_requests_purged(purged);
    info!(
        returned = declined.len(),
        purged, "Drained declined funding requests"
    );

    Ok(Json(declined))
}

/// `POST /requests/<id>` - sets status and processed time. Reports success
/// whether or not a request matched.
pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<RequestStatusUpdate>,
) -> Result<Json<MessageResponse>> {
    let matched = state
        .store
        .update_request_status(&id, &payload.status, Utc::now())
        .await?;

    if matched == 0 {
        warn!(%id, "Funding request status update matched nothing");
    } else {
        metrics::inc_requests_processed();
        info!(%id, status = %payload.status, "Funding request processed");
    }

    Ok(Json(MessageResponse {
        message: "Request updated successfully",
    }))
}

/// `POST /requests/new`
pub async fn create_request(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewFundingRequest>,
) -> Result<(StatusCode, Json<CreatedRequestResponse>)> {
    let request = FundingRequest::submit(payload, Utc::now());
    state.store.insert_request(&request).await?;

    metrics::inc_requests_created();
    info!(
        id = %request.id,
        department = %request.department,
        amount = %request.amount,
        "Funding request submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedRequestResponse {
            message: "Request created successfully",
            id: request.id,
        }),
    ))
}


// === Sheet summaries ===

/// `POST /google-sheets/budget`
pub async fn summarize_budget_sheet(
    ValidJson(payload): ValidJson<SheetRows>,
) -> Json<BudgetSummary> {
    let summary = parse_budget(&payload.rows);
    info!(
        rows = payload.rows.len(),
        expenses = summary.expense_labels.len(),
        total = %summary.total_expenses,
        "Budget sheet summarized"
    );
    Json(summary)
}

/// `POST /google-sheets/membership-structure`
pub async fn summarize_membership_sheet(
    ValidJson(payload): ValidJson<SheetRows>,
) -> Json<MembershipSummary> {
    let summary = parse_membership(&payload.rows);
    info!(
        rows = payload.rows.len(),
        categories = summary.labels.len(),
        total = summary.total,
        "Membership sheet summarized"
    );
    Json(summary)
}
