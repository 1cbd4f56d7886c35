//! HTTP API route definitions.

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_committee, create_member, create_request, get_committee_budgets, get_committees,
    get_member_data, home, list_accepted_requests, list_declined_requests,
    list_pending_requests, render_metrics, summarize_budget_sheet, summarize_membership_sheet,
    update_request, update_status, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(home))
        .route("/metrics", get(render_metrics))
        // Members
        .route("/getMemberData", get(get_member_data))
        .route("/createMember", post(create_member))
        .route("/updateStatus", patch(update_status))
        // Committee budgets
        .route("/add_committee", post(add_committee))
        .route("/get_committees", get(get_committees))
        .route("/get_committee_budgets", get(get_committee_budgets))
        // Funding requests
        .route("/requests", get(list_pending_requests))
        .route("/requests/accepted", get(list_accepted_requests))
        .route("/requests/declined", get(list_declined_requests))
        .route("/requests/new", post(create_request))
        .route("/requests/:id", post(update_request))
        // Sheet summaries
        .route("/google-sheets/budget", post(summarize_budget_sheet))
        .route(
            "/google-sheets/membership-structure",
            post(summarize_membership_sheet),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
