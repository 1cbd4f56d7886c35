//! Router tests over the in-memory store.
//!
//! Each test builds a fresh router, so no state leaks between tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use budgetcents::api::{create_router, AppState};
use budgetcents::store::memory::MemoryStoreConfig;
use budgetcents::store::MemoryStore;

fn app_with(store: MemoryStore) -> Router {
    create_router(AppState::new(Arc::new(store)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn member_payload(user_id: &str, member_type: &str) -> Value {
    json!({
        "userId": user_id,
        "name": "Ada Lovelace",
        "memberType": member_type,
        "pledgeClass": "alpha"
    })
}

fn request_payload(amount: Value) -> Value {
    json!({
        "department": "Social",
        "amount": amount,
        "description": "Spring mixer",
        "requester": "Ada"
    })
}

// === Liveness ===

#[tokio::test]
async fn root_reports_liveness() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "BudgetCents API is live!" }));
}

// === Members ===

#[tokio::test]
async fn pledge_dues_ignore_member_type_case() {
    let app = app_with(MemoryStore::new());

    for (i, member_type) in ["pledge", "Pledge", "PLEDGE"].iter().enumerate() {
        let user_id = format!("pledge-{i}");
        let (status, body) = send(
            &app,
            "POST",
            "/createMember",
            Some(member_payload(&user_id, member_type)),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["member"]["dues"]["totalDue"], 350.0);
        assert_eq!(body["member"]["memberType"], "PLEDGE");
    }
}

#[tokio::test]
async fn non_pledge_members_owe_standard_dues() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(
        &app,
        "POST",
        "/createMember",
        Some(member_payload("b-1", "Brother")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["member"],
        json!({
            "userId": "b-1",
            "name": "Ada Lovelace",
            "memberType": "BROTHER",
            "pledgeClass": "ALPHA",
            "dues": { "totalDue": 250.0, "totalPaid": 0.0, "status": "ACTIVE" }
        })
    );
}

#[tokio::test]
async fn created_member_can_be_fetched() {
    let app = app_with(MemoryStore::new());
    send(&app, "POST", "/createMember", Some(member_payload("u-1", "pledge"))).await;

    let (status, body) = send(&app, "GET", "/getMemberData?userId=u-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["member"]["userId"], "u-1");
    assert_eq!(body["member"]["pledgeClass"], "ALPHA");
    assert_eq!(body["member"]["dues"]["status"], "ACTIVE");
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/getMemberData?userId=ghost", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Member not found" }));
    assert!(body.get("member").is_none());
}

#[tokio::test]
async fn missing_user_id_query_is_a_validation_error() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/getMemberData", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn duplicate_member_id_fails_insert() {
    let app = app_with(MemoryStore::new());
    send(&app, "POST", "/createMember", Some(member_payload("u-1", "pledge"))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/createMember",
        Some(member_payload("u-1", "brother")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Insert failed" }));
}

#[tokio::test]
async fn unacknowledged_insert_fails() {
    let app = app_with(MemoryStore::with_config(MemoryStoreConfig { fail_inserts: true }));
    let (status, body) = send(
        &app,
        "POST",
        "/createMember",
        Some(member_payload("u-1", "pledge")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Insert failed");
}

#[tokio::test]
async fn create_member_requires_all_fields() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(
        &app,
        "POST",
        "/createMember",
        Some(json!({ "userId": "u-1", "name": "Ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/createMember",
        Some(member_payload("", "pledge")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId is required");
}

#[tokio::test]
async fn invalid_status_is_rejected_and_stored_status_unchanged() {
    let app = app_with(MemoryStore::new());
    send(&app, "POST", "/createMember", Some(member_payload("u-1", "pledge"))).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/updateStatus",
        Some(json!({ "userId": "u-1", "status": "SUSPENDED" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Invalid status. Must be ACTIVE, LOA, or PART-TIME"
        })
    );

    let (_, body) = send(&app, "GET", "/getMemberData?userId=u-1", None).await;
    assert_eq!(body["member"]["dues"]["status"], "ACTIVE");
}

#[tokio::test]
async fn valid_status_update_is_visible_in_response_and_fetch() {
    let app = app_with(MemoryStore::new());
    send(&app, "POST", "/createMember", Some(member_payload("u-1", "brother"))).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/updateStatus",
        Some(json!({ "userId": "u-1", "status": "PART-TIME" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["member"]["name"], "Ada Lovelace");
    assert_eq!(body["member"]["memberType"], "BROTHER");
    assert_eq!(body["member"]["dues"]["status"], "PART-TIME");
    assert_eq!(body["member"]["dues"]["totalDue"], 250.0);

    let (_, body) = send(&app, "GET", "/getMemberData?userId=u-1", None).await;
    assert_eq!(body["member"]["dues"]["status"], "PART-TIME");
}

#[tokio::test]
async fn status_update_for_unknown_member_is_not_found() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(
        &app,
        "PATCH",
        "/updateStatus",
        Some(json!({ "userId": "ghost", "status": "LOA" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Member not found");
}

#[tokio::test]
async fn setting_the_current_status_is_not_found() {
    let app = app_with(MemoryStore::new());
    send(&app, "POST", "/createMember", Some(member_payload("u-1", "brother"))).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/updateStatus",
        Some(json!({ "userId": "u-1", "status": "ACTIVE" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Member not found" }));

    let (_, body) = send(&app, "GET", "/getMemberData?userId=u-1", None).await;
    assert_eq!(body["member"]["dues"]["status"], "ACTIVE");
}

// === Committee budgets ===

#[tokio::test]
async fn committee_upsert_replaces_by_name() {
    let store = MemoryStore::new();
    let app = app_with(store.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/add_committee",
        Some(json!({ "name": "Social", "budget": 500, "activities": [{ "title": "Mixer" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Committee added successfully!" }));

    send(
        &app,
        "POST",
        "/add_committee",
        Some(json!({ "name": "Social", "budget": 750, "activities": [] })),
    )
    .await;

    assert_eq!(store.committee_count().await, 1);

    let (status, body) = send(&app, "GET", "/get_committees", None).await;
    assert_eq!(status, StatusCode::OK);
    let committees = body.as_array().unwrap();
    assert_eq!(committees.len(), 1);
    assert_eq!(committees[0]["name"], "Social");
    assert_eq!(committees[0]["budget"], 750.0);
    assert_eq!(committees[0]["activities"], json!([]));
    assert!(committees[0]["_id"].is_string());
}

#[tokio::test]
async fn committee_budgets_list_name_budget_and_activities() {
    let app = app_with(MemoryStore::new());
    send(
        &app,
        "POST",
        "/add_committee",
        Some(json!({ "name": "Philanthropy", "budget": 320.25, "activities": ["Food drive"] })),
    )
    .await;
    send(
        &app,
        "POST",
        "/add_committee",
        Some(json!({ "name": "Professional", "budget": 900 })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/get_committee_budgets", None).await;

    assert_eq!(status, StatusCode::OK);
    let committees = body.as_array().unwrap();
    assert_eq!(committees.len(), 2);
    assert_eq!(committees[0]["name"], "Philanthropy");
    assert_eq!(committees[0]["budget"], 320.25);
    assert_eq!(committees[0]["activities"], json!(["Food drive"]));
    assert_eq!(committees[1]["activities"], json!([]));
}

#[tokio::test]
async fn committee_without_name_is_rejected() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "POST", "/add_committee", Some(json!({ "budget": 10 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn committee_with_null_budget_and_activities_is_saved() {
    let app = app_with(MemoryStore::new());
    let (status, _) = send(
        &app,
        "POST",
        "/add_committee",
        Some(json!({ "name": "Social", "budget": null, "activities": null })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/get_committees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Social");
    assert_eq!(body[0]["budget"], Value::Null);
    assert_eq!(body[0]["activities"], json!([]));
}

#[tokio::test]
async fn request_with_null_description_is_created() {
    let app = app_with(MemoryStore::new());
    let mut payload = request_payload(json!(15));
    payload["description"] = Value::Null;

    let (status, _) = send(&app, "POST", "/requests/new", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/requests", None).await;
    assert_eq!(body[0]["description"], "");
}

// === Funding requests ===

#[tokio::test]
async fn string_amount_is_stored_as_number() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "POST", "/requests/new", Some(request_payload(json!("42.5")))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Request created successfully");
    let id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "GET", "/requests", None).await;
    let pending = body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["_id"], id.as_str());
    assert_eq!(pending[0]["amount"], 42.5);
    assert_eq!(pending[0]["status"], "pending");
    assert!(pending[0]["dateSubmitted"].is_string());
    assert!(pending[0].get("dateProcessed").is_none());
}

#[tokio::test]
async fn non_numeric_amount_is_a_validation_error() {
    let store = MemoryStore::new();
    let app = app_with(store.clone());
    let (status, body) = send(
        &app,
        "POST",
        "/requests/new",
        Some(request_payload(json!("a lot"))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(store.request_count().await, 0);
}

#[tokio::test]
async fn accepted_requests_leave_pending_list() {
    let app = app_with(MemoryStore::new());
    let (_, body) = send(&app, "POST", "/requests/new", Some(request_payload(json!(15)))).await;
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/requests/{id}"),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Request updated successfully" }));

    let (_, body) = send(&app, "GET", "/requests", None).await;
    assert_eq!(body, json!([]));

    let (_, body) = send(&app, "GET", "/requests/accepted", None).await;
    let accepted = body.as_array().unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["_id"], id.as_str());
    assert!(accepted[0]["dateProcessed"].is_string());

    // Listing accepted requests has no side effects.
    let (_, body) = send(&app, "GET", "/requests/accepted", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn declined_listing_drains_requests() {
    let store = MemoryStore::new();
    let app = app_with(store.clone());

    let (_, body) = send(&app, "POST", "/requests/new", Some(request_payload(json!("99")))).await;
    let id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "GET", "/requests", None).await;
    assert_eq!(body[0]["_id"], id.as_str());

    send(
        &app,
        "POST",
        &format!("/requests/{id}"),
        Some(json!({ "status": "declined" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/requests/declined", None).await;
    assert_eq!(status, StatusCode::OK);
    let declined = body.as_array().unwrap();
    assert_eq!(declined.len(), 1);
    assert_eq!(declined[0]["_id"], id.as_str());
    assert_eq!(declined[0]["status"], "declined");

    let (status, body) = send(&app, "GET", "/requests/declined", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(store.request_count().await, 0);
}

#[tokio::test]
async fn updating_unknown_request_still_reports_success() {
    let app = app_with(MemoryStore::new());

    for id in ["65f0c0ffee0000000000abcd", "not-an-id"] {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/requests/{id}"),
            Some(json!({ "status": "accepted" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Request updated successfully");
    }
}

#[tokio::test]
async fn request_status_is_not_restricted_to_known_values() {
    let app = app_with(MemoryStore::new());
    let (_, body) = send(&app, "POST", "/requests/new", Some(request_payload(json!(3)))).await;
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/requests/{id}"),
        Some(json!({ "status": "on-hold" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Neither pending, accepted nor declined.
    for uri in ["/requests", "/requests/accepted", "/requests/declined"] {
        let (_, body) = send(&app, "GET", uri, None).await;
        assert_eq!(body, json!([]), "{uri}");
    }
}

// === Sheet summaries ===

#[tokio::test]
async fn budget_sheet_is_summarized() {
    let app = app_with(MemoryStore::new());
    let rows = json!({
        "rows": [
            ["Expense Breakdown"],
            ["Social", "$1,000"],
            ["Nationals", 500],
            ["Retreat", "$0"],
            ["Grand Total", "$1,500"]
        ]
    });

    let (status, body) = send(&app, "POST", "/google-sheets/budget", Some(rows)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenseLabels"], json!(["Social", "Nationals"]));
    assert_eq!(body["expenses"], json!({ "Social": 1000.0, "Nationals": 500.0 }));
    assert_eq!(body["totalExpenses"], 1500.0);
    assert_eq!(body["expensesWithoutNationals"], 1000.0);
}

#[tokio::test]
async fn membership_sheet_is_summarized() {
    let app = app_with(MemoryStore::new());
    let rows = json!({
        "rows": [
            ["AKPsi Membership Structure"],
            ["Brothers", "40"],
            ["Pledges (15)"],
            []
        ]
    });

    let (status, body) =
        send(&app, "POST", "/google-sheets/membership-structure", Some(rows)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "labels": ["Brothers", "Pledges"], "values": [40, 15], "total": 55 })
    );
}

#[tokio::test]
async fn sheet_without_rows_is_a_validation_error() {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "POST", "/google-sheets/budget", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn approve_budget_is_not_routed() {
    let app = app_with(MemoryStore::new());
    let (status, _) = send(
        &app,
        "POST",
        "/approveBudget",
        Some(json!({ "name": "Social", "amount": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
