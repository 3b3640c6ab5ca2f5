use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::router::{availability_routes, doctor_routes};
use doctor_cell::store::{InMemoryAvailabilityStore, InMemoryDoctorProfileStore};
use doctor_cell::DoctorCellState;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn create_test_state() -> DoctorCellState {
    DoctorCellState::new(
        TestConfig::default().to_arc(),
        Arc::new(InMemoryDoctorProfileStore::new()),
        Arc::new(InMemoryAvailabilityStore::new()),
    )
}

fn token_for(user: &TestUser) -> String {
    JwtTestUtils::create_test_token(user, &TestConfig::default().jwt_secret, None)
}

async fn send(app: Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_profile(state: &DoctorCellState, doctor: &TestUser) -> String {
    let (status, body) = send(
        doctor_routes(state.clone()),
        "PUT",
        "/profile",
        Some(&token_for(doctor)),
        Some(json!({
            "specialties": ["cardiology"],
            "experience_years": 12,
            "credentials": ["MD-001"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_submit_profile_then_read_back() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    let profile_id = create_profile(&state, &doctor).await;

    let (status, me) = send(doctor_routes(state.clone()), "GET", "/profile/me", Some(&token_for(&doctor)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], profile_id.as_str());
    assert_eq!(me["account_id"], doctor.id.as_str());
    assert_eq!(me["verification_status"], "pending");

    let (status, public) = send(doctor_routes(state), "GET", &format!("/{}", profile_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["specialties"], json!(["cardiology"]));
}

#[tokio::test]
async fn test_profile_requires_doctor_role() {
    let state = create_test_state();
    let patient = TestUser::patient("pat@example.com");

    let (status, body) = send(
        doctor_routes(state),
        "PUT",
        "/profile",
        Some(&token_for(&patient)),
        Some(json!({ "specialties": [], "experience_years": 1, "credentials": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let state = create_test_state();
    let (status, _) = send(doctor_routes(state), "GET", "/profile/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    let expired = JwtTestUtils::create_expired_token(&doctor, &TestConfig::default().jwt_secret);

    let (status, _) = send(doctor_routes(state), "GET", "/profile/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_availability_and_query_by_date() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    let profile_id = create_profile(&state, &doctor).await;

    let (status, day) = send(
        availability_routes(state.clone()),
        "POST",
        "/",
        Some(&token_for(&doctor)),
        Some(json!({
            "date": "2030-05-01",
            "slots": [
                { "start": "2030-05-01T11:00:00Z", "end": "2030-05-01T11:30:00Z" },
                { "start": "2030-05-01T10:00:00Z", "end": "2030-05-01T10:30:00Z", "status": "open" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["doctor_id"], profile_id.as_str());
    assert_eq!(day["version"], 1);
    assert_eq!(day["slots"][0]["start"], "2030-05-01T10:00:00Z");

    let (status, days) = send(
        availability_routes(state),
        "GET",
        &format!("/{}?date=2030-05-01", profile_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days.as_array().unwrap().len(), 1);
    assert_eq!(days[0]["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_submit_availability_without_profile() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");

    let (status, body) = send(
        availability_routes(state),
        "POST",
        "/",
        Some(&token_for(&doctor)),
        Some(json!({
            "date": "2030-05-01",
            "slots": [{ "start": "2030-05-01T10:00:00Z", "end": "2030-05-01T10:30:00Z" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "profile_not_found");
}

#[tokio::test]
async fn test_overlapping_slots_rejected() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    let profile_id = create_profile(&state, &doctor).await;
    let token = token_for(&doctor);
    let day_uri = format!("/{}?date=2030-05-01", profile_id);

    let (status, body) = send(
        availability_routes(state.clone()),
        "POST",
        "/",
        Some(&token),
        Some(json!({
            "date": "2030-05-01",
            "slots": [
                { "start": "2030-05-01T10:00:00Z", "end": "2030-05-01T11:00:00Z" },
                { "start": "2030-05-01T10:30:00Z", "end": "2030-05-01T11:30:00Z" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "overlapping_slots");

    let (_, days) = send(availability_routes(state.clone()), "GET", &day_uri, None, None).await;
    assert_eq!(days, json!([]));

    let (status, _) = send(
        availability_routes(state.clone()),
        "POST",
        "/",
        Some(&token),
        Some(json!({
            "date": "2030-05-01",
            "slots": [{ "start": "2030-05-01T09:00:00Z", "end": "2030-05-01T09:30:00Z" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, before) = send(availability_routes(state.clone()), "GET", &day_uri, None, None).await;

    // A rejected resubmission leaves the stored day as it was.
    let (status, _) = send(
        availability_routes(state.clone()),
        "POST",
        "/",
        Some(&token),
        Some(json!({
            "date": "2030-05-01",
            "slots": [
                { "start": "2030-05-01T14:00:00Z", "end": "2030-05-01T15:00:00Z" },
                { "start": "2030-05-01T14:45:00Z", "end": "2030-05-01T15:15:00Z" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, after) = send(availability_routes(state), "GET", &day_uri, None, None).await;
    assert_eq!(after, before);
    assert_eq!(after[0]["slots"].as_array().unwrap().len(), 1);
    assert_eq!(after[0]["version"], 1);
}

#[tokio::test]
async fn test_malformed_slot_instant_is_invalid_payload() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    create_profile(&state, &doctor).await;

    let (status, body) = send(
        availability_routes(state),
        "POST",
        "/",
        Some(&token_for(&doctor)),
        Some(json!({
            "date": "2030-05-01",
            "slots": [{ "start": "9:00", "end": "2030-05-01T09:30:00Z" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_payload");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_profile_id_is_invalid_payload() {
    let state = create_test_state();

    let (status, body) = send(doctor_routes(state.clone()), "GET", "/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_payload");

    let (status, body) = send(availability_routes(state), "GET", "/not-a-uuid?date=2030-05-01", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_payload");
}

#[tokio::test]
async fn test_invalid_date_key_on_query() {
    let state = create_test_state();
    let doctor = TestUser::doctor("doc@example.com");
    let profile_id = create_profile(&state, &doctor).await;

    let (status, body) = send(
        availability_routes(state),
        "GET",
        &format!("/{}?date=05-01-2030", profile_id),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_date");
}

#[tokio::test]
async fn test_unknown_doctor_has_no_availability() {
    let state = create_test_state();
    let (status, days) = send(
        availability_routes(state),
        "GET",
        &format!("/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(days, json!([]));
}
