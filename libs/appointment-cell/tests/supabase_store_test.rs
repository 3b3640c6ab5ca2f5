use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentId, AppointmentStatus};
use appointment_cell::store::{AppointmentStore, SupabaseAppointmentStore};
use doctor_cell::models::{AccountId, DoctorProfileId};
use shared_database::StoreError;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn store_for(server: &MockServer) -> SupabaseAppointmentStore {
    let config = TestConfig {
        supabase_url: server.uri(),
        ..TestConfig::default()
    }
    .to_app_config();
    SupabaseAppointmentStore::new(&config)
}

#[tokio::test]
async fn test_get_appointment_row() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(
                &id.to_string(),
                "patient-1",
                &doctor_id.to_string(),
                "requested",
            )
        ])))
        .mount(&server)
        .await;

    let appointment = store_for(&server)
        .get(AppointmentId(id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(appointment.id, AppointmentId(id));
    assert_eq!(appointment.doctor_id, DoctorProfileId(doctor_id));
    assert_eq!(appointment.status, AppointmentStatus::Requested);
    assert_eq!(appointment.end - appointment.start, chrono::Duration::minutes(30));
}

#[tokio::test]
async fn test_status_update_is_guarded_by_previous_status() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let row = MockSupabaseResponses::appointment_response(
        &id.to_string(),
        "patient-1",
        &doctor_id.to_string(),
        "requested",
    );
    let mut appointment: appointment_cell::models::Appointment =
        serde_json::from_value(row.clone()).unwrap();
    appointment.status = AppointmentStatus::Rejected;

    let mut updated_row = row;
    updated_row["status"] = json!("rejected");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "eq.requested"))
        .and(body_partial_json(json!({ "status": "rejected" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated_row])))
        .expect(1)
        .mount(&server)
        .await;

    let saved = store_for(&server)
        .update_if_status(appointment, AppointmentStatus::Requested)
        .await
        .unwrap();
    assert_eq!(saved.status, AppointmentStatus::Rejected);
}

#[tokio::test]
async fn test_status_update_that_matches_nothing_is_a_conflict() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    let row = MockSupabaseResponses::appointment_response(
        &id.to_string(),
        "patient-1",
        &Uuid::new_v4().to_string(),
        "requested",
    );
    let appointment = serde_json::from_value(row).unwrap();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = store_for(&server)
        .update_if_status(appointment, AppointmentStatus::Requested)
        .await;
    assert_matches!(result, Err(StoreError::VersionConflict));
}

#[tokio::test]
async fn test_list_for_patient_orders_by_start() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("patient_account_id", "eq.patient-1"))
        .and(query_param("order", "start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let appointments = store_for(&server)
        .list_for_patient(&AccountId::from("patient-1"))
        .await
        .unwrap();
    assert!(appointments.is_empty());
}

#[tokio::test]
async fn test_insert_failure_is_a_backend_error() {
    let server = MockServer::start().await;
    let row = MockSupabaseResponses::appointment_response(
        &Uuid::new_v4().to_string(),
        "patient-1",
        &Uuid::new_v4().to_string(),
        "requested",
    );
    let appointment = serde_json::from_value(row).unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let result = store_for(&server).insert(appointment).await;
    assert_matches!(result, Err(StoreError::Backend(_)));
}
