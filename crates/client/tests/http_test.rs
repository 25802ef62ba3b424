use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::NaiveDate;
use healthsync_client::{
    ApiClient,
    config::ClientConfig,
    http::{IDEMPOTENCY_HEADER, extract_detail},
    services::{
        AuthService, ChatbotService, DirectoryService, EmergencyService, RecordsService,
        ReservationService,
    },
};
use healthsync_core::{
    errors::HealthError,
    models::{
        appointment::{AppointmentWindow, CreateAppointmentRequest},
        auth::LoginRequest,
        emergency::Coordinates,
    },
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

const TOKEN: &str = "secret-token";

#[derive(Clone, Default)]
struct Recorded {
    idempotency_keys: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid token" })))
}

async fn hospitals(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            { "id": "h1", "name": "City Hospital", "address": "1 Main St", "lat": 1.0, "lng": 2.0 }
        ])),
    )
}

async fn departments(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let hospital_id = params.get("hospital_id").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!([{
            "id": format!("{}-cardio", hospital_id),
            "name": "Cardiology",
            "hospital_id": hospital_id
        }])),
    )
}

async fn doctors(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let department_id = params.get("department_id").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!([{
            "user_id": "doc1",
            "username": "drgrey",
            "specialty": "Cardiology",
            "department_id": department_id
        }])),
    )
}

async fn slots(
    headers: HeaderMap,
    Path(doctor_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if doctor_id != "doc 1" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Doctor not found" })));
    }
    match params.get("date").map(String::as_str) {
        Some("2030-01-15") => (
            StatusCode::OK,
            Json(json!([
                { "start_time": "09:00", "end_time": "09:30" },
                { "start_time": "09:30", "end_time": "10:00" }
            ])),
        ),
        _ => (StatusCode::OK, Json(json!([]))),
    }
}

async fn appointments(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(key) = headers.get(IDEMPOTENCY_HEADER).and_then(|v| v.to_str().ok()) {
        recorded.idempotency_keys.lock().unwrap().push(key.to_string());
    }
    recorded.bodies.lock().unwrap().push(body.clone());

    if body["start_time"] == "09:00" {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Slot already booked" })))
    } else {
        (StatusCode::OK, Json(json!({ "message": "ok" })))
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "ana" && body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({
                "token": TOKEN,
                "user": { "id": "u1", "username": "ana", "email": "ana@example.com" }
            })),
        )
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Invalid username or password" })))
    }
}

async fn emergency(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if params.get("lat").is_none() || params.get("lng").is_none() {
        let detail = json!({ "detail": [{ "msg": "field required" }] });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(detail));
    }
    (
        StatusCode::OK,
        Json(json!({ "hospitals": [
            {
                "name": "General",
                "address": "Elm St",
                "lat": 10.0,
                "lng": 20.0,
                "doctorAvailability": true
            }
        ] })),
    )
}

async fn chatbot(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "response": format!("echo: {}", body["query"].as_str().unwrap_or_default()) }))
}

async fn spawn_backend() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/hospitals", get(hospitals))
        .route("/api/departments", get(departments))
        .route("/api/doctors", get(doctors))
        .route("/api/doctor/:doctor_id/slots", get(slots))
        .route("/api/appointments", post(appointments))
        .route("/api/auth/login", post(login))
        .route("/api/emergency/hospitals", get(emergency))
        .route("/chatbot", post(chatbot))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

async fn medical_history(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "id": "m1",
                "user_id": "u1",
                "conditions": "Asthma",
                "allergies": null,
                "notes": "Uses inhaler",
                "updated_at": "2030-01-02T10:00:00",
                "updated_by": "house"
            }
        ])),
    )
}

async fn patient_history(
    headers: HeaderMap,
    Path(patient_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if patient_id != "u 1" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Patient not found" })));
    }
    (StatusCode::OK, Json(json!([{ "id": "m1", "user_id": "u 1" }])))
}

async fn doctor_appointments(
    headers: HeaderMap,
    Path(window): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let appointment = |id: &str, date: &str| {
        json!({
            "id": id,
            "user_id": "u1",
            "username": "ana",
            "doctor_id": "doc1",
            "doctor_username": "house",
            "department_id": "d1",
            "department_name": "Cardiology",
            "appointment_date": date,
            "start_time": "09:00",
            "end_time": "09:30",
            "status": "scheduled",
            "created_at": "2030-01-01"
        })
    };
    match window.as_str() {
        "today" => (StatusCode::OK, Json(json!([appointment("a1", "2030-01-15")]))),
        "week" => (
            StatusCode::OK,
            Json(json!([appointment("a1", "2030-01-15"), appointment("a2", "2030-01-17")])),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))),
    }
}

/// The dashboard endpoints live on their own router; their static segments
/// would overlap the slot route's parameter.
async fn spawn_records_backend() -> String {
    let app = Router::new()
        .route("/api/medical-history", get(medical_history))
        .route("/api/doctor/patient/:patient_id/history", get(patient_history))
        .route("/api/doctor/appointments/:window", get(doctor_appointments));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> ApiClient {
    let config = ClientConfig {
        api_url: base_url.to_string(),
        request_timeout: 5,
        ..ClientConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

fn booking(start: &str, end: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        user_id: "u1".to_string(),
        doctor_id: "doc1".to_string(),
        hospital_id: "h1".to_string(),
        department_id: "d1".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        appointment_date: "2030-01-15".to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_hospitals_sends_bearer_token() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let hospitals = client.hospitals(TOKEN).await.unwrap();
    assert_eq!(hospitals.len(), 1);
    assert_eq!(hospitals[0].name, "City Hospital");

    let err = client.hospitals("wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        err.user_message("Failed to fetch hospitals", "Error fetching hospitals"),
        "Invalid token"
    );
}

#[tokio::test]
async fn test_departments_and_doctors_are_filtered_by_query() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let departments = client.departments(TOKEN, "h7").await.unwrap();
    assert_eq!(departments[0].id, "h7-cardio");
    assert_eq!(departments[0].hospital_id.as_deref(), Some("h7"));

    let doctors = client.doctors(TOKEN, "h7-cardio").await.unwrap();
    assert_eq!(doctors[0].department_id.as_deref(), Some("h7-cardio"));
}

#[tokio::test]
async fn test_slots_encode_doctor_and_format_date() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let date = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
    let slots = client.slots(TOKEN, "doc 1", date).await.unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].start_time, "09:30");

    let other_day = NaiveDate::from_ymd_opt(2030, 1, 16).unwrap();
    assert!(client.slots(TOKEN, "doc 1", other_day).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_book_success_sends_idempotency_key() {
    let (url, recorded) = spawn_backend().await;
    let client = client_for(&url);
    let key = Uuid::new_v4();

    let response = client.book(TOKEN, &booking("09:30", "10:00"), key).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("ok"));

    let keys = recorded.idempotency_keys.lock().unwrap().clone();
    assert_eq!(keys, vec![key.to_string()]);
    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0]["appointment_date"], "2030-01-15");
    assert_eq!(bodies[0]["user_id"], "u1");
}

#[tokio::test]
async fn test_book_conflict_surfaces_detail() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let err = client.book(TOKEN, &booking("09:00", "09:30"), Uuid::new_v4()).await.unwrap_err();
    match err {
        HealthError::Api { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail.as_deref(), Some("Slot already booked"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_login_round_trip_and_rejection() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let ok = client
        .login(&LoginRequest { username: "ana".into(), password: "pw".into() })
        .await
        .unwrap();
    assert_eq!(ok.token, TOKEN);
    assert_eq!(ok.user.id, "u1");

    let err = client
        .login(&LoginRequest { username: "ana".into(), password: "nope".into() })
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message("Login failed", "Error logging in"),
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_emergency_lookup_passes_coordinates() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    let origin = Coordinates::new(10.1, 20.1).unwrap();
    let hospitals = client.nearby_hospitals(TOKEN, origin).await.unwrap();
    assert_eq!(hospitals.len(), 1);
    assert!(hospitals[0].doctor_availability);
}

#[tokio::test]
async fn test_chatbot_ask() {
    let (url, _) = spawn_backend().await;
    let client = client_for(&url);

    assert_eq!(client.ask("hello").await.unwrap(), "echo: hello");
}

#[tokio::test]
async fn test_medical_history_lists_own_records() {
    let url = spawn_records_backend().await;
    let client = client_for(&url);

    let records = client.medical_history(TOKEN).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].conditions.as_deref(), Some("Asthma"));
    assert_eq!(records[0].allergies, None);

    let err = client.medical_history("wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_patient_history_encodes_patient_id() {
    let url = spawn_records_backend().await;
    let client = client_for(&url);

    let records = client.patient_history(TOKEN, "u 1").await.unwrap();
    assert_eq!(records[0].user_id, "u 1");
    assert!(records[0].is_blank());

    let err = client.patient_history(TOKEN, "u2").await.unwrap_err();
    assert_eq!(err.user_message("Failed to fetch medical history", "Error"), "Patient not found");
}

#[tokio::test]
async fn test_doctor_appointments_by_window() {
    let url = spawn_records_backend().await;
    let client = client_for(&url);

    let today = client.doctor_appointments(TOKEN, AppointmentWindow::Today).await.unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].username, "ana");

    let week = client.doctor_appointments(TOKEN, AppointmentWindow::Week).await.unwrap();
    let dates: Vec<&str> = week.iter().map(|a| a.appointment_date.as_str()).collect();
    assert_eq!(dates, vec!["2030-01-15", "2030-01-17"]);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}", addr));
    let err = client.hospitals(TOKEN).await.unwrap_err();
    assert!(matches!(err, HealthError::Transport(_)), "unexpected error: {:?}", err);
}

#[test]
fn test_extract_detail() {
    assert_eq!(
        extract_detail(r#"{"detail":"Slot already booked"}"#).as_deref(),
        Some("Slot already booked")
    );
    assert_eq!(extract_detail(r#"{"detail":[{"msg":"field required"}]}"#), None);
    assert_eq!(extract_detail("<html>Bad Gateway</html>"), None);
}
