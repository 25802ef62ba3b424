use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use healthsync_core::models::{
    appointment::{Appointment, AppointmentWindow, CreateAppointmentRequest},
    auth::{AuthResponse, Role, Session, User},
    directory::{Department, Doctor, Hospital, TimeSlot},
    emergency::{Coordinates, NearbyHospital, NearbyHospitalsResponse, nearest_first},
    history::MedicalRecord,
};

#[test]
fn test_hospital_deserialization() {
    let json = r#"{"id":"h1","name":"City Hospital","address":"1 Main St","lat":12.9,"lng":77.6}"#;
    let hospital: Hospital = from_str(json).expect("Failed to deserialize hospital");

    assert_eq!(hospital.id, "h1");
    assert_eq!(hospital.name, "City Hospital");
    assert_eq!(hospital.lat, 12.9);
}

#[test]
fn test_department_without_hospital_fields() {
    let department: Department =
        from_str(r#"{"id":"d1","name":"Cardiology"}"#).expect("Failed to deserialize department");

    assert_eq!(department.name, "Cardiology");
    assert_eq!(department.hospital_id, None);
}

#[test]
fn test_doctor_display_name() {
    let doctor: Doctor = from_str(r#"{"user_id":"u9","username":"drgrey","specialty":"Surgery"}"#)
        .expect("Failed to deserialize doctor");

    assert_eq!(doctor.display_name(), "drgrey (Surgery)");
    assert_eq!(doctor.department_id, None);
}

#[test]
fn test_time_slot_defaults() {
    let slot: TimeSlot = from_str(r#"{"start_time":"09:00","end_time":"09:30"}"#)
        .expect("Failed to deserialize slot");

    assert_eq!(slot, TimeSlot::new("09:00", "09:30"));
    assert!(!slot.is_booked);
    assert_eq!(slot.label(), "09:00 - 09:30");
}

#[rstest]
#[case("09:00", "09:30", true)]
#[case("09:00", "10:00", true)]
#[case("09:30", "10:00", false)]
fn test_time_slot_matches_by_start(#[case] start: &str, #[case] end: &str, #[case] expected: bool) {
    let chosen = TimeSlot::new("09:00", "09:30");
    assert_eq!(chosen.same_start(&TimeSlot::new(start, end)), expected);
}

#[test]
fn test_appointment_request_shape() {
    let request = CreateAppointmentRequest {
        user_id: "u1".to_string(),
        doctor_id: "doc1".to_string(),
        hospital_id: "h1".to_string(),
        department_id: "d1".to_string(),
        start_time: "09:00".to_string(),
        end_time: "09:30".to_string(),
        appointment_date: "2030-01-15".to_string(),
    };

    assert_eq!(
        to_value(&request).expect("Failed to serialize request"),
        json!({
            "user_id": "u1",
            "doctor_id": "doc1",
            "hospital_id": "h1",
            "department_id": "d1",
            "start_time": "09:00",
            "end_time": "09:30",
            "appointment_date": "2030-01-15",
        })
    );
}

#[rstest]
#[case(r#"{"token":"t","user":{"id":"u1","username":"ana","email":"a@x.io"}}"#)]
#[case(r#"{"token":"t","user":{"user_id":"u1","username":"ana"}}"#)]
fn test_auth_response_into_session(#[case] json: &str) {
    let response: AuthResponse = from_str(json).expect("Failed to deserialize auth response");
    let session = Session::from(response);

    assert_eq!(session.user.id, "u1");
    assert_eq!(session.token, "t");
}

#[test]
fn test_nearby_hospital_wire_name() {
    let response: NearbyHospitalsResponse = from_str(
        r#"{"hospitals":[
            {"name":"General","address":"Elm St","lat":1.0,"lng":2.0,"doctorAvailability":true}
        ]}"#,
    )
    .expect("Failed to deserialize nearby hospitals");

    assert_eq!(response.hospitals.len(), 1);
    assert!(response.hospitals[0].doctor_availability);
}

#[rstest]
#[case(91.0, 0.0)]
#[case(-90.5, 0.0)]
#[case(0.0, 180.1)]
#[case(f64::NAN, 0.0)]
fn test_coordinates_reject_out_of_range(#[case] lat: f64, #[case] lng: f64) {
    assert!(Coordinates::new(lat, lng).is_err());
}

#[test]
fn test_distance_between_known_points() {
    // London to Paris is roughly 344 km.
    let london = Coordinates::new(51.5074, -0.1278).unwrap();
    let paris = Coordinates::new(48.8566, 2.3522).unwrap();
    let distance = london.distance_km(&paris);

    assert!((distance - 344.0).abs() < 5.0, "unexpected distance {}", distance);
    assert_eq!(london.distance_km(&london), 0.0);
}

#[test]
fn test_nearest_first_orders_by_distance() {
    let origin = Coordinates::new(0.0, 0.0).unwrap();
    let hospital = |name: &str, lat: f64| NearbyHospital {
        name: name.to_string(),
        address: "n/a".to_string(),
        lat,
        lng: 0.0,
        doctor_availability: false,
    };

    let hospitals = vec![hospital("far", 2.0), hospital("near", 0.1), hospital("mid", 1.0)];
    let ranked = nearest_first(&origin, hospitals);
    let names: Vec<&str> = ranked.iter().map(|(h, _)| h.name.as_str()).collect();

    assert_eq!(names, vec!["near", "mid", "far"]);
}

#[rstest]
#[case(None, Some(Role::Patient))]
#[case(Some("user"), Some(Role::Patient))]
#[case(Some("Doctor"), Some(Role::Doctor))]
#[case(Some("admin"), Some(Role::Admin))]
#[case(Some("superadmin"), Some(Role::SuperAdmin))]
#[case(Some("janitor"), None)]
fn test_user_role(#[case] role: Option<&str>, #[case] expected: Option<Role>) {
    let user = User {
        id: "u1".to_string(),
        username: "ana".to_string(),
        email: None,
        role: role.map(str::to_string),
    };

    assert_eq!(user.role(), expected);
}

#[test]
fn test_appointment_deserialization() {
    let json = r#"{
        "id": "a1", "user_id": "u1", "username": "ana", "doctor_id": "doc1",
        "doctor_username": "house", "department_id": "d1", "department_name": "Cardiology",
        "appointment_date": "2030-01-15", "start_time": "09:00", "end_time": "09:30",
        "status": "scheduled", "created_at": "2030-01-01T10:00:00"
    }"#;
    let appointment: Appointment = from_str(json).expect("Failed to deserialize appointment");

    assert_eq!(appointment.username, "ana");
    assert_eq!(appointment.email, None);
    assert_eq!(appointment.department_name.as_deref(), Some("Cardiology"));
    assert_eq!(appointment.status, "scheduled");
    assert_eq!(AppointmentWindow::Week.path_segment(), "week");
}

#[test]
fn test_medical_record_with_missing_fields() {
    let record: MedicalRecord =
        from_str(r#"{"id":"m1","user_id":"u1","conditions":null,"notes":" "}"#)
            .expect("Failed to deserialize medical record");

    assert_eq!(record.allergies, None);
    assert!(record.is_blank());

    let record = MedicalRecord {
        allergies: Some("Penicillin".to_string()),
        ..record
    };
    assert!(!record.is_blank());
}
