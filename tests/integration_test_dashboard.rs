mod common;

use axum::{http::StatusCode, response::IntoResponse};
use chrono::{Duration, TimeZone, Utc};
use clinic_backend::domain::models::{
    patient::PatientStatus,
    session::{ClinicalSession, SessionStatus},
};
use common::{parse_body, TestApp};
use serde_json::{json, Value};

fn first_names(body: &Value) -> Vec<String> {
    body["data"]["patients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["firstName"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_dashboard_sorts_by_last_session() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let now = Utc::now();

    // B is newer, so the default created_at order would put it first.
    let a = app.create_patient("A", PatientStatus::Active, now - Duration::days(2)).await;
    app.create_patient("B", PatientStatus::Active, now - Duration::days(1)).await;
    let feb = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
    app.create_session(&a.id, feb, SessionStatus::Completed).await;

    let res = app.get("/api/dashboard/patients?limit=2&sortBy=last_session&order=desc", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(first_names(&body), vec!["A", "B"]);
    assert_eq!(body["data"]["patients"][0]["lastSession"]["status"], "completed");
    assert!(body["data"]["patients"][1]["lastSession"].is_null());

    let body = parse_body(app.get("/api/dashboard/patients?limit=2&sortBy=lastSession&order=asc", Some(&token)).await).await;
    assert_eq!(first_names(&body), vec!["B", "A"]);
}

#[tokio::test]
async fn test_dashboard_default_order_is_newest_first() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let now = Utc::now();

    app.create_patient("Old", PatientStatus::Active, now - Duration::days(3)).await;
    app.create_patient("New", PatientStatus::Active, now - Duration::hours(1)).await;

    let body = parse_body(app.get("/api/dashboard/patients", Some(&token)).await).await;
    assert_eq!(first_names(&body), vec!["New", "Old"]);
}

#[tokio::test]
async fn test_dashboard_only_lists_active_undeleted_patients() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let now = Utc::now();

    app.create_patient("Kept", PatientStatus::Active, now).await;
    app.create_patient("Paused", PatientStatus::Inactive, now).await;
    app.create_patient("Done", PatientStatus::Discharged, now).await;
    let removed = app.create_patient("Removed", PatientStatus::Active, now).await;

    let res = app.send_json("DELETE", &format!("/api/patients/{}", removed.id), Some(&token), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(app.get("/api/dashboard/patients", Some(&token)).await).await;
    assert_eq!(first_names(&body), vec!["Kept"]);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["returned"], 1);
}

#[tokio::test]
async fn test_dashboard_totals_ignore_limit() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let now = Utc::now();

    app.create_patient("Recent1", PatientStatus::Active, now - Duration::minutes(5)).await;
    app.create_patient("Recent2", PatientStatus::Active, now - Duration::minutes(4)).await;
    app.create_patient("Ancient", PatientStatus::Active, now - Duration::days(400)).await;

    let body = parse_body(app.get("/api/dashboard/patients?limit=1", Some(&token)).await).await;
    let data = &body["data"];
    assert_eq!(data["patients"].as_array().unwrap().len(), 1);
    assert_eq!(data["returned"], 1);
    assert_eq!(data["total"], 3);
    // Recent patients may straddle a month boundary only in the first minutes of a month.
    let new_this_month = data["newThisMonth"].as_i64().unwrap();
    assert!((0..=2).contains(&new_this_month));
    if now.signed_duration_since(clinic_backend::domain::services::dashboard_service::start_of_month(now)) > Duration::minutes(10) {
        assert_eq!(new_this_month, 2);
    }
}

#[tokio::test]
async fn test_dashboard_enriches_counts_and_refs() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let now = Utc::now();

    let company = app.create_company("Acme", true).await;
    let therapist = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;
    let patient = app
        .create_patient_with_refs("Lucia", PatientStatus::Active, now, Some(company.id.clone()), Some(therapist.id.clone()))
        .await;

    let jan = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let feb = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
    let mar = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
    app.create_session(&patient.id, jan, SessionStatus::Completed).await;
    app.create_session(&patient.id, feb, SessionStatus::NoShow).await;
    let latest = app.create_session(&patient.id, mar, SessionStatus::Completed).await;

    let res = app.send_json("DELETE", &format!("/api/sessions/{}", latest.id), Some(&token), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(app.get("/api/dashboard/patients", Some(&token)).await).await;
    let summary = &body["data"]["patients"][0];
    assert_eq!(summary["fullName"], "Lucia Doe");
    assert_eq!(summary["company"]["id"], company.id.as_str());
    assert_eq!(summary["company"]["name"], "Acme");
    assert_eq!(summary["primaryTherapist"]["id"], therapist.id.as_str());
    assert_eq!(summary["primaryTherapist"]["name"], "Ana Torres");
    assert_eq!(summary["totalSessions"], 2);
    assert_eq!(summary["completedSessions"], 1);
    assert_eq!(summary["lastSession"]["status"], "no_show");
}

#[tokio::test]
async fn test_dashboard_patient_without_refs() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    app.create_patient("Solo", PatientStatus::Active, Utc::now()).await;

    let body = parse_body(app.get("/api/dashboard/patients", Some(&token)).await).await;
    let summary = &body["data"]["patients"][0];
    assert!(summary["company"].is_null());
    assert!(summary["primaryTherapist"].is_null());
    assert!(summary["lastSession"].is_null());
    assert_eq!(summary["totalSessions"], 0);
    assert_eq!(summary["completedSessions"], 0);
}

#[tokio::test]
async fn test_dashboard_rejects_bad_query() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for uri in [
        "/api/dashboard/patients?sortBy=password_hash",
        "/api/dashboard/patients?order=sideways",
        "/api/dashboard/patients?limit=0",
        "/api/dashboard/patients?limit=501",
        "/api/dashboard/patients?limit=abc",
        "/api/dashboard/patients?limit=1&limit=2",
        "/api/dashboard/patients?sortBy=email&sort_by=status",
    ] {
        let res = app.get(uri, Some(&token)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = parse_body(res).await;
        assert_eq!(body["success"], false, "{}", uri);
        assert_eq!(body["error"], "ValidationError", "{}", uri);
    }

    let body = parse_body(app.get("/api/dashboard/patients?limit=1&limit=2", Some(&token)).await).await;
    assert!(body["details"]["reason"].is_string());

    let res = app.get("/api/dashboard/patients?limit=500", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let app = TestApp::new().await;
    let res = app.get("/api/dashboard/patients", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(res).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_patient_and_schedule_session() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let therapist = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;

    let res = app.send_json("POST", "/api/patients", Some(&token), json!({
        "firstName": "Mario",
        "lastName": "Rossi",
        "primaryTherapistId": therapist.id
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    let patient_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "active");

    let res = app.send_json("POST", &format!("/api/patients/{}/sessions", patient_id), Some(&token), json!({
        "date": "2024-05-01T15:00:00Z",
        "status": "completed"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["therapistId"], therapist.id.as_str());
    assert_eq!(body["data"]["status"], "completed");

    let body = parse_body(app.get("/api/dashboard/patients", Some(&token)).await).await;
    assert_eq!(body["data"]["patients"][0]["totalSessions"], 1);
    assert_eq!(body["data"]["patients"][0]["completedSessions"], 1);
}

#[tokio::test]
async fn test_create_patient_and_session_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let res = app.send_json("POST", "/api/patients", Some(&token), json!({"firstName": "Mario"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send_json("POST", "/api/patients", Some(&token), json!({
        "firstName": "Mario",
        "lastName": "Rossi",
        "status": "archived"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send_json("POST", "/api/patients/missing-id/sessions", Some(&token), json!({
        "date": "2024-05-01T15:00:00Z"
    })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let patient = app.create_patient("Mario", PatientStatus::Active, Utc::now()).await;
    let res = app.send_json("POST", &format!("/api/patients/{}/sessions", patient.id), Some(&token), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_references_are_bad_request() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for payload in [
        json!({"firstName": "Mario", "lastName": "Rossi", "companyId": "no-such-company"}),
        json!({"firstName": "Mario", "lastName": "Rossi", "primaryTherapistId": "no-such-user"}),
    ] {
        let res = app.send_json("POST", "/api/patients", Some(&token), payload.clone()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        let body = parse_body(res).await;
        assert_eq!(body["error"], "ValidationError");
    }

    // A soft-deleted company can no longer be referenced.
    let company = app.create_company("Acme", true).await;
    app.state.company_repo.soft_delete(&company.id, Utc::now()).await.unwrap();
    let res = app.send_json("POST", "/api/patients", Some(&token), json!({
        "firstName": "Mario",
        "lastName": "Rossi",
        "companyId": company.id
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let patient = app.create_patient("Mario", PatientStatus::Active, Utc::now()).await;
    let res = app.send_json("POST", &format!("/api/patients/{}/sessions", patient.id), Some(&token), json!({
        "date": "2024-05-01T15:00:00Z",
        "therapistId": "no-such-user"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["error"], "ValidationError");
}

#[tokio::test]
async fn test_foreign_key_violation_maps_to_bad_request() {
    let app = TestApp::new().await;

    let orphan = ClinicalSession::new("no-such-patient".to_string(), Utc::now(), SessionStatus::Scheduled);
    let err = app.state.session_repo.create(&orphan).await.unwrap_err();

    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_sort_by_email_puts_missing_values_last() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for (first_name, email) in [("NoMail", None), ("Anna", Some("anna@mail.test")), ("Zoe", Some("zoe@mail.test"))] {
        let res = app.send_json("POST", "/api/patients", Some(&token), json!({
            "firstName": first_name,
            "lastName": "Doe",
            "email": email
        })).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let body = parse_body(app.get("/api/dashboard/patients?sortBy=email&order=asc", Some(&token)).await).await;
    assert_eq!(first_names(&body), vec!["Anna", "Zoe", "NoMail"]);

    let body = parse_body(app.get("/api/dashboard/patients?sortBy=email&order=desc", Some(&token)).await).await;
    assert_eq!(first_names(&body), vec!["Zoe", "Anna", "NoMail"]);
}
