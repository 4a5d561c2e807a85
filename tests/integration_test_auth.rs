mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp, TEST_PASSWORD};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use clinic_backend::domain::models::auth::Claims;
use serde_json::json;
use tower::ServiceExt;

fn decode_claims(token: &str) -> Claims {
    let key = DecodingKey::from_ed_pem(include_str!("keys/test_public.pem").as_bytes()).unwrap();
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&["clinic-frontend"]);
    decode::<Claims>(token, &key, &validation).unwrap().claims
}

#[tokio::test]
async fn test_login_issues_24h_token_for_active_user() {
    let app = TestApp::new().await;
    let user = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;

    let res = app.send_json("POST", "/api/auth/login", None, json!({
        "email": "ana@clinic.test",
        "password": TEST_PASSWORD
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers().get(header::SET_COOKIE).expect("auth cookie set").to_str().unwrap().to_string();
    assert!(cookie.contains("auth_token="));
    assert!(cookie.contains("HttpOnly"));

    let body = parse_body(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["id"], user.id.as_str());
    assert_eq!(body["data"]["user"]["email"], "ana@clinic.test");
    assert_eq!(body["data"]["user"]["fullName"], "Ana Torres");
    assert_eq!(body["data"]["user"]["role"], "PSYCHOLOGIST");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let claims = decode_claims(token);
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "ana@clinic.test");
    assert_eq!(claims.role, "PSYCHOLOGIST");
    assert_eq!(claims.iss, "test-issuer");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() {
    let app = TestApp::new().await;

    for payload in [
        json!({}),
        json!({"email": "ana@clinic.test"}),
        json!({"password": "x"}),
        json!({"email": "", "password": "x"}),
        json!({"email": "ana@clinic.test", "password": ""}),
    ] {
        let res = app.send_json("POST", "/api/auth/login", None, payload.clone()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        let body = parse_body(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "ValidationError");
    }
}

#[tokio::test]
async fn test_login_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["success"], false);
    assert!(body["details"]["reason"].is_string());
}

#[tokio::test]
async fn test_unknown_or_inactive_user_rejected_regardless_of_password() {
    let app = TestApp::new().await;
    app.create_user("gone@clinic.test", "Former Staff", "RECEPTIONIST", false).await;

    for (email, password) in [
        ("nobody@clinic.test", TEST_PASSWORD),
        ("nobody@clinic.test", "anything"),
        ("gone@clinic.test", TEST_PASSWORD),
        ("gone@clinic.test", "anything"),
    ] {
        let res = app.send_json("POST", "/api/auth/login", None, json!({
            "email": email,
            "password": password
        })).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} / {}", email, password);
        let body = parse_body(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "AuthError");
    }
}

#[tokio::test]
async fn test_email_match_is_case_sensitive() {
    let app = TestApp::new().await;
    app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;

    let res = app.send_json("POST", "/api/auth/login", None, json!({
        "email": "ANA@clinic.test",
        "password": TEST_PASSWORD
    })).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_rejected_when_verification_enabled() {
    let app = TestApp::new().await;
    app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;

    let res = app.send_json("POST", "/api/auth/login", None, json!({
        "email": "ana@clinic.test",
        "password": "wrong-password"
    })).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_ignored_when_verification_disabled() {
    let app = TestApp::with_password_verification(false).await;
    let user = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;

    let token = app.login("ana@clinic.test", "not-the-password").await;
    assert_eq!(decode_claims(&token).sub, user.id);
}

#[tokio::test]
async fn test_me_accepts_bearer_and_cookie() {
    let app = TestApp::new().await;
    let user = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;
    let token = app.login("ana@clinic.test", TEST_PASSWORD).await;

    let res = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["sub"], user.id.as_str());
    assert_eq!(body["data"]["email"], "ana@clinic.test");

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/auth/me")
            .header(header::COOKIE, format!("auth_token={}", token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_tokens_are_unauthorized() {
    let app = TestApp::new().await;

    let res = app.get("/api/auth/me", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.get("/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = parse_body(res).await;
    assert_eq!(body["success"], false);

    let user = app.create_user("ana@clinic.test", "Ana Torres", "PSYCHOLOGIST", true).await;
    let expired = app.state.auth_service
        .issue_token(&user.id, &user.email, &user.role, chrono::Utc::now() - chrono::Duration::hours(25))
        .unwrap();
    assert!(app.state.auth_service.verify(&expired).is_none());
    let res = app.get("/api/auth/me", Some(&expired)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let fresh = app.state.auth_service
        .issue_token(&user.id, &user.email, &user.role, chrono::Utc::now())
        .unwrap();
    let other = app.state.auth_service
        .issue_token("someone-else", "x@clinic.test", "ADMIN", chrono::Utc::now())
        .unwrap();
    assert!(app.state.auth_service.verify(&fresh).is_some());

    // Other user's payload under this token's signature.
    let fresh_parts: Vec<&str> = fresh.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let forged = format!("{}.{}.{}", fresh_parts[0], other_parts[1], fresh_parts[2]);
    assert!(app.state.auth_service.verify(&forged).is_none());
    let res = app.get("/api/auth/me", Some(&forged)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, "auth_token=stale")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers().get(header::SET_COOKIE).expect("removal cookie").to_str().unwrap().to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("Max-Age=0"));
}
