// ABOUTME: Integration tests for registration, login, token refresh, logout, and profiles
// ABOUTME: Drives the full router in-process against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::Router;
use chrono::{Duration, Utc};
use cooks_corner::auth::{AuthManager, TokenType};
use cooks_corner::config::environment::AuthConfig;
use cooks_corner::constants::messages;
use cooks_corner::database::Database;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

use common::{
    create_authenticated_user, create_test_resources, create_test_resources_with,
    create_test_user, test_config_with, test_router, TEST_PASSWORD,
};

async fn login(app: Router, email: &str, password: &str) -> (u16, Value) {
    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .send(app)
        .await;
    let status = response.status();
    (status, response.json())
}

#[tokio::test]
async fn test_register_returns_created_user_without_password() {
    let resources = create_test_resources().await.unwrap();

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "s3cure-password",
            "user_bio": "Soup enthusiast"
        }))
        .send(test_router(&resources))
        .await;

    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["username"], "ann");
    assert_eq!(body["bio"], "Soup enthusiast");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_and_username() {
    let resources = create_test_resources().await.unwrap();
    create_authenticated_user(&resources, "ann").await.unwrap();

    let duplicate_email = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "ann@example.com",
            "username": "someone-else",
            "password": "s3cure-password"
        }))
        .send(test_router(&resources))
        .await;
    assert_eq!(duplicate_email.status(), 400);
    let body: Value = duplicate_email.json();
    assert_eq!(body["error"]["message"], messages::EMAIL_TAKEN);

    let duplicate_username = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "other@example.com",
            "username": "ann",
            "password": "s3cure-password"
        }))
        .send(test_router(&resources))
        .await;
    assert_eq!(duplicate_username.status(), 400);
    let body: Value = duplicate_username.json();
    assert_eq!(body["error"]["message"], messages::USERNAME_TAKEN);
}

#[tokio::test]
async fn test_register_rejects_invalid_payloads() {
    let resources = create_test_resources().await.unwrap();

    let bad_email = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "username": "ann",
            "password": "s3cure-password"
        }))
        .send(test_router(&resources))
        .await;
    assert_eq!(bad_email.status(), 400);

    let missing_password = AxumTestRequest::post("/api/auth/register")
        .json(&json!({ "email": "ann@example.com", "username": "ann" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(missing_password.status(), 400);
}

#[tokio::test]
async fn test_login_outcomes() {
    let resources = create_test_resources().await.unwrap();
    let (user, _) = create_authenticated_user(&resources, "ann").await.unwrap();

    let (status, body) = login(test_router(&resources), "ann@example.com", TEST_PASSWORD).await;
    assert_eq!(status, 200);
    assert_eq!(body["user"], user.id);
    assert_eq!(body["username"], "ann");
    assert!(body["access"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, _) = login(test_router(&resources), "ann@example.com", "wrong-password").await;
    assert_eq!(status, 401);

    let (status, _) = login(test_router(&resources), "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let resources = create_test_resources().await.unwrap();

    let register = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "Bob@Example.com",
            "username": "bob",
            "password": "another-password"
        }))
        .send(test_router(&resources))
        .await;
    assert_eq!(register.status(), 201);

    let (status, body) = login(test_router(&resources), "bob@example.com", "another-password").await;
    assert_eq!(status, 200);
    assert_eq!(body["username"], "bob");
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let resources = create_test_resources().await.unwrap();
    create_authenticated_user(&resources, "ann").await.unwrap();
    let (_, session) = login(test_router(&resources), "ann@example.com", TEST_PASSWORD).await;

    let response = AxumTestRequest::post("/api/auth/token/refresh")
        .json(&json!({ "refresh": session["refresh"] }))
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    let access = body["access"].as_str().unwrap();

    let claims = resources
        .auth_manager
        .validate_token(access, TokenType::Access)
        .unwrap();
    assert_eq!(claims.token_type, TokenType::Access);
}

#[tokio::test]
async fn test_refresh_rejects_wrong_type_and_garbage() {
    let resources = create_test_resources().await.unwrap();
    let (_, access) = create_authenticated_user(&resources, "ann").await.unwrap();

    let with_access = AxumTestRequest::post("/api/auth/token/refresh")
        .json(&json!({ "refresh": access }))
        .send(test_router(&resources))
        .await;
    assert_eq!(with_access.status(), 401);

    let garbage = AxumTestRequest::post("/api/auth/token/refresh")
        .json(&json!({ "refresh": "not.a.token" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(garbage.status(), 401);

    let missing = AxumTestRequest::post("/api/auth/token/refresh")
        .json(&json!({}))
        .send(test_router(&resources))
        .await;
    assert_eq!(missing.status(), 401);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token_idempotently() {
    let resources = create_test_resources().await.unwrap();
    create_authenticated_user(&resources, "ann").await.unwrap();
    let (_, session) = login(test_router(&resources), "ann@example.com", TEST_PASSWORD).await;
    let access = session["access"].as_str().unwrap();
    let refresh = session["refresh"].as_str().unwrap();

    for _ in 0..2 {
        let response = AxumTestRequest::post("/api/auth/logout")
            .bearer(access)
            .json(&json!({ "refresh_token": refresh }))
            .send(test_router(&resources))
            .await;
        assert_eq!(response.status(), 200);
    }

    let refresh_after_logout = AxumTestRequest::post("/api/auth/token/refresh")
        .json(&json!({ "refresh": refresh }))
        .send(test_router(&resources))
        .await;
    assert_eq!(refresh_after_logout.status(), 401);
}

#[tokio::test]
async fn test_logout_error_cases() {
    let resources = create_test_resources().await.unwrap();
    let (_, ann_access) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, _) = create_authenticated_user(&resources, "bob").await.unwrap();

    let unauthenticated = AxumTestRequest::post("/api/auth/logout")
        .json(&json!({ "refresh_token": "whatever" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(unauthenticated.status(), 401);

    let malformed = AxumTestRequest::post("/api/auth/logout")
        .bearer(&ann_access)
        .json(&json!({ "refresh_token": "garbage" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(malformed.status(), 400);

    let bobs_refresh = resources
        .auth_manager
        .generate_token(bob.id, TokenType::Refresh)
        .unwrap();
    let foreign = AxumTestRequest::post("/api/auth/logout")
        .bearer(&ann_access)
        .json(&json!({ "refresh_token": bobs_refresh }))
        .send(test_router(&resources))
        .await;
    assert_eq!(foreign.status(), 403);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let resources = create_test_resources().await.unwrap();
    let (user, _) = create_authenticated_user(&resources, "ann").await.unwrap();

    let other = AuthManager::new(&AuthConfig {
        jwt_secret: resources.config.auth.jwt_secret.clone(),
        access_token_expiry_minutes: -5,
        refresh_token_expiry_hours: 1,
    });
    let expired = other.generate_token(user.id, TokenType::Access).unwrap();

    let response = AxumTestRequest::get(&format!("/api/users/{}", user.id))
        .bearer(&expired)
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_profile_read_and_owner_only_update() {
    let resources = create_test_resources().await.unwrap();
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, _) = create_authenticated_user(&resources, "bob").await.unwrap();

    let read = AxumTestRequest::get(&format!("/api/users/{}", bob.id))
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(read.status(), 200);
    let body: Value = read.json();
    assert_eq!(body["username"], "bob");
    assert_eq!(body["followers_count"], 0);
    assert_eq!(body["recipes_count"], 0);

    let foreign_update = AxumTestRequest::put(&format!("/api/users/{}", bob.id))
        .bearer(&ann_token)
        .json(&json!({ "bio": "hijacked" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(foreign_update.status(), 403);

    let own_update = AxumTestRequest::put(&format!("/api/users/{}", ann.id))
        .bearer(&ann_token)
        .json(&json!({ "bio": "Bakes bread" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(own_update.status(), 200);
    let body: Value = own_update.json();
    assert_eq!(body["bio"], "Bakes bread");
    assert_eq!(body["username"], "ann");

    let taken_username = AxumTestRequest::put(&format!("/api/users/{}", ann.id))
        .bearer(&ann_token)
        .json(&json!({ "username": "bob" }))
        .send(test_router(&resources))
        .await;
    assert_eq!(taken_username.status(), 400);

    let missing = AxumTestRequest::get("/api/users/9999")
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_profile_endpoints_require_authentication() {
    let resources = create_test_resources().await.unwrap();
    let (ann, _) = create_authenticated_user(&resources, "ann").await.unwrap();

    let response = AxumTestRequest::get(&format!("/api/users/{}", ann.id))
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 401);

    let response = AxumTestRequest::get("/api/users")
        .header("authorization", "Basic YW5uOnB3")
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_expired_revocations_are_purged() {
    let resources = create_test_resources().await.unwrap();
    let (ann, _) = create_authenticated_user(&resources, "ann").await.unwrap();
    let database = &resources.database;

    database
        .revoke_token("old-jti", ann.id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    database
        .revoke_token("live-jti", ann.id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let purged = database.purge_expired_revocations(Utc::now()).await.unwrap();
    assert_eq!(purged, 1);
    assert!(!database.is_token_revoked("old-jti").await.unwrap());
    assert!(database.is_token_revoked("live-jti").await.unwrap());
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cooks.db");
    let url = format!("sqlite:{}", path.display());
    let config = test_config_with(&[("DATABASE_URL", url.as_str())]);

    let resources = create_test_resources_with(config.clone()).await.unwrap();
    let ann = create_test_user(&resources.database, "ann").await.unwrap();
    drop(resources);

    let reopened = Database::new(&config.database_url).await.unwrap();
    let stored = reopened.get_user_by_email("ann@example.com").await.unwrap().unwrap();
    assert_eq!(stored.id, ann.id);
    assert!(path.exists());
}
