// ABOUTME: HTTP integration tests for the health check route
// ABOUTME: Checks the liveness payload and that no authentication is needed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use cooks_corner::routes::HealthRoutes;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

use common::{create_test_resources, test_router};

#[tokio::test]
async fn test_health_endpoint_success() {
    let response = AxumTestRequest::get("/health")
        .send(HealthRoutes::routes())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "cooks-corner-server");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_through_full_router_ignores_bad_token() {
    let resources = create_test_resources().await.unwrap();

    let response = AxumTestRequest::get("/health")
        .bearer("not-a-token")
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);

    let unknown = AxumTestRequest::get("/api/nothing-here")
        .send(test_router(&resources))
        .await;
    assert_eq!(unknown.status(), 404);
}
