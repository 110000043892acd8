mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{FailingDirectory, body_json, directory, subjects, test_app, test_app_with, token_for};
use serde_json::{Value, json};
use tower::ServiceExt;

fn authorize_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/authorize")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_customer_lacks_read() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::CUSTOMER),
            "permissions": ["read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], false);
    assert_eq!(body["permissions"], json!(["customer"]));
}

#[tokio::test]
async fn test_developer_gets_full_permission_set() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::DEVELOPER),
            "permissions": ["create", "read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], true);
    assert_eq!(
        body["permissions"],
        json!(["companies", "create", "customer", "delete", "read", "ska", "update"])
    );
}

#[tokio::test]
async fn test_any_one_required_action_is_enough() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::SKATER),
            "permissions": ["delete", "ska"]
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["authorized"], true);
    assert_eq!(body["permissions"], json!(["ska"]));
}

#[tokio::test]
async fn test_empty_required_list_is_not_authorized() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::GENERAL_MANAGER),
            "permissions": []
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], false);
    assert_eq!(
        body["permissions"],
        json!(["create", "delete", "read", "update"])
    );
}

#[tokio::test]
async fn test_unknown_stored_role_fails_closed() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::LEGACY),
            "permissions": ["read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authorized"], false);
    assert_eq!(body["permissions"], json!([]));
}

#[tokio::test]
async fn test_invalid_token_is_rejected_without_lookup() {
    let directory = Arc::new(directory());
    let app = test_app_with(directory.clone());

    let response = app
        .oneshot(authorize_request(json!({
            "token": "not-a-jwt",
            "permissions": ["read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid or expired token");
    assert_eq!(directory.lookups(), 0);
}

#[tokio::test]
async fn test_unknown_subject_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::UNKNOWN),
            "permissions": ["read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unknown user");
}

#[tokio::test]
async fn test_empty_token_is_bad_request() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(authorize_request(json!({
            "token": "",
            "permissions": ["read"]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(authorize_request(json!({
            "token": "   ",
            "permissions": ["read"]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(authorize_request(json!({ "token": "abc" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(authorize_request(json!({
            "token": "abc",
            "permissions": "read"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_directory_failure_is_server_error() {
    let app = test_app_with(Arc::new(FailingDirectory));

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::DEVELOPER),
            "permissions": ["read"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Authorization service unavailable");
}

#[tokio::test]
async fn test_platform_record_wins_over_tenant_record() {
    let directory = Arc::new(
        directory().with_tenant_user(subjects::DEVELOPER, "customer", common::COMPANY_A),
    );
    let app = test_app_with(directory);

    let response = app
        .oneshot(authorize_request(json!({
            "token": token_for(subjects::DEVELOPER),
            "permissions": ["companies"]
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["authorized"], true);
}
