mod common;

use axum::body::Body;
use axum::http::{Request, header};
use common::test_app;
use tower::ServiceExt;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/auth/session")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_configured_origin_is_allowed() {
    let app = test_app();

    // Configured as "http://localhost:3000/"; browsers send no trailing slash.
    let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_unlisted_origin_gets_no_cors_headers() {
    let app = test_app();

    for origin in ["http://localhost:5173", "http://localhost:3000.evil.test"] {
        let response = app.clone().oneshot(preflight(origin)).await.unwrap();
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none(),
            "{origin}"
        );
    }
}
