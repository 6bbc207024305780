use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn seat_limited_activation_flow() {
    let app = test_app();
    let (_, api_key) = signup_brand(&app, "Acme").await;
    let product_id = create_product(&app, &api_key, "X", "Product X").await;
    let (_, license_key) =
        provision_license(&app, &api_key, &product_id, "user@example.com", Some(1)).await;

    // host-A takes the only seat.
    let (status, body) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "X", "instance_identifier": "host-A" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "activated");

    // Re-activating host-A is an idempotent success.
    let (status, body) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "X", "instance_identifier": "host-A" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");

    // host-B is out of seats.
    let (status, body) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "X", "instance_identifier": "host-B" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    // Releasing host-A frees the seat for host-B.
    let (status, _) = post_json(
        &app,
        "/licenses/deactivate",
        None,
        json!({ "license_key": license_key, "product_code": "X", "instance_identifier": "host-A" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "X", "instance_identifier": "host-B" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "activated");
}

#[tokio::test]
async fn suspend_with_deactivation_then_reinstate() {
    let app = test_app();
    let (_, api_key) = signup_brand(&app, "Acme").await;
    let product_id = create_product(&app, &api_key, "PRO", "Pro Plan").await;
    let (license_id, license_key) =
        provision_license(&app, &api_key, &product_id, "user@example.com", Some(5)).await;

    for instance in ["host-a", "host-b"] {
        let (status, _) = post_json(
            &app,
            "/licenses/validate",
            None,
            json!({ "license_key": license_key, "product_code": "PRO", "instance_identifier": instance }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = post_json(
        &app,
        &format!("/licenses/{license_id}/suspend"),
        Some(&api_key),
        json!({ "reason": "payment overdue", "deactivate_existing": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // All prior activations were released.
    let (status, body) = post_json(
        &app,
        "/licenses/status",
        None,
        json!({ "license_key": license_key }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["entitlements"][0]["status"], "suspended");
    assert_eq!(body["data"]["entitlements"][0]["active_seats"], 0);

    // Activation is rejected while suspended.
    let (status, body) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "PRO", "instance_identifier": "host-c" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = post_json(
        &app,
        &format!("/licenses/{license_id}/reinstate"),
        Some(&api_key),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "PRO", "instance_identifier": "host-c" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn revoked_licenses_reject_every_operation() {
    let app = test_app();
    let (_, api_key) = signup_brand(&app, "Acme").await;
    let product_id = create_product(&app, &api_key, "PRO", "Pro Plan").await;
    let (license_id, license_key) =
        provision_license(&app, &api_key, &product_id, "user@example.com", None).await;

    let (status, _) = post_json(
        &app,
        &format!("/licenses/{license_id}/revoke"),
        Some(&api_key),
        json!({ "reason": "chargeback" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": license_key, "product_code": "PRO", "instance_identifier": "host-a" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for op in ["suspend", "reinstate", "revoke"] {
        let (status, body) = post_json(
            &app,
            &format!("/licenses/{license_id}/{op}"),
            Some(&api_key),
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT, "{op} should be rejected: {body}");
    }
}

#[tokio::test]
async fn lifecycle_is_invisible_across_brands() {
    let app = test_app();
    let (_, acme_key) = signup_brand(&app, "Acme").await;
    let (_, other_key) = signup_brand(&app, "Other").await;

    let product_id = create_product(&app, &acme_key, "PRO", "Pro Plan").await;
    let (license_id, _) =
        provision_license(&app, &acme_key, &product_id, "user@example.com", None).await;

    let (status, body) = post_json(
        &app,
        &format!("/licenses/{license_id}/revoke"),
        Some(&other_key),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_by_email_returns_only_own_brand_licenses() {
    let app = test_app();
    let (_, acme_key) = signup_brand(&app, "Acme").await;
    let (_, other_key) = signup_brand(&app, "Other").await;

    let acme_product = create_product(&app, &acme_key, "PRO", "Pro Plan").await;
    let other_product = create_product(&app, &other_key, "PRO", "Pro Plan").await;

    provision_license(&app, &acme_key, &acme_product, "customer@example.com", None).await;
    provision_license(&app, &other_key, &other_product, "customer@example.com", None).await;

    let (status, body) = post_json(
        &app,
        "/licenses/by-email?limit=10&offset=0",
        Some(&acme_key),
        json!({ "customer_email": "customer@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["results"][0]["product_code"], "PRO");
}

#[tokio::test]
async fn status_endpoint_rejects_unknown_keys() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/licenses/status",
        None,
        json!({ "license_key": "LIC-NOPE-NOPE-NOPE-NOPE" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn provision_validates_input_over_http() {
    let app = test_app();
    let (_, api_key) = signup_brand(&app, "Acme").await;
    let product_id = create_product(&app, &api_key, "PRO", "Pro Plan").await;

    let (status, _) = post_json(
        &app,
        "/licenses/provision",
        Some(&api_key),
        json!({ "product_id": product_id, "customer_email": "not-an-email" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/licenses/provision",
        Some(&api_key),
        json!({ "product_id": product_id, "customer_email": "user@example.com", "seat_limit": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Duplicate product under the same key.
    provision_license(&app, &api_key, &product_id, "user@example.com", None).await;
    let (status, _) = post_json(
        &app,
        "/licenses/provision",
        Some(&api_key),
        json!({ "product_id": product_id, "customer_email": "user@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
