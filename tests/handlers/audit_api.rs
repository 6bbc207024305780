use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn audit_trail_is_brand_scoped_and_filterable() {
    let app = test_app();
    let (_, acme_key) = signup_brand(&app, "Acme").await;
    let (_, other_key) = signup_brand(&app, "Other").await;

    let acme_product = create_product(&app, &acme_key, "PRO", "Pro Plan").await;
    let other_product = create_product(&app, &other_key, "PRO", "Pro Plan").await;

    let (acme_license_id, acme_license_key) =
        provision_license(&app, &acme_key, &acme_product, "user@example.com", None).await;
    provision_license(&app, &other_key, &other_product, "user@example.com", None).await;

    let (status, _) = post_json(
        &app,
        "/licenses/validate",
        None,
        json!({ "license_key": acme_license_key, "product_code": "PRO", "instance_identifier": "host-a" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/audit-logs", Some(&acme_key)).await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"]["results"].as_array().unwrap();
    let actions: Vec<&str> = results
        .iter()
        .map(|r| r["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"license_provisioned"));
    assert!(actions.contains(&"license_activated"));

    // Only Acme's licenses appear as targets.
    for row in results {
        if row["target_type"] == "license" {
            assert_eq!(row["target_id"].as_str(), Some(acme_license_id.as_str()));
        }
    }

    // Filtered down to the anonymous activation.
    let (status, body) = get(
        &app,
        "/audit-logs?action=license_activated",
        Some(&acme_key),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["results"][0]["actor_type"], "user");

    // No key, no trail.
    let (status, _) = get(&app, "/audit-logs", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provisioning_metadata_never_contains_raw_keys() {
    let app = test_app();
    let (_, api_key) = signup_brand(&app, "Acme").await;
    let product_id = create_product(&app, &api_key, "PRO", "Pro Plan").await;
    let (_, license_key) =
        provision_license(&app, &api_key, &product_id, "user@example.com", None).await;

    let conn = app.db.pool.get().unwrap();
    let mut stmt = conn
        .prepare("SELECT COALESCE(metadata, '') FROM audit_logs")
        .unwrap();
    let rows: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    for metadata in rows {
        assert!(
            !metadata.contains(&license_key),
            "raw license key leaked into audit metadata"
        );
        assert!(
            !metadata.contains(&api_key),
            "raw API key leaked into audit metadata"
        );
    }
}
