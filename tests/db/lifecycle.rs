use latchkey::db::queries;
use latchkey::error::AppError;
use latchkey::models::{LicenseStatus, ProvisionLicense};

use crate::common::*;

#[test]
fn provision_creates_license_key_and_audit_row() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");

    let provisioned = provision(
        &mut conn,
        &brand,
        &product.id,
        "user@example.com",
        Some(days_from_now(30)),
        Some(3),
    );

    assert_eq!(provisioned.license.status, LicenseStatus::Active);
    assert_eq!(provisioned.license.seat_limit, Some(3));
    assert!(provisioned.license_key.starts_with("LIC-"));

    assert_eq!(count_rows(&conn, "licenses"), 1);
    assert_eq!(count_rows(&conn, "license_keys"), 1);
    assert_eq!(count_rows(&conn, "customers"), 1);
    assert_eq!(audit_count(&conn, "license_provisioned"), 1);
}

#[test]
fn provision_reuses_key_per_brand_and_customer() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let pro = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let team = seed_product(&mut conn, &brand.id, "TEAM", "Team Plan");

    let first = provision(&mut conn, &brand, &pro.id, "user@example.com", None, None);
    let second = provision(&mut conn, &brand, &team.id, "User@Example.com", None, None);

    // Same normalized customer, same brand: one key gating both licenses.
    assert_eq!(first.license_key, second.license_key);
    assert_eq!(count_rows(&conn, "license_keys"), 1);
    assert_eq!(count_rows(&conn, "licenses"), 2);
}

#[test]
fn provision_rejects_duplicate_product_under_same_key() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");

    provision(&mut conn, &brand, &product.id, "user@example.com", None, None);

    let err = queries::provision_license(
        &mut conn,
        &brand,
        &ProvisionLicense {
            product_id: product.id.clone(),
            customer_email: "user@example.com".into(),
            expires_at: None,
            seat_limit: None,
        },
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(count_rows(&conn, "licenses"), 1);
}

#[test]
fn provision_rejects_foreign_or_unknown_product() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (acme, _) = seed_brand(&mut conn, "Acme");
    let (other, _) = seed_brand(&mut conn, "Other");
    let foreign = seed_product(&mut conn, &other.id, "PRO", "Pro Plan");

    for product_id in [foreign.id.as_str(), "11111111-1111-1111-1111-111111111111"] {
        let err = queries::provision_license(
            &mut conn,
            &acme,
            &ProvisionLicense {
                product_id: product_id.to_string(),
                customer_email: "user@example.com".into(),
                expires_at: None,
                seat_limit: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    assert_eq!(count_rows(&conn, "licenses"), 0);
}

#[test]
fn provision_rejects_invalid_email_and_seat_limit() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");

    let bad_email = queries::provision_license(
        &mut conn,
        &brand,
        &ProvisionLicense {
            product_id: product.id.clone(),
            customer_email: "not-an-email".into(),
            expires_at: None,
            seat_limit: None,
        },
    )
    .unwrap_err();
    assert!(matches!(bad_email, AppError::Validation(_)));

    let bad_limit = queries::provision_license(
        &mut conn,
        &brand,
        &ProvisionLicense {
            product_id: product.id.clone(),
            customer_email: "user@example.com".into(),
            expires_at: None,
            seat_limit: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(bad_limit, AppError::Validation(_)));

    assert_eq!(count_rows(&conn, "licenses"), 0);
}

#[test]
fn suspend_and_reinstate_round_trip() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let lic = provision(&mut conn, &brand, &product.id, "user@example.com", None, None);

    queries::suspend_license(&mut conn, &brand.id, &lic.license.id, Some("payment overdue"), false)
        .unwrap();

    let suspended = queries::get_license_by_id(&conn, &lic.license.id)
        .unwrap()
        .unwrap();
    assert_eq!(suspended.status, LicenseStatus::Suspended);
    assert_eq!(suspended.suspension_reason.as_deref(), Some("payment overdue"));
    assert_eq!(audit_count(&conn, "license_suspended"), 1);

    // Suspending again is a no-op: no status change, no duplicate audit.
    queries::suspend_license(&mut conn, &brand.id, &lic.license.id, Some("again"), false).unwrap();
    assert_eq!(audit_count(&conn, "license_suspended"), 1);

    queries::reinstate_license(&mut conn, &brand.id, &lic.license.id).unwrap();
    let reinstated = queries::get_license_by_id(&conn, &lic.license.id)
        .unwrap()
        .unwrap();
    assert_eq!(reinstated.status, LicenseStatus::Active);
    assert_eq!(reinstated.suspension_reason, None);
    assert_eq!(audit_count(&conn, "license_reinstated"), 1);
}

#[test]
fn reinstate_requires_suspended_status() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let lic = provision(&mut conn, &brand, &product.id, "user@example.com", None, None);

    let err = queries::reinstate_license(&mut conn, &brand.id, &lic.license.id).unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[test]
fn suspend_rejects_expired_license() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let lic = provision(
        &mut conn,
        &brand,
        &product.id,
        "user@example.com",
        Some(days_from_now(-1)),
        None,
    );

    let err =
        queries::suspend_license(&mut conn, &brand.id, &lic.license.id, None, false).unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[test]
fn revoke_is_terminal() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let lic = provision(&mut conn, &brand, &product.id, "user@example.com", None, None);

    queries::revoke_license(&mut conn, &brand.id, &lic.license.id, Some("abuse")).unwrap();

    let revoked = queries::get_license_by_id(&conn, &lic.license.id)
        .unwrap()
        .unwrap();
    assert_eq!(revoked.status, LicenseStatus::Revoked);
    assert_eq!(revoked.revocation_reason.as_deref(), Some("abuse"));
    assert_eq!(audit_count(&conn, "license_revoked"), 1);

    // No transition leaves revoked.
    let suspend =
        queries::suspend_license(&mut conn, &brand.id, &lic.license.id, None, false).unwrap_err();
    assert!(matches!(suspend, AppError::InvalidTransition(_)));

    let reinstate = queries::reinstate_license(&mut conn, &brand.id, &lic.license.id).unwrap_err();
    assert!(matches!(reinstate, AppError::InvalidTransition(_)));

    let revoke_again =
        queries::revoke_license(&mut conn, &brand.id, &lic.license.id, None).unwrap_err();
    assert!(matches!(revoke_again, AppError::InvalidTransition(_)));

    // Still exactly one audit row per performed transition.
    assert_eq!(audit_count(&conn, "license_revoked"), 1);
}

#[test]
fn revoke_releases_active_seats() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (brand, _) = seed_brand(&mut conn, "Acme");
    let product = seed_product(&mut conn, &brand.id, "PRO", "Pro Plan");
    let lic = provision(&mut conn, &brand, &product.id, "user@example.com", None, Some(5));

    for instance in ["host-a", "host-b", "host-c"] {
        queries::activate_instance(&mut conn, &lic.license_key, "PRO", instance).unwrap();
    }
    assert_eq!(queries::count_active_seats(&conn, &lic.license.id).unwrap(), 3);

    queries::revoke_license(&mut conn, &brand.id, &lic.license.id, None).unwrap();
    assert_eq!(queries::count_active_seats(&conn, &lic.license.id).unwrap(), 0);

    let activations = queries::list_activations_for_license(&conn, &lic.license.id).unwrap();
    assert_eq!(activations.len(), 3);
    assert!(activations.iter().all(|a| !a.active && a.deactivated_at.is_some()));
}

#[test]
fn lifecycle_operations_do_not_leak_across_brands() {
    let db = test_db();
    let mut conn = db.pool.get().unwrap();

    let (acme, _) = seed_brand(&mut conn, "Acme");
    let (other, _) = seed_brand(&mut conn, "Other");
    let product = seed_product(&mut conn, &acme.id, "PRO", "Pro Plan");
    let lic = provision(&mut conn, &acme, &product.id, "user@example.com", None, None);

    // The other brand sees not-found, never forbidden.
    let suspend =
        queries::suspend_license(&mut conn, &other.id, &lic.license.id, None, false).unwrap_err();
    assert!(matches!(suspend, AppError::NotFound(_)));

    let revoke = queries::revoke_license(&mut conn, &other.id, &lic.license.id, None).unwrap_err();
    assert!(matches!(revoke, AppError::NotFound(_)));

    let reinstate = queries::reinstate_license(&mut conn, &other.id, &lic.license.id).unwrap_err();
    assert!(matches!(reinstate, AppError::NotFound(_)));

    let unchanged = queries::get_license_by_id(&conn, &lic.license.id)
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, LicenseStatus::Active);
}
