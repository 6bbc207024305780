use rusqlite::{Connection, Transaction, TransactionBehavior, params};
use serde_json::json;

use crate::audit::{self, AuditEvent};
use crate::crypto::{generate_api_key, generate_license_key, hash_secret};
use crate::error::{AppError, Result, is_unique_violation};
use crate::models::*;
use crate::util::normalize_email;

use super::from_row::{
    ACTIVATION_COLS, BRAND_COLS, CUSTOMER_COLS, LICENSE_COLS, LICENSE_KEY_COLS, PRODUCT_COLS,
    query_all, query_one,
};
use super::{gen_id, now};

/// Begin an IMMEDIATE transaction: the write lock is taken at BEGIN, so the
/// read-check-write sequences below are serialized against concurrent
/// writers. A writer that cannot get the lock within the busy timeout lost
/// the race and may retry.
fn begin_immediate(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::DatabaseBusy
                    || f.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                AppError::Conflict("Concurrent write in progress, please retry".into())
            }
            other => other.into(),
        })
}

// ============ Brands ============

/// Create a brand and issue its API key. The raw key is returned exactly
/// once; only the hash is stored.
pub fn create_brand(conn: &mut Connection, name: &str) -> Result<(Brand, String)> {
    let tx = begin_immediate(conn)?;

    let id = gen_id();
    let now = now();
    let api_key = generate_api_key();
    let api_key_hash = hash_secret(&api_key);

    tx.execute(
        "INSERT INTO brands (id, name, api_key_hash, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, name, &api_key_hash, now, now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Brand name '{name}' is already taken"))
        } else {
            e.into()
        }
    })?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(&id),
            action: AuditAction::BrandCreated,
            target_type: audit::TARGET_BRAND,
            target_id: &id,
            metadata: Some(json!({ "name": name })),
        },
    )?;

    tx.commit()?;

    Ok((
        Brand {
            id,
            name: name.to_string(),
            api_key_hash,
            created_at: now,
            updated_at: now,
        },
        api_key,
    ))
}

pub fn get_brand_by_id(conn: &Connection, id: &str) -> Result<Option<Brand>> {
    query_one(
        conn,
        &format!("SELECT {BRAND_COLS} FROM brands WHERE id = ?1"),
        params![id],
    )
}

pub fn get_brand_by_api_key(conn: &Connection, api_key: &str) -> Result<Option<Brand>> {
    let hash = hash_secret(api_key);
    query_one(
        conn,
        &format!("SELECT {BRAND_COLS} FROM brands WHERE api_key_hash = ?1"),
        params![hash],
    )
}

// ============ Products ============

pub fn create_product(conn: &mut Connection, brand_id: &str, input: &CreateProduct) -> Result<Product> {
    let tx = begin_immediate(conn)?;

    let id = gen_id();
    let now = now();

    tx.execute(
        "INSERT INTO products (id, brand_id, code, name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, brand_id, &input.code, &input.name, now, now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Product code '{}' already exists for this brand",
                input.code
            ))
        } else {
            e.into()
        }
    })?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(brand_id),
            action: AuditAction::ProductCreated,
            target_type: audit::TARGET_PRODUCT,
            target_id: &id,
            metadata: Some(json!({ "code": input.code, "name": input.name })),
        },
    )?;

    tx.commit()?;

    Ok(Product {
        id,
        brand_id: brand_id.to_string(),
        code: input.code.clone(),
        name: input.name.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_product_by_id(conn: &Connection, id: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"),
        params![id],
    )
}

pub fn list_products_for_brand_paginated(
    conn: &Connection,
    brand_id: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Product>, i64)> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM products WHERE brand_id = ?1",
        params![brand_id],
        |row| row.get(0),
    )?;

    let items = query_all(
        conn,
        &format!(
            "SELECT {PRODUCT_COLS} FROM products WHERE brand_id = ?1
             ORDER BY created_at, id LIMIT ?2 OFFSET ?3"
        ),
        params![brand_id, limit, offset],
    )?;

    Ok((items, total))
}

// ============ Customers ============

/// Customers are implicit: created on first reference during provisioning.
/// Must run inside the caller's transaction.
fn get_or_create_customer(tx: &Connection, email: &str) -> Result<Customer> {
    let existing: Option<Customer> = query_one(
        tx,
        &format!("SELECT {CUSTOMER_COLS} FROM customers WHERE email = ?1"),
        params![email],
    )?;
    if let Some(customer) = existing {
        return Ok(customer);
    }

    let id = gen_id();
    let now = now();
    tx.execute(
        "INSERT INTO customers (id, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, email, now, now],
    )?;

    Ok(Customer {
        id,
        email: email.to_string(),
        created_at: now,
        updated_at: now,
    })
}

// ============ License keys ============

/// One key per (brand, customer) pair, reused across provisioning calls;
/// the secret value is generated once and never regenerated.
fn get_or_create_license_key(tx: &Connection, brand_id: &str, customer_id: &str) -> Result<LicenseKey> {
    let existing: Option<LicenseKey> = query_one(
        tx,
        &format!(
            "SELECT {LICENSE_KEY_COLS} FROM license_keys WHERE brand_id = ?1 AND customer_id = ?2"
        ),
        params![brand_id, customer_id],
    )?;
    if let Some(key) = existing {
        return Ok(key);
    }

    let id = gen_id();
    let now = now();
    let key = generate_license_key();
    tx.execute(
        "INSERT INTO license_keys (id, key, brand_id, customer_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, &key, brand_id, customer_id, now, now],
    )?;

    Ok(LicenseKey {
        id,
        key,
        brand_id: brand_id.to_string(),
        customer_id: customer_id.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_license_key_by_key(conn: &Connection, key: &str) -> Result<Option<LicenseKey>> {
    query_one(
        conn,
        &format!("SELECT {LICENSE_KEY_COLS} FROM license_keys WHERE key = ?1"),
        params![key],
    )
}

// ============ Licenses ============

pub fn get_license_by_id(conn: &Connection, id: &str) -> Result<Option<License>> {
    query_one(
        conn,
        &format!("SELECT {LICENSE_COLS} FROM licenses WHERE id = ?1"),
        params![id],
    )
}

/// Fetch a license only if the caller's brand owns it via the
/// product -> brand chain. A mismatch looks identical to a missing row, so
/// existence never leaks across brands.
fn get_license_for_brand(tx: &Connection, license_id: &str, brand_id: &str) -> Result<Option<License>> {
    query_one(
        tx,
        &format!(
            "SELECT l.{} FROM licenses l
             JOIN products p ON p.id = l.product_id
             WHERE l.id = ?1 AND p.brand_id = ?2",
            LICENSE_COLS.replace(", ", ", l.")
        ),
        params![license_id, brand_id],
    )
}

fn get_license_by_key_and_code(
    tx: &Connection,
    license_key: &str,
    product_code: &str,
) -> Result<Option<License>> {
    query_one(
        tx,
        &format!(
            "SELECT l.{} FROM licenses l
             JOIN license_keys k ON k.id = l.license_key_id
             JOIN products p ON p.id = l.product_id
             WHERE k.key = ?1 AND p.code = ?2",
            LICENSE_COLS.replace(", ", ", l.")
        ),
        params![license_key, product_code],
    )
}

/// Provision a license: one atomic unit covering customer/key
/// get-or-create, license insert, and the audit row. Any failure rolls the
/// whole operation back, leaving no partial rows.
pub fn provision_license(
    conn: &mut Connection,
    brand: &Brand,
    input: &ProvisionLicense,
) -> Result<ProvisionedLicense> {
    let email = normalize_email(&input.customer_email)?;

    if let Some(limit) = input.seat_limit {
        if limit < 1 {
            return Err(AppError::Validation(
                "seat_limit must be a positive integer".into(),
            ));
        }
    }

    let tx = begin_immediate(conn)?;

    let product = get_product_by_id(&tx, &input.product_id)?
        .filter(|p| p.brand_id == brand.id)
        .ok_or_else(|| AppError::Validation("Product does not belong to brand".into()))?;

    let customer = get_or_create_customer(&tx, &email)?;
    let key = get_or_create_license_key(&tx, &brand.id, &customer.id)?;

    let id = gen_id();
    let now = now();

    tx.execute(
        "INSERT INTO licenses (id, license_key_id, product_id, status, seat_limit, expires_at,
                               suspension_reason, revocation_reason, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7, ?8)",
        params![
            &id,
            &key.id,
            &product.id,
            LicenseStatus::Active.as_ref(),
            input.seat_limit,
            input.expires_at,
            now,
            now
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "A license for product '{}' already exists under this key",
                product.code
            ))
        } else {
            e.into()
        }
    })?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(&brand.id),
            action: AuditAction::LicenseProvisioned,
            target_type: audit::TARGET_LICENSE,
            target_id: &id,
            metadata: Some(json!({
                "product_id": product.id,
                "customer_email": email,
            })),
        },
    )?;

    tx.commit()?;

    Ok(ProvisionedLicense {
        license: License {
            id,
            license_key_id: key.id,
            product_id: product.id,
            status: LicenseStatus::Active,
            seat_limit: input.seat_limit,
            expires_at: input.expires_at,
            suspension_reason: None,
            revocation_reason: None,
            created_at: now,
            updated_at: now,
        },
        license_key: key.key,
    })
}

/// Deactivate every active activation under a license. Must run inside the
/// caller's transaction.
fn deactivate_all_active(tx: &Connection, license_id: &str, at: i64) -> Result<usize> {
    let count = tx.execute(
        "UPDATE activations SET active = 0, deactivated_at = ?1
         WHERE license_id = ?2 AND active = 1",
        params![at, license_id],
    )?;
    Ok(count)
}

/// Temporarily suspend an active license. Suspending an already-suspended
/// license is a no-op; a revoked license rejects the transition outright.
pub fn suspend_license(
    conn: &mut Connection,
    brand_id: &str,
    license_id: &str,
    reason: Option<&str>,
    deactivate_existing: bool,
) -> Result<()> {
    let tx = begin_immediate(conn)?;

    let license = get_license_for_brand(&tx, license_id, brand_id)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    match license.status {
        LicenseStatus::Revoked => {
            return Err(AppError::InvalidTransition(
                "Revoked licenses cannot be suspended".into(),
            ));
        }
        LicenseStatus::Suspended => return Ok(()),
        LicenseStatus::Active => {}
    }

    let now = now();
    if license.is_expired(now) {
        return Err(AppError::InvalidState(
            "Expired licenses cannot be suspended".into(),
        ));
    }

    tx.execute(
        "UPDATE licenses SET status = ?1, suspension_reason = ?2, updated_at = ?3 WHERE id = ?4",
        params![LicenseStatus::Suspended.as_ref(), reason, now, license_id],
    )?;

    let mut deactivated = 0;
    if deactivate_existing {
        deactivated = deactivate_all_active(&tx, license_id, now)?;
    }

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(brand_id),
            action: AuditAction::LicenseSuspended,
            target_type: audit::TARGET_LICENSE,
            target_id: license_id,
            metadata: Some(json!({
                "reason": reason,
                "deactivate_existing": deactivate_existing,
                "deactivated_count": deactivated,
            })),
        },
    )?;

    tx.commit()?;
    Ok(())
}

/// Reinstate a suspended license.
pub fn reinstate_license(conn: &mut Connection, brand_id: &str, license_id: &str) -> Result<()> {
    let tx = begin_immediate(conn)?;

    let license = get_license_for_brand(&tx, license_id, brand_id)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    if license.status != LicenseStatus::Suspended {
        return Err(AppError::InvalidTransition(
            "Only suspended licenses can be reinstated".into(),
        ));
    }

    tx.execute(
        "UPDATE licenses SET status = ?1, suspension_reason = NULL, updated_at = ?2 WHERE id = ?3",
        params![LicenseStatus::Active.as_ref(), now(), license_id],
    )?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(brand_id),
            action: AuditAction::LicenseReinstated,
            target_type: audit::TARGET_LICENSE,
            target_id: license_id,
            metadata: None,
        },
    )?;

    tx.commit()?;
    Ok(())
}

/// Permanently revoke a license. Terminal: nothing transitions out of
/// revoked. All active activations are released unconditionally.
pub fn revoke_license(
    conn: &mut Connection,
    brand_id: &str,
    license_id: &str,
    reason: Option<&str>,
) -> Result<()> {
    let tx = begin_immediate(conn)?;

    let license = get_license_for_brand(&tx, license_id, brand_id)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    if license.status == LicenseStatus::Revoked {
        return Err(AppError::InvalidTransition(
            "License is already revoked".into(),
        ));
    }

    let now = now();
    tx.execute(
        "UPDATE licenses SET status = ?1, revocation_reason = ?2, updated_at = ?3 WHERE id = ?4",
        params![LicenseStatus::Revoked.as_ref(), reason, now, license_id],
    )?;

    let deactivated = deactivate_all_active(&tx, license_id, now)?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::Brand,
            actor_id: Some(brand_id),
            action: AuditAction::LicenseRevoked,
            target_type: audit::TARGET_LICENSE,
            target_id: license_id,
            metadata: Some(json!({
                "reason": reason,
                "deactivated_count": deactivated,
            })),
        },
    )?;

    tx.commit()?;
    Ok(())
}

// ============ Activations ============

/// Result of an activation attempt.
#[derive(Debug)]
pub enum ActivationOutcome {
    /// Already active on this instance; returned unchanged (idempotent).
    Existing(Activation),
    /// A seat was taken and a new activation created.
    Created(Activation),
}

fn get_active_activation(
    tx: &Connection,
    license_id: &str,
    instance_identifier: &str,
) -> Result<Option<Activation>> {
    query_one(
        tx,
        &format!(
            "SELECT {ACTIVATION_COLS} FROM activations
             WHERE license_id = ?1 AND instance_identifier = ?2 AND active = 1"
        ),
        params![license_id, instance_identifier],
    )
}

pub fn count_active_seats(conn: &Connection, license_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM activations WHERE license_id = ?1 AND active = 1",
        params![license_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Atomically activate a license on an instance, enforcing the seat limit.
///
/// The seat-count read and the insert run inside one IMMEDIATE transaction,
/// so two concurrent activations can never both take the last seat.
pub fn activate_instance(
    conn: &mut Connection,
    license_key: &str,
    product_code: &str,
    instance_identifier: &str,
) -> Result<ActivationOutcome> {
    let tx = begin_immediate(conn)?;

    let license = get_license_by_key_and_code(&tx, license_key, product_code)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    let now = now();
    match license.status {
        LicenseStatus::Revoked => {
            return Err(AppError::InvalidState("License has been revoked".into()));
        }
        LicenseStatus::Suspended => {
            return Err(AppError::InvalidState("License is suspended".into()));
        }
        LicenseStatus::Active if license.is_expired(now) => {
            return Err(AppError::InvalidState("License has expired".into()));
        }
        LicenseStatus::Active => {}
    }

    // Idempotency: re-activating an already-active instance returns the
    // existing row, with no new audit entry.
    if let Some(existing) = get_active_activation(&tx, &license.id, instance_identifier)? {
        return Ok(ActivationOutcome::Existing(existing));
    }

    if let Some(limit) = license.seat_limit {
        let active = count_active_seats(&tx, &license.id)?;
        if active >= limit {
            return Err(AppError::SeatLimitExceeded(format!(
                "Seat limit reached ({active}/{limit})"
            )));
        }
    }

    let id = gen_id();
    tx.execute(
        "INSERT INTO activations (id, license_id, instance_identifier, active, created_at, deactivated_at)
         VALUES (?1, ?2, ?3, 1, ?4, NULL)",
        params![&id, &license.id, instance_identifier, now],
    )?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::User,
            actor_id: None,
            action: AuditAction::LicenseActivated,
            target_type: audit::TARGET_LICENSE,
            target_id: &license.id,
            metadata: Some(json!({ "instance_identifier": instance_identifier })),
        },
    )?;

    tx.commit()?;

    Ok(ActivationOutcome::Created(Activation {
        id,
        license_id: license.id,
        instance_identifier: instance_identifier.to_string(),
        active: true,
        created_at: now,
        deactivated_at: None,
    }))
}

/// Release an instance's seat. Idempotent: a missing or already-inactive
/// activation is a no-op success (returns None). Fails only when the
/// key/product pair doesn't resolve to a license.
pub fn deactivate_instance(
    conn: &mut Connection,
    license_key: &str,
    product_code: &str,
    instance_identifier: &str,
) -> Result<Option<Activation>> {
    let tx = begin_immediate(conn)?;

    let license = get_license_by_key_and_code(&tx, license_key, product_code)?
        .ok_or_else(|| AppError::NotFound("License not found".into()))?;

    let Some(activation) = get_active_activation(&tx, &license.id, instance_identifier)? else {
        return Ok(None);
    };

    let now = now();
    tx.execute(
        "UPDATE activations SET active = 0, deactivated_at = ?1 WHERE id = ?2",
        params![now, activation.id],
    )?;

    audit::record(
        &tx,
        AuditEvent {
            actor_type: ActorType::User,
            actor_id: None,
            action: AuditAction::LicenseDeactivated,
            target_type: audit::TARGET_LICENSE,
            target_id: &license.id,
            metadata: Some(json!({ "instance_identifier": instance_identifier })),
        },
    )?;

    tx.commit()?;

    Ok(Some(Activation {
        active: false,
        deactivated_at: Some(now),
        ..activation
    }))
}

pub fn list_activations_for_license(conn: &Connection, license_id: &str) -> Result<Vec<Activation>> {
    query_all(
        conn,
        &format!(
            "SELECT {ACTIVATION_COLS} FROM activations WHERE license_id = ?1
             ORDER BY created_at, id"
        ),
        params![license_id],
    )
}

// ============ Status / listings (read-only projections) ============

/// Resolve a key to its per-product entitlements and seat usage. No caller
/// restriction: end users query their own key.
pub fn get_license_status(conn: &Connection, license_key: &str) -> Result<LicenseStatusData> {
    let (key, customer_email): (LicenseKey, String) = {
        let mut stmt = conn.prepare(&format!(
            "SELECT k.{}, c.email FROM license_keys k
             JOIN customers c ON c.id = k.customer_id
             WHERE k.key = ?1",
            LICENSE_KEY_COLS.replace(", ", ", k.")
        ))?;
        let mut rows = stmt.query_map(params![license_key], |row| {
            Ok((
                LicenseKey {
                    id: row.get(0)?,
                    key: row.get(1)?,
                    brand_id: row.get(2)?,
                    customer_id: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                },
                row.get::<_, String>(6)?,
            ))
        })?;
        match rows.next() {
            Some(row) => row?,
            None => return Err(AppError::NotFound("License key not found".into())),
        }
    };

    let licenses: Vec<(License, String)> = {
        let mut stmt = conn.prepare(&format!(
            "SELECT l.{}, p.code FROM licenses l
             JOIN products p ON p.id = l.product_id
             WHERE l.license_key_id = ?1
             ORDER BY l.created_at, l.id",
            LICENSE_COLS.replace(", ", ", l.")
        ))?;
        let rows = stmt
            .query_map(params![key.id], |row| {
                Ok((
                    License {
                        id: row.get(0)?,
                        license_key_id: row.get(1)?,
                        product_id: row.get(2)?,
                        status: row.get::<_, String>(3)?.parse().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?,
                        seat_limit: row.get(4)?,
                        expires_at: row.get(5)?,
                        suspension_reason: row.get(6)?,
                        revocation_reason: row.get(7)?,
                        created_at: row.get(8)?,
                        updated_at: row.get(9)?,
                    },
                    row.get::<_, String>(10)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let now = now();
    let mut entitlements = Vec::with_capacity(licenses.len());
    let mut valid_any = false;

    for (license, product_code) in licenses {
        let active_seats = count_active_seats(conn, &license.id)?;
        let valid = license.is_valid(now);
        valid_any |= valid;

        entitlements.push(Entitlement {
            product_code,
            status: license.status,
            expires_at: license.expires_at,
            valid,
            seat_limit: license.seat_limit,
            active_seats,
            remaining_seats: license.seat_limit.map(|limit| (limit - active_seats).max(0)),
        });
    }

    Ok(LicenseStatusData {
        license_key: key.key,
        customer_email,
        entitlements,
        valid: valid_any,
    })
}

/// Brand-restricted listing of a customer's licenses, ordered by
/// (created_at, id) so pagination stays deterministic under concurrent
/// inserts.
pub fn list_licenses_by_email(
    conn: &Connection,
    brand_id: &str,
    customer_email: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<ListedLicense>, i64)> {
    let email = normalize_email(customer_email)?;

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM licenses l
         JOIN license_keys k ON k.id = l.license_key_id
         JOIN customers c ON c.id = k.customer_id
         WHERE k.brand_id = ?1 AND c.email = ?2",
        params![brand_id, &email],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(&format!(
        "SELECT l.{}, k.key, p.code, p.name FROM licenses l
         JOIN license_keys k ON k.id = l.license_key_id
         JOIN customers c ON c.id = k.customer_id
         JOIN products p ON p.id = l.product_id
         WHERE k.brand_id = ?1 AND c.email = ?2
         ORDER BY l.created_at, l.id
         LIMIT ?3 OFFSET ?4",
        LICENSE_COLS.replace(", ", ", l.")
    ))?;

    let rows = stmt
        .query_map(params![brand_id, &email, limit, offset], |row| {
            Ok(ListedLicense {
                license: License {
                    id: row.get(0)?,
                    license_key_id: row.get(1)?,
                    product_id: row.get(2)?,
                    status: row.get::<_, String>(3)?.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    seat_limit: row.get(4)?,
                    expires_at: row.get(5)?,
                    suspension_reason: row.get(6)?,
                    revocation_reason: row.get(7)?,
                    created_at: row.get(8)?,
                    updated_at: row.get(9)?,
                },
                license_key: row.get(10)?,
                product_code: row.get(11)?,
                product_name: row.get(12)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((rows, total))
}
