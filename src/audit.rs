//! Append-only audit trail.
//!
//! `record` must be called from within the transaction that performs the
//! state change it documents; the caller owns the transaction scope. If the
//! audit insert fails the whole operation rolls back with it.

use rusqlite::{Connection, params};
use serde_json::Value;

use crate::db::from_row::{AUDIT_LOG_COLS, query_all};
use crate::db::{gen_id, now};
use crate::error::Result;
use crate::models::{ActorType, AuditAction, AuditLog, AuditLogQuery};

pub const TARGET_BRAND: &str = "brand";
pub const TARGET_PRODUCT: &str = "product";
pub const TARGET_LICENSE: &str = "license";

/// Metadata keys whose values are masked before persisting.
const SENSITIVE_KEYS: &[&str] = &[
    "license_key",
    "api_key",
    "apikey",
    "token",
    "secret",
    "password",
    "authorization",
];

const REDACTED: &str = "[redacted]";

pub struct AuditEvent<'a> {
    pub actor_type: ActorType,
    pub actor_id: Option<&'a str>,
    pub action: AuditAction,
    pub target_type: &'a str,
    pub target_id: &'a str,
    pub metadata: Option<Value>,
}

/// Mask values of sensitive keys anywhere in the metadata tree.
fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    if SENSITIVE_KEYS.contains(&k.to_lowercase().as_str()) {
                        (k, Value::String(REDACTED.to_string()))
                    } else {
                        (k, redact(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

/// Append one audit row. Pure insert, no business validation.
pub fn record(conn: &Connection, event: AuditEvent<'_>) -> Result<AuditLog> {
    let id = gen_id();
    let created_at = now();
    let metadata = event.metadata.map(redact);
    let metadata_str = metadata.as_ref().map(Value::to_string);

    conn.execute(
        "INSERT INTO audit_logs (id, actor_type, actor_id, action, target_type, target_id, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &id,
            event.actor_type.as_ref(),
            event.actor_id,
            event.action.as_ref(),
            event.target_type,
            event.target_id,
            metadata_str,
            created_at
        ],
    )?;

    Ok(AuditLog {
        id,
        actor_type: event.actor_type,
        actor_id: event.actor_id.map(String::from),
        action: event.action,
        target_type: event.target_type.to_string(),
        target_id: event.target_id.to_string(),
        metadata,
        created_at,
    })
}

/// Audit rows visible to a brand: events it performed itself, plus events
/// on its own licenses (activations carry a user/system actor).
pub fn query_for_brand(
    conn: &Connection,
    brand_id: &str,
    query: &AuditLogQuery,
) -> Result<(Vec<AuditLog>, i64)> {
    let mut where_clause = String::from(
        "WHERE ((actor_type = 'brand' AND actor_id = ?)
            OR (target_type = 'license' AND target_id IN (
                SELECT l.id FROM licenses l
                JOIN products p ON p.id = l.product_id
                WHERE p.brand_id = ?)))",
    );
    let mut filters: Vec<Box<dyn rusqlite::ToSql>> =
        vec![Box::new(brand_id.to_string()), Box::new(brand_id.to_string())];

    if let Some(action) = query.action {
        where_clause.push_str(" AND action = ?");
        filters.push(Box::new(action.as_ref().to_string()));
    }
    if let Some(ref target_type) = query.target_type {
        where_clause.push_str(" AND target_type = ?");
        filters.push(Box::new(target_type.clone()));
    }
    if let Some(ref target_id) = query.target_id {
        where_clause.push_str(" AND target_id = ?");
        filters.push(Box::new(target_id.clone()));
    }
    if let Some(from_ts) = query.from_timestamp {
        where_clause.push_str(" AND created_at >= ?");
        filters.push(Box::new(from_ts));
    }
    if let Some(to_ts) = query.to_timestamp {
        where_clause.push_str(" AND created_at <= ?");
        filters.push(Box::new(to_ts));
    }

    let count_sql = format!("SELECT COUNT(*) FROM audit_logs {where_clause}");
    let filter_refs: Vec<&dyn rusqlite::ToSql> = filters.iter().map(|b| b.as_ref()).collect();
    let total: i64 = conn.query_row(&count_sql, filter_refs.as_slice(), |row| row.get(0))?;

    let select_sql = format!(
        "SELECT {AUDIT_LOG_COLS} FROM audit_logs {where_clause}
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    filters.push(Box::new(query.limit()));
    filters.push(Box::new(query.offset()));
    let select_refs: Vec<&dyn rusqlite::ToSql> = filters.iter().map(|b| b.as_ref()).collect();
    let logs = query_all(conn, &select_sql, select_refs.as_slice())?;

    Ok((logs, total))
}

/// Purge aged end-user rows (anonymous activate/deactivate traffic).
/// Brand and system rows are kept forever. Called on startup when
/// retention is configured.
pub fn purge_old_user_audit_logs(conn: &Connection, retention_days: i64) -> Result<usize> {
    let cutoff = now() - retention_days * 86400;
    let deleted = conn.execute(
        "DELETE FROM audit_logs WHERE created_at < ?1 AND actor_type = 'user'",
        params![cutoff],
    )?;
    Ok(deleted)
}
