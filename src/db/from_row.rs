//! Row-to-struct mapping and the column lists shared by every query.
//!
//! Each `*_COLS` constant must stay in sync with the matching `FromRow`
//! impl: columns are read by position.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row};

use crate::error::Result;
use crate::models::*;

pub const BRAND_COLS: &str = "id, name, api_key_hash, created_at, updated_at";
pub const PRODUCT_COLS: &str = "id, brand_id, code, name, created_at, updated_at";
pub const CUSTOMER_COLS: &str = "id, email, created_at, updated_at";
pub const LICENSE_KEY_COLS: &str = "id, key, brand_id, customer_id, created_at, updated_at";
pub const LICENSE_COLS: &str = "id, license_key_id, product_id, status, seat_limit, expires_at, \
     suspension_reason, revocation_reason, created_at, updated_at";
pub const ACTIVATION_COLS: &str =
    "id, license_id, instance_identifier, active, created_at, deactivated_at";
pub const AUDIT_LOG_COLS: &str =
    "id, actor_type, actor_id, action, target_type, target_id, metadata, created_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Parse a TEXT column into a strum-backed enum.
fn parse_enum<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for Brand {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Brand {
            id: row.get(0)?,
            name: row.get(1)?,
            api_key_hash: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl FromRow for Product {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get(0)?,
            brand_id: row.get(1)?,
            code: row.get(2)?,
            name: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl FromRow for Customer {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Customer {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl FromRow for LicenseKey {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(LicenseKey {
            id: row.get(0)?,
            key: row.get(1)?,
            brand_id: row.get(2)?,
            customer_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl FromRow for License {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(License {
            id: row.get(0)?,
            license_key_id: row.get(1)?,
            product_id: row.get(2)?,
            status: parse_enum(3, row.get::<_, String>(3)?)?,
            seat_limit: row.get(4)?,
            expires_at: row.get(5)?,
            suspension_reason: row.get(6)?,
            revocation_reason: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl FromRow for Activation {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Activation {
            id: row.get(0)?,
            license_id: row.get(1)?,
            instance_identifier: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
            deactivated_at: row.get(5)?,
        })
    }
}

impl FromRow for AuditLog {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let metadata: Option<String> = row.get(6)?;
        Ok(AuditLog {
            id: row.get(0)?,
            actor_type: parse_enum(1, row.get::<_, String>(1)?)?,
            actor_id: row.get(2)?,
            action: parse_enum(3, row.get::<_, String>(3)?)?,
            target_type: row.get(4)?,
            target_id: row.get(5)?,
            metadata: metadata.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(7)?,
        })
    }
}

pub fn query_one<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, |row| T::from_row(row))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
