use axum::extract::{Extension, Query, State};

use crate::audit;
use crate::db::AppState;
use crate::error::Result;
use crate::middleware::AuthedBrand;
use crate::models::{AuditLog, AuditLogQuery};

use super::{ApiResponse, Page};

/// GET /audit-logs
/// Brand-scoped audit trail: events the brand performed plus events on its
/// own licenses.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Query(query): Query<AuditLogQuery>,
) -> Result<axum::Json<ApiResponse<Page<AuditLog>>>> {
    let conn = state.db.get()?;
    let (results, count) = audit::query_for_brand(&conn, &brand.id, &query)?;

    Ok(ApiResponse::ok(
        "Audit logs retrieved successfully",
        Page {
            count,
            limit: query.limit(),
            offset: query.offset(),
            results,
        },
    ))
}
