use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::middleware::AuthedBrand;
use crate::models::{ListedLicense, ProvisionLicense};

use super::{ApiResponse, Page, Pagination};

/// POST /licenses/provision
pub async fn provision(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    axum::Json(body): axum::Json<ProvisionLicense>,
) -> Result<impl IntoResponse> {
    let mut conn = state.db.get()?;
    let provisioned = queries::provision_license(&mut conn, &brand, &body)?;

    tracing::info!(
        license_id = %provisioned.license.id,
        brand_id = %brand.id,
        product_id = %provisioned.license.product_id,
        "license provisioned"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("License provisioned successfully", provisioned),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SuspendLicenseBody {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub deactivate_existing: bool,
}

/// POST /licenses/{license_id}/suspend
pub async fn suspend(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Path(license_id): Path<String>,
    axum::Json(body): axum::Json<SuspendLicenseBody>,
) -> Result<axum::Json<ApiResponse<()>>> {
    let mut conn = state.db.get()?;
    queries::suspend_license(
        &mut conn,
        &brand.id,
        &license_id,
        body.reason.as_deref(),
        body.deactivate_existing,
    )?;

    tracing::info!(license_id = %license_id, brand_id = %brand.id, "license suspended");

    Ok(ApiResponse::message("License successfully suspended"))
}

#[derive(Debug, Deserialize)]
pub struct RevokeLicenseBody {
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /licenses/{license_id}/revoke
pub async fn revoke(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Path(license_id): Path<String>,
    axum::Json(body): axum::Json<RevokeLicenseBody>,
) -> Result<axum::Json<ApiResponse<()>>> {
    let mut conn = state.db.get()?;
    queries::revoke_license(&mut conn, &brand.id, &license_id, body.reason.as_deref())?;

    tracing::info!(license_id = %license_id, brand_id = %brand.id, "license revoked");

    Ok(ApiResponse::message("License successfully revoked"))
}

/// POST /licenses/{license_id}/reinstate
pub async fn reinstate(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Path(license_id): Path<String>,
) -> Result<axum::Json<ApiResponse<()>>> {
    let mut conn = state.db.get()?;
    queries::reinstate_license(&mut conn, &brand.id, &license_id)?;

    tracing::info!(license_id = %license_id, brand_id = %brand.id, "license reinstated");

    Ok(ApiResponse::message("License successfully reinstated"))
}

#[derive(Debug, Deserialize)]
pub struct ListByEmailBody {
    pub customer_email: String,
}

/// POST /licenses/by-email?limit=&offset=
/// Returns only licenses whose product belongs to the requesting brand,
/// even when the same email holds licenses under other brands.
pub async fn list_by_email(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Query(page): Query<Pagination>,
    axum::Json(body): axum::Json<ListByEmailBody>,
) -> Result<axum::Json<ApiResponse<Page<ListedLicense>>>> {
    let conn = state.db.get()?;
    let (results, count) = queries::list_licenses_by_email(
        &conn,
        &brand.id,
        &body.customer_email,
        page.limit(),
        page.offset(),
    )?;

    Ok(ApiResponse::ok(
        "Licenses retrieved successfully",
        Page {
            count,
            limit: page.limit(),
            offset: page.offset(),
            results,
        },
    ))
}
