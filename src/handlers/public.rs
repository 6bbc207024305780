//! Anonymous end-user endpoints: activate, deactivate, status check.

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::db::queries::ActivationOutcome;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::LicenseStatusData;

use super::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct ValidateBody {
    pub license_key: String,
    pub product_code: String,
    pub instance_identifier: String,
}

fn require_field(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    Ok(())
}

/// POST /licenses/validate
/// Validate a license key and activate it for the given instance.
pub async fn validate(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<ValidateBody>,
) -> Result<axum::Json<ApiResponse<serde_json::Value>>> {
    require_field(&body.license_key, "license_key")?;
    require_field(&body.product_code, "product_code")?;
    require_field(&body.instance_identifier, "instance_identifier")?;

    let mut conn = state.db.get()?;
    let outcome = queries::activate_instance(
        &mut conn,
        body.license_key.trim(),
        body.product_code.trim(),
        body.instance_identifier.trim(),
    )?;

    let response = match outcome {
        ActivationOutcome::Existing(activation) => ApiResponse::ok(
            "License already activated on this instance",
            json!({ "status": "active", "activation_id": activation.id }),
        ),
        ActivationOutcome::Created(activation) => {
            tracing::info!(
                license_id = %activation.license_id,
                instance = %activation.instance_identifier,
                "license activated"
            );
            ApiResponse::ok(
                "License successfully activated",
                json!({ "status": "activated", "activation_id": activation.id }),
            )
        }
    };

    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct DeactivateBody {
    pub license_key: String,
    pub product_code: String,
    pub instance_identifier: String,
}

/// POST /licenses/deactivate
/// Idempotent: deactivating an instance that is not active succeeds as a
/// no-op.
pub async fn deactivate(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<DeactivateBody>,
) -> Result<axum::Json<ApiResponse<serde_json::Value>>> {
    require_field(&body.license_key, "license_key")?;
    require_field(&body.product_code, "product_code")?;
    require_field(&body.instance_identifier, "instance_identifier")?;

    let mut conn = state.db.get()?;
    let released = queries::deactivate_instance(
        &mut conn,
        body.license_key.trim(),
        body.product_code.trim(),
        body.instance_identifier.trim(),
    )?;

    let response = match released {
        Some(activation) => {
            tracing::info!(
                license_id = %activation.license_id,
                instance = %activation.instance_identifier,
                "license deactivated"
            );
            ApiResponse::ok(
                "License successfully deactivated",
                json!({ "deactivated": true }),
            )
        }
        None => ApiResponse::ok(
            "Instance is not active, nothing to deactivate",
            json!({ "deactivated": false }),
        ),
    };

    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub license_key: String,
}

/// POST /licenses/status
pub async fn status(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<StatusBody>,
) -> Result<axum::Json<ApiResponse<LicenseStatusData>>> {
    require_field(&body.license_key, "license_key")?;

    let conn = state.db.get()?;
    let data = queries::get_license_status(&conn, body.license_key.trim())?;

    Ok(ApiResponse::ok("License check success", data))
}
