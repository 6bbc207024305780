use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::CreateBrand;

use super::ApiResponse;

/// POST /brands/signup
/// Public endpoint to create a brand and issue its API key. The raw key is
/// returned once and never recoverable afterwards.
pub async fn signup(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<CreateBrand>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim();
    if name.is_empty() || name.len() > 255 {
        return Err(AppError::Validation(
            "Brand name must be between 1 and 255 characters".into(),
        ));
    }

    let mut conn = state.db.get()?;
    let (brand, api_key) = queries::create_brand(&mut conn, name)?;

    tracing::info!(brand_id = %brand.id, "brand created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "Brand account created successfully",
            json!({
                "id": brand.id,
                "name": brand.name,
                "api_key": api_key,
                "created_at": brand.created_at,
            }),
        ),
    ))
}
