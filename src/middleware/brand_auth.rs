use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::crypto::verify_secret;
use crate::db::{AppState, queries};
use crate::error::AppError;
use crate::models::Brand;
use crate::util::extract_api_key;

/// Brand resolved from the X-API-Key header; inserted as a request
/// extension for downstream handlers.
#[derive(Clone)]
pub struct AuthedBrand(pub Brand);

pub async fn brand_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing API key".into()))?;

    let conn = state.db.get()?;
    let brand = queries::get_brand_by_api_key(&conn, api_key)?
        .filter(|b| verify_secret(api_key, &b.api_key_hash))
        .ok_or_else(|| AppError::Unauthorized("Invalid API key".into()))?;

    request.extensions_mut().insert(AuthedBrand(brand));

    Ok(next.run(request).await)
}
