use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::middleware::AuthedBrand;
use crate::models::{CreateProduct, Product};

use super::{ApiResponse, Page, Pagination};

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    axum::Json(body): axum::Json<CreateProduct>,
) -> Result<impl IntoResponse> {
    let code = body.code.trim();
    let name = body.name.trim();
    if code.is_empty() || code.len() > 100 || name.is_empty() || name.len() > 100 {
        return Err(AppError::Validation(
            "Product code and name must be between 1 and 100 characters".into(),
        ));
    }

    let mut conn = state.db.get()?;
    let product = queries::create_product(
        &mut conn,
        &brand.id,
        &CreateProduct {
            code: code.to_string(),
            name: name.to_string(),
        },
    )?;

    tracing::info!(product_id = %product.id, brand_id = %brand.id, "product created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Product created successfully", product),
    ))
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(AuthedBrand(brand)): Extension<AuthedBrand>,
    Query(page): Query<Pagination>,
) -> Result<axum::Json<ApiResponse<Page<Product>>>> {
    let conn = state.db.get()?;
    let (results, count) =
        queries::list_products_for_brand_paginated(&conn, &brand.id, page.limit(), page.offset())?;

    Ok(ApiResponse::ok(
        "Products retrieved successfully",
        Page {
            count,
            limit: page.limit(),
            offset: page.offset(),
            results,
        },
    ))
}
