use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::handlers::{audit_logs, brands, licenses, products, public};
use crate::middleware::brand_auth;

pub fn router(state: AppState) -> Router {
    let brand_routes = Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route("/licenses/provision", post(licenses::provision))
        .route("/licenses/{license_id}/suspend", post(licenses::suspend))
        .route("/licenses/{license_id}/revoke", post(licenses::revoke))
        .route("/licenses/{license_id}/reinstate", post(licenses::reinstate))
        .route("/licenses/by-email", post(licenses::list_by_email))
        .route("/audit-logs", get(audit_logs::list_audit_logs))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            brand_auth,
        ));

    let public_routes = Router::new()
        .route("/brands/signup", post(brands::signup))
        .route("/licenses/validate", post(public::validate))
        .route("/licenses/deactivate", post(public::deactivate))
        .route("/licenses/status", post(public::status))
        .route("/healthz", get(healthz));

    Router::new()
        .merge(brand_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
