use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::service::CatalogService;
use super::CatalogKind;

pub fn catalog_router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/v1/catalogs/:kind", get(catalog_handler))
        .route(
            "/api/v1/catalogs/municipalities/:state_id",
            get(municipalities_handler),
        )
        .with_state(service)
}

pub(crate) async fn catalog_handler(
    State(service): State<Arc<CatalogService>>,
    Path(kind): Path<String>,
) -> Response {
    match CatalogKind::parse(&kind) {
        Some(kind) => {
            let listing = service.list(kind).await;
            (StatusCode::OK, axum::Json(listing)).into_response()
        }
        None => {
            let payload = json!({
                "error": format!("unknown catalog `{kind}`"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn municipalities_handler(
    State(service): State<Arc<CatalogService>>,
    Path(state_id): Path<u64>,
) -> Response {
    let listing = service.municipalities(state_id).await;
    (StatusCode::OK, axum::Json(listing)).into_response()
}
