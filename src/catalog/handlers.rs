use super::protocol::{PriceUpdateRequest, StockUpdateRequest};
use super::service::CatalogNode;
use crate::error::ShopResult;
use crate::protocol::ApiResponse;
use crate::replication::protocol::SyncRequest;
use crate::replication::types::{MutationDescriptor, NodeRole, SyncOutcome};

use axum::{
    Extension, Json, Router,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, post, put},
};
use std::sync::Arc;

/// Routes of a catalog node. Writes exist only on the primary, `/sync` only on
/// the secondary.
pub fn router(node: Arc<CatalogNode>) -> Router {
    let router = Router::new()
        .route("/search/:topic", get(handle_search))
        .route("/info/:id", get(handle_info));

    let router = match node.role() {
        NodeRole::Primary => router
            .route("/decrement/:id", post(handle_decrement))
            .route("/update/:id/price", put(handle_update_price))
            .route("/update/:id/stock", put(handle_update_stock)),
        NodeRole::Secondary => router.route("/sync", post(handle_sync)),
    };

    router.layer(Extension(node))
}

pub async fn handle_search(
    Extension(node): Extension<Arc<CatalogNode>>,
    Path(topic): Path<String>,
) -> ShopResult<Json<ApiResponse>> {
    let results = node.search(&topic)?;
    Ok(Json(ApiResponse::ok().with_data(&results)))
}

pub async fn handle_info(
    Extension(node): Extension<Arc<CatalogNode>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(book_id) = path?;
    let info = node.info(book_id)?;
    Ok(Json(ApiResponse::ok().with_data(&info)))
}

pub async fn handle_decrement(
    Extension(node): Extension<Arc<CatalogNode>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(book_id) = path?;
    let change = node.decrement(book_id)?;

    Ok(Json(
        ApiResponse::ok()
            .with_message("Quantity decremented successfully")
            .with_data(&change),
    ))
}

pub async fn handle_update_price(
    Extension(node): Extension<Arc<CatalogNode>>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<PriceUpdateRequest>, JsonRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(book_id) = path?;
    let Json(req) = body?;
    let change = node.set_price(book_id, req.price)?;

    Ok(Json(
        ApiResponse::ok()
            .with_message(format!("Price updated from ${} to ${}", change.old, change.new))
            .with_data(&change),
    ))
}

pub async fn handle_update_stock(
    Extension(node): Extension<Arc<CatalogNode>>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<StockUpdateRequest>, JsonRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(book_id) = path?;
    let Json(req) = body?;
    let change = node.adjust_stock(book_id, req.quantity_change)?;

    let action = if req.quantity_change >= 0 {
        "increased"
    } else {
        "decreased"
    };

    Ok(Json(
        ApiResponse::ok()
            .with_message(format!("Stock {} from {} to {}", action, change.old, change.new))
            .with_data(&change),
    ))
}

pub async fn handle_sync(
    Extension(node): Extension<Arc<CatalogNode>>,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Json(req) = body?;
    let descriptor = MutationDescriptor::try_from(req)?;

    let message = match node.apply_sync(&descriptor)? {
        SyncOutcome::Applied => "Sync successful",
        SyncOutcome::Duplicate => "Operation already synced",
    };

    Ok(Json(ApiResponse::ok().with_message(message)))
}
