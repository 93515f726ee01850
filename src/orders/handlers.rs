use super::service::OrderNode;
use crate::error::{ShopError, ShopResult};
use crate::protocol::ApiResponse;
use crate::replication::protocol::OrderSyncRequest;
use crate::replication::types::{NodeRole, SyncOutcome};

use axum::{
    Extension, Json, Router,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, post},
};
use std::sync::Arc;

pub fn router(node: Arc<OrderNode>) -> Router {
    let router = Router::new().route("/orders/:id", get(handle_get_order));

    let router = match node.role() {
        NodeRole::Primary => router.route("/buy/:id", post(handle_buy)),
        NodeRole::Secondary => router.route("/sync", post(handle_sync)),
    };

    router.layer(Extension(node))
}

pub async fn handle_buy(
    Extension(node): Extension<Arc<OrderNode>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(book_id) = path?;
    let order = node.buy(book_id).await?;

    Ok(Json(
        ApiResponse::ok()
            .with_message(format!("bought book {}", order.book_title))
            .with_order(&order),
    ))
}

pub async fn handle_get_order(
    Extension(node): Extension<Arc<OrderNode>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Path(order_id) = path?;
    let order = node.order(order_id)?;
    Ok(Json(ApiResponse::ok().with_order(&order)))
}

pub async fn handle_sync(
    Extension(node): Extension<Arc<OrderNode>>,
    body: Result<Json<OrderSyncRequest>, JsonRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Json(req) = body?;
    let order = req
        .order
        .ok_or_else(|| ShopError::Validation("Missing order data".to_string()))?;

    let message = match node.apply_sync(order)? {
        SyncOutcome::Applied => "Sync successful",
        SyncOutcome::Duplicate => "Order already synced",
    };

    Ok(Json(ApiResponse::ok().with_message(message)))
}
