use super::protocol::CacheStatsView;
use super::service::{Downstream, Gateway};
use crate::error::ShopResult;
use crate::protocol::ApiResponse;
use crate::replication::protocol::InvalidateRequest;

use axum::{
    Extension, Json, Router,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use std::sync::Arc;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/search/:topic", get(handle_search))
        .route("/info/:id", get(handle_info))
        .route("/buy/:id", post(handle_buy))
        .route("/update/:id/price", put(handle_update_price))
        .route("/update/:id/stock", put(handle_update_stock))
        .route("/orders/:id", get(handle_get_order))
        .route("/invalidate-cache", post(handle_invalidate))
        .route("/cache-stats", get(handle_cache_stats))
        .layer(Extension(gateway))
}

impl IntoResponse for Downstream {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn handle_search(
    Extension(gateway): Extension<Arc<Gateway>>,
    Path(topic): Path<String>,
) -> ShopResult<Downstream> {
    gateway.search(&topic).await
}

pub async fn handle_info(
    Extension(gateway): Extension<Arc<Gateway>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Downstream> {
    let Path(book_id) = path?;
    gateway.info(book_id).await
}

pub async fn handle_buy(
    Extension(gateway): Extension<Arc<Gateway>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Downstream> {
    let Path(book_id) = path?;
    gateway.buy(book_id).await
}

pub async fn handle_update_price(
    Extension(gateway): Extension<Arc<Gateway>>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ShopResult<Downstream> {
    let Path(book_id) = path?;
    let Json(body) = body?;
    gateway.update_price(book_id, body).await
}

pub async fn handle_update_stock(
    Extension(gateway): Extension<Arc<Gateway>>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ShopResult<Downstream> {
    let Path(book_id) = path?;
    let Json(body) = body?;
    gateway.update_stock(book_id, body).await
}

pub async fn handle_get_order(
    Extension(gateway): Extension<Arc<Gateway>>,
    path: Result<Path<u64>, PathRejection>,
) -> ShopResult<Downstream> {
    let Path(order_id) = path?;
    gateway.order(order_id).await
}

pub async fn handle_invalidate(
    Extension(gateway): Extension<Arc<Gateway>>,
    body: Result<Json<InvalidateRequest>, JsonRejection>,
) -> ShopResult<Json<ApiResponse>> {
    let Json(req) = body?;
    let removed = gateway.invalidate(req.book_id, &req.topics);

    let mut response =
        ApiResponse::ok().with_message(format!("Invalidated {} cache entries", removed.len()));
    response.invalidated_keys = Some(removed);
    Ok(Json(response))
}

pub async fn handle_cache_stats(Extension(gateway): Extension<Arc<Gateway>>) -> Json<ApiResponse> {
    let view = CacheStatsView::from(gateway.cache_stats());
    Json(ApiResponse::ok().with_data(&view))
}
