//! Catalog Module Tests
//!
//! ## Test Scopes
//! - **Store**: Business rules at their boundaries (last unit, zero price, negative stock).
//! - **Node**: What a primary does after a commit, against scripted peer links
//!   (refusing, hanging), and the order in which peers see writes.
//! - **Router**: Status codes and envelopes of the HTTP surface, per role.

#[cfg(test)]
mod tests {
    use crate::catalog::handlers::router;
    use crate::catalog::service::{CatalogNode, PrimaryDuties};
    use crate::catalog::store::CatalogStore;
    use crate::catalog::types::CatalogItem;
    use crate::error::ShopError;
    use crate::protocol::{ApiResponse, Change};
    use crate::replication::invalidation::InvalidationBroadcaster;
    use crate::replication::link::{DeliveryError, PeerLink};
    use crate::replication::policy::RetryPolicy;
    use crate::replication::propagator::Propagator;
    use crate::replication::protocol::SyncRequest;
    use crate::replication::types::{Mutation, MutationDescriptor, SyncOutcome};

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Records every payload; either acknowledges all of them or refuses all of them.
    struct RecordingLink {
        healthy: bool,
        sent: Mutex<Vec<Value>>,
    }

    impl RecordingLink {
        fn healthy() -> Arc<Self> {
            Arc::new(Self {
                healthy: true,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                healthy: false,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<Value> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl PeerLink for RecordingLink {
        fn target(&self) -> String {
            "recording".to_string()
        }

        async fn deliver(&self, payload: &Value) -> Result<ApiResponse, DeliveryError> {
            self.sent.lock().push(payload.clone());
            if self.healthy {
                Ok(ApiResponse::ok())
            } else {
                Err(DeliveryError::Transport("connection refused".to_string()))
            }
        }
    }

    /// Peer that accepts the delivery and never answers.
    struct HangingLink;

    #[async_trait]
    impl PeerLink for HangingLink {
        fn target(&self) -> String {
            "hanging".to_string()
        }

        async fn deliver(&self, _payload: &Value) -> Result<ApiResponse, DeliveryError> {
            std::future::pending().await
        }
    }

    fn item(id: u64, topic: &str, price: f64, quantity: u32) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("Book {}", id),
            topic: topic.to_string(),
            price,
            quantity,
        }
    }

    fn primary_node(
        store: CatalogStore,
        secondary: Arc<dyn PeerLink>,
        gateway: Arc<dyn PeerLink>,
    ) -> CatalogNode {
        CatalogNode::primary(
            Arc::new(store),
            PrimaryDuties {
                propagator: Propagator::new(secondary, RetryPolicy::default()),
                invalidator: InvalidationBroadcaster::new(gateway),
            },
        )
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    // ============================================================
    // STORE
    // ============================================================

    #[test]
    fn test_default_catalog_contents() {
        let store = CatalogStore::with_default_books();

        assert_eq!(store.len(), 7);
        let info = store.get(5).unwrap();
        assert_eq!(info.title, "How to finish Project 3 on time");
        assert_eq!(info.quantity, 5);
    }

    #[test]
    fn test_search_ignores_case_and_orders_by_id() {
        let store = CatalogStore::with_default_books();

        let results = store.search("Distributed Systems").unwrap();

        let ids: Vec<u64> = results.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_search_without_match_is_not_found() {
        let store = CatalogStore::with_default_books();

        let err = store.search("astrology").unwrap_err();

        assert!(matches!(err, ShopError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_book_is_not_found() {
        let store = CatalogStore::with_default_books();

        assert_eq!(
            store.get(99).unwrap_err(),
            ShopError::NotFound("Book not found".to_string())
        );
        assert!(matches!(store.decrement(99), Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_last_unit_can_be_sold_once() {
        let store = CatalogStore::new(vec![item(1, "algorithms", 10.0, 1)]);

        let sold = store.decrement(1).unwrap();
        assert_eq!(sold.change, Change { old: 1, new: 0 });
        assert_eq!(sold.topic, "algorithms");

        let again = store.decrement(1);
        assert_eq!(
            again.unwrap_err(),
            ShopError::BusinessRule("Out of stock".to_string())
        );
        assert_eq!(store.item(1).unwrap().quantity, 0);
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        let store = CatalogStore::new(vec![item(1, "algorithms", 10.0, 1)]);

        assert!(matches!(store.set_price(1, 0.0), Err(ShopError::Validation(_))));
        assert!(matches!(store.set_price(1, -3.5), Err(ShopError::Validation(_))));
        assert!(matches!(store.set_price(1, f64::NAN), Err(ShopError::Validation(_))));
        assert_eq!(store.item(1).unwrap().price, 10.0);

        let accepted = store.set_price(1, 0.01).unwrap();
        assert_eq!(accepted.change, Change { old: 10.0, new: 0.01 });
    }

    #[test]
    fn test_stock_never_goes_negative() {
        let store = CatalogStore::new(vec![item(1, "algorithms", 10.0, 0)]);

        let err = store.adjust_stock(1, -1).unwrap_err();

        assert_eq!(
            err,
            ShopError::BusinessRule(
                "Cannot reduce stock below 0. Current: 0, Requested change: -1".to_string()
            )
        );
        assert_eq!(store.item(1).unwrap().quantity, 0);
    }

    #[test]
    fn test_stock_can_be_emptied_exactly() {
        let store = CatalogStore::new(vec![item(1, "algorithms", 10.0, 4)]);

        let emptied = store.adjust_stock(1, -4).unwrap();
        assert_eq!(emptied.change, Change { old: 4, new: 0 });

        let restocked = store.adjust_stock(1, 6).unwrap();
        assert_eq!(restocked.change, Change { old: 0, new: 6 });
    }

    #[test]
    fn test_replicated_stock_change_is_clamped() {
        let store = CatalogStore::new(vec![item(1, "algorithms", 10.0, 2)]);

        store
            .apply_replicated(1, &Mutation::AdjustStock { quantity_change: -5 })
            .unwrap();

        assert_eq!(store.item(1).unwrap().quantity, 0);
    }

    #[test]
    fn test_seed_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        let items = vec![item(10, "algorithms", 12.0, 3), item(11, "databases", 8.0, 1)];
        std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

        let store = CatalogStore::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        let store = store.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.item(11).unwrap(), items[1]);
    }

    #[test]
    fn test_missing_seed_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));

        let result = CatalogStore::from_json_file(&path);

        assert!(matches!(result, Err(ShopError::InvalidConfig(_))));
    }

    // ============================================================
    // NODE
    // ============================================================

    #[tokio::test]
    async fn test_primary_propagates_resulting_quantity_and_invalidates() {
        let secondary = RecordingLink::healthy();
        let gateway = RecordingLink::healthy();
        let node = primary_node(
            CatalogStore::new(vec![item(3, "algorithms", 10.0, 4)]),
            secondary.clone(),
            gateway.clone(),
        );

        let change = node.decrement(3).unwrap();

        assert_eq!(change, Change { old: 4, new: 3 });

        node.flush_replication().await;

        let synced = secondary.sent();
        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0]["operation"], "decrement");
        assert_eq!(synced[0]["book_id"], 3);
        assert_eq!(synced[0]["data"], json!({"quantity": 3}));
        assert!(synced[0]["op_id"].is_string());

        assert_eq!(
            gateway.sent(),
            vec![json!({"book_id": 3, "topics": ["algorithms"]})]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_succeeds_when_secondary_is_down() {
        let secondary = RecordingLink::broken();
        let gateway = RecordingLink::healthy();
        let node = primary_node(
            CatalogStore::new(vec![item(1, "algorithms", 10.0, 4)]),
            secondary.clone(),
            gateway.clone(),
        );

        let change = node.set_price(1, 12.5).unwrap();

        assert_eq!(change, Change { old: 10.0, new: 12.5 });
        assert_eq!(node.store().item(1).unwrap().price, 12.5);

        node.flush_replication().await;
        assert_eq!(secondary.sent().len(), 3, "Bounded retries, then give up");
        assert_eq!(gateway.sent().len(), 1, "Invalidation still goes out");
    }

    #[tokio::test]
    async fn test_write_succeeds_when_gateway_is_down() {
        let node = primary_node(
            CatalogStore::new(vec![item(1, "algorithms", 10.0, 4)]),
            RecordingLink::healthy(),
            RecordingLink::broken(),
        );

        let change = node.adjust_stock(1, 2).unwrap();
        node.flush_replication().await;

        assert_eq!(change, Change { old: 4, new: 6 });
        assert_eq!(node.store().item(1).unwrap().quantity, 6);
    }

    #[tokio::test]
    async fn test_write_is_acknowledged_while_peers_hang() {
        let node = Arc::new(primary_node(
            CatalogStore::new(vec![item(1, "algorithms", 10.0, 4)]),
            Arc::new(HangingLink),
            Arc::new(HangingLink),
        ));

        let (status, body) = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            send(
                router(node.clone()),
                Method::PUT,
                "/update/1/price",
                Some(json!({"price": 99.0})),
            ),
        )
        .await
        .expect("writer waited on its peers");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"old": 10.0, "new": 99.0}));

        let sold = tokio::time::timeout(std::time::Duration::from_secs(1), async {
            send(router(node.clone()), Method::POST, "/decrement/1", None).await
        })
        .await
        .expect("decrement waited on its peers");
        assert_eq!(sold.0, StatusCode::OK);
        assert_eq!(node.store().item(1).unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_rejected_write_is_not_propagated() {
        let secondary = RecordingLink::healthy();
        let gateway = RecordingLink::healthy();
        let node = primary_node(
            CatalogStore::new(vec![item(1, "algorithms", 10.0, 0)]),
            secondary.clone(),
            gateway.clone(),
        );

        assert!(node.decrement(1).is_err());
        assert!(node.adjust_stock(1, -1).is_err());
        assert!(node.set_price(1, 0.0).is_err());
        node.flush_replication().await;

        assert!(secondary.sent().is_empty());
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_secondary_stays_in_step_with_primary() {
        let secondary_node = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));
        let link = RecordingLink::healthy();
        let primary = primary_node(
            CatalogStore::with_default_books(),
            link.clone(),
            RecordingLink::healthy(),
        );

        primary.decrement(2).unwrap();
        primary.adjust_stock(2, -3).unwrap();
        primary.set_price(2, 31.0).unwrap();
        primary.flush_replication().await;

        let operations: Vec<Value> = link.sent().iter().map(|p| p["operation"].clone()).collect();
        assert_eq!(
            operations,
            vec![
                json!(Mutation::Decrement { quantity: 0 }.operation()),
                json!(Mutation::AdjustStock { quantity_change: 0 }.operation()),
                json!(Mutation::SetPrice { price: 0.0 }.operation()),
            ],
            "Delivered in commit order"
        );

        for payload in link.sent() {
            let req: SyncRequest = serde_json::from_value(payload).unwrap();
            let descriptor = MutationDescriptor::try_from(req).unwrap();
            assert_eq!(
                secondary_node.apply_sync(&descriptor).unwrap(),
                SyncOutcome::Applied
            );
        }

        assert_eq!(
            secondary_node.store().item(2),
            primary.store().item(2),
            "Both replicas hold the same book"
        );
    }

    // ============================================================
    // ROUTER
    // ============================================================

    #[tokio::test]
    async fn test_search_route_decodes_topic() {
        let node = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));

        let (status, body) = send(
            router(node),
            Method::GET,
            "/search/distributed%20systems",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1], json!({"id": 2, "title": "RPCs for Noobs"}));
    }

    #[tokio::test]
    async fn test_info_route_errors() {
        let node = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));

        let (status, body) = send(router(node.clone()), Method::GET, "/info/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "Book not found"}));

        let (status, body) = send(router(node), Method::GET, "/info/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_update_routes_validate_bodies() {
        let node = Arc::new(primary_node(
            CatalogStore::with_default_books(),
            RecordingLink::healthy(),
            RecordingLink::healthy(),
        ));

        let (status, _) = send(
            router(node.clone()),
            Method::PUT,
            "/update/1/price",
            Some(json!({"price": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            router(node.clone()),
            Method::PUT,
            "/update/1/stock",
            Some(json!({"quantity_change": 1.5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            router(node.clone()),
            Method::PUT,
            "/update/1/stock",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            router(node),
            Method::PUT,
            "/update/1/stock",
            Some(json!({"quantity_change": -2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Stock decreased from 10 to 8");
        assert_eq!(body["data"], json!({"old": 10, "new": 8}));
    }

    #[tokio::test]
    async fn test_decrement_route_reports_out_of_stock() {
        let node = Arc::new(primary_node(
            CatalogStore::new(vec![item(1, "algorithms", 10.0, 1)]),
            RecordingLink::healthy(),
            RecordingLink::healthy(),
        ));

        let (status, body) = send(router(node.clone()), Method::POST, "/decrement/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Quantity decremented successfully");

        let (status, body) = send(router(node), Method::POST, "/decrement/1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Out of stock");
    }

    #[tokio::test]
    async fn test_routes_depend_on_role() {
        let primary = Arc::new(primary_node(
            CatalogStore::with_default_books(),
            RecordingLink::healthy(),
            RecordingLink::healthy(),
        ));
        let secondary = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));

        let (status, _) = send(router(secondary), Method::POST, "/decrement/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router(primary), Method::POST, "/sync", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sync_route_is_idempotent() {
        let node = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));
        let payload = json!({
            "op_id": "3f1c2a9e-0000-4000-8000-000000000001",
            "operation": "update_stock",
            "book_id": 4,
            "data": {"quantity_change": 5}
        });

        let (status, body) = send(
            router(node.clone()),
            Method::POST,
            "/sync",
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Sync successful");

        let (status, body) = send(router(node.clone()), Method::POST, "/sync", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Operation already synced");

        assert_eq!(node.store().item(4).unwrap().quantity, 20);
    }

    #[tokio::test]
    async fn test_sync_route_rejects_unknown_operation() {
        let node = Arc::new(CatalogNode::secondary(Arc::new(
            CatalogStore::with_default_books(),
        )));

        let (status, body) = send(
            router(node),
            Method::POST,
            "/sync",
            Some(json!({"operation": "burn", "book_id": 1, "data": {}})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unknown operation: burn");
    }
}
