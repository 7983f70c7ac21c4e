//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Order intake form
//! POST /submit        - Store an order, 303 to /map (other methods: 405)
//! GET  /map           - All orders with map markers
//! GET  /api/orders    - All orders with coordinates as JSON
//! GET  /static/*      - Static assets
//! GET  /health        - Liveness check
//! GET  /health/ready  - Readiness check (order store reachable)
//! ```

pub mod health;
pub mod intake;
pub mod map;

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(intake::form_page))
        .route("/submit", post(intake::submit))
        .route("/map", get(map::map_page))
        .route("/api/orders", get(map::api_orders))
}

/// Build the full application router: order routes, health checks, and
/// static assets served from `static_dir`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use order_locator_core::{Location, Order};

    use super::*;
    use crate::db::{MemoryOrderStore, OrderStore, StorageError};
    use crate::geocoding::{GeocodeError, Geocoder};

    /// Resolves a fixed set of addresses; everything else is `ZERO_RESULTS`.
    struct StubGeocoder {
        known: HashMap<String, Location>,
    }

    impl StubGeocoder {
        fn new(known: &[(&str, Location)]) -> Self {
            Self {
                known: known
                    .iter()
                    .map(|(address, location)| ((*address).to_string(), *location))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
            self.known
                .get(address)
                .copied()
                .ok_or_else(|| GeocodeError::Status("ZERO_RESULTS".to_string()))
        }
    }

    /// Store whose database is always down.
    struct UnreachableStore;

    #[async_trait]
    impl OrderStore for UnreachableStore {
        async fn create(&self, _order: &Order) -> Result<(), StorageError> {
            Err(StorageError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn list_all(&self) -> Result<Vec<Order>, StorageError> {
            Err(StorageError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn ping(&self) -> Result<(), StorageError> {
            Err(StorageError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    const HQ: &str = "1600 Amphitheatre Parkway";
    const HQ_LOCATION: Location = Location::new(37.422_408_2, -122.084_249_9);

    fn static_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
    }

    fn test_app(store: Arc<dyn OrderStore>) -> Router {
        let geocoder = Arc::new(StubGeocoder::new(&[
            (HQ, HQ_LOCATION),
            ("221B Baker Street", Location::new(51.523_767, -0.158_555_7)),
        ]));
        let state = AppState::new(store, geocoder, NonZeroUsize::new(4).unwrap());
        app(state, &static_dir())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(app: Router, body: &str) -> Response {
        app.oneshot(
            Request::post("/submit")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_form_page_renders() {
        let response = get(test_app(Arc::new(MemoryOrderStore::new())), "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"action="/submit""#));
        for field in ["name", "phone", "address", "preferable_delivery_time"] {
            assert!(body.contains(&format!(r#"name="{field}""#)), "missing {field}");
        }
    }

    #[tokio::test]
    async fn test_submit_stores_exact_fields_and_redirects() {
        let store = Arc::new(MemoryOrderStore::new());
        let app = test_app(store.clone());

        let response = post_form(
            app,
            "name=Alice&phone=555-1234&address=1600+Amphitheatre+Parkway&preferable_delivery_time=morning",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/map");
        assert_eq!(
            store.list_all().await.unwrap(),
            vec![Order::new("Alice", "555-1234", HQ, "morning")]
        );
    }

    #[tokio::test]
    async fn test_submit_missing_fields_become_empty() {
        let store = Arc::new(MemoryOrderStore::new());

        let response = post_form(test_app(store.clone()), "name=Bob").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            store.list_all().await.unwrap(),
            vec![Order::new("Bob", "", "", "")]
        );
    }

    #[tokio::test]
    async fn test_submit_without_content_type_stores_empty_order() {
        let store = Arc::new(MemoryOrderStore::new());

        let response = test_app(store.clone())
            .oneshot(
                Request::post("/submit")
                    .body(Body::from("name=Alice"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.list_all().await.unwrap(), vec![Order::default()]);
    }

    #[tokio::test]
    async fn test_submit_repeated_field_keeps_first_value() {
        let store = Arc::new(MemoryOrderStore::new());

        let response = post_form(test_app(store.clone()), "name=Alice&name=Bob").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            store.list_all().await.unwrap(),
            vec![Order::new("Alice", "", "", "")]
        );
    }

    #[tokio::test]
    async fn test_submit_reads_query_fields_after_body() {
        let store = Arc::new(MemoryOrderStore::new());

        let response = test_app(store.clone())
            .oneshot(
                Request::post("/submit?name=Query&phone=555-0000")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded; charset=utf-8",
                    )
                    .body(Body::from("name=Alice"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            store.list_all().await.unwrap(),
            vec![Order::new("Alice", "555-0000", "", "")]
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_get() {
        let store = Arc::new(MemoryOrderStore::new());

        let response = get(test_app(store.clone()), "/submit").await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_storage_failure_is_generic_500() {
        let response = post_form(test_app(Arc::new(UnreachableStore)), "name=Alice").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Internal server error");
    }

    #[tokio::test]
    async fn test_n_submissions_list_n_orders() {
        let store = Arc::new(MemoryOrderStore::new());
        let app = test_app(store.clone());

        for i in 0..3 {
            let response = post_form(app.clone(), &format!("name=c{i}&address=221B+Baker+Street")).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }

        let body = body_json(get(app, "/api/orders").await).await;
        assert_eq!(body["Orders"].as_array().unwrap().len(), 3);
        assert_eq!(body["Locations"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_then_api_orders() {
        let store = Arc::new(MemoryOrderStore::new());
        let app = test_app(store);

        post_form(
            app.clone(),
            "name=Alice&phone=555-1234&address=1600+Amphitheatre+Parkway&preferable_delivery_time=morning",
        )
        .await;
        let response = get(app, "/api/orders").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({
                "Orders": [{
                    "Name": "Alice",
                    "Phone": "555-1234",
                    "Address": HQ,
                    "PreferableDeliveryTime": "morning"
                }],
                "Locations": [{"lat": 37.422_408_2, "lng": -122.084_249_9}]
            })
        );
    }

    #[tokio::test]
    async fn test_api_orders_empty_store() {
        let response = get(test_app(Arc::new(MemoryOrderStore::new())), "/api/orders").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"Orders": [], "Locations": []})
        );
    }

    #[tokio::test]
    async fn test_api_orders_keeps_store_order() {
        let store = Arc::new(MemoryOrderStore::with_orders(vec![
            Order::new("Holmes", "", "221B Baker Street", ""),
            Order::new("Alice", "", HQ, ""),
        ]));

        let body = body_json(get(test_app(store), "/api/orders").await).await;

        assert_eq!(body["Orders"][0]["Name"], "Holmes");
        assert_eq!(body["Locations"][0]["lat"], 51.523_767);
        assert_eq!(body["Orders"][1]["Name"], "Alice");
        assert_eq!(body["Locations"][1]["lat"], 37.422_408_2);
    }

    #[tokio::test]
    async fn test_unresolvable_address_fails_whole_listing() {
        let store = Arc::new(MemoryOrderStore::with_orders(vec![
            Order::new("Alice", "", HQ, ""),
            Order::new("Ghost", "", "Nowhere Lane 0", ""),
        ]));
        let app = test_app(store);

        let api = get(app.clone(), "/api/orders").await;
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(api).await, "Internal server error");

        let map = get(app, "/map").await;
        assert_eq!(map.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(map).await;
        assert!(!body.contains("Alice"));
        assert!(!body.contains("ZERO_RESULTS"));
    }

    #[tokio::test]
    async fn test_map_page_pairs_orders_with_markers() {
        let store = Arc::new(MemoryOrderStore::with_orders(vec![
            Order::new("Alice", "555-1234", HQ, "morning"),
            Order::new("Holmes", "", "221B Baker Street", "evening"),
        ]));

        let response = get(test_app(store), "/map").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Alice"));
        assert!(body.contains("Holmes"));
        assert!(body.contains(r#"data-lat="37.4224082""#));
        assert!(body.contains(r#"data-lng="-0.1585557""#));
        assert_eq!(body.matches("data-lat=").count(), 2);
    }

    #[tokio::test]
    async fn test_map_page_escapes_order_fields() {
        let store = Arc::new(MemoryOrderStore::with_orders(vec![Order::new(
            "<script>alert(1)</script>",
            "",
            HQ,
            "",
        )]));

        let body = body_string(get(test_app(store), "/map").await).await;

        assert!(!body.contains("<script>alert(1)</script>"));
    }

    #[tokio::test]
    async fn test_map_storage_failure_is_500() {
        let response = get(test_app(Arc::new(UnreachableStore)), "/map").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_checks() {
        let app = test_app(Arc::new(MemoryOrderStore::new()));

        let live = get(app.clone(), "/health").await;
        assert_eq!(live.status(), StatusCode::OK);
        assert_eq!(body_string(live).await, "ok");

        assert_eq!(get(app, "/health/ready").await.status(), StatusCode::OK);
        assert_eq!(
            get(test_app(Arc::new(UnreachableStore)), "/health/ready")
                .await
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_static_assets_served() {
        let app = test_app(Arc::new(MemoryOrderStore::new()));

        let response = get(app.clone(), "/static/js/map.js").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("data-lat"));

        assert_eq!(
            get(app, "/static/missing.css").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_unknown_method_on_map() {
        let response = test_app(Arc::new(MemoryOrderStore::new()))
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/map")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
