use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::ServiceKind,
    handlers::{carts, health, orders, products, users},
    state::AppState,
};

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route("/all", get(products::list_all_products))
        .route("/search", get(products::search_products))
        .route("/count", get(products::count_products))
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            post(carts::add_item)
                .put(carts::update_item)
                .delete(carts::remove_items),
        )
        .route("/items/{item_id}", delete(carts::remove_item))
        .route("/users/{user_id}", get(carts::get_cart))
        .route("/users/{user_id}/count", get(carts::count_items))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create_order))
        .route("/status", put(orders::update_status))
        .route("/users/{user_id}", get(orders::list_user_orders))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/cancel", patch(orders::cancel_order))
}

/// Create the router for the API this process serves.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let service_routes = match state.service {
        ServiceKind::User => user_routes(),
        ServiceKind::Product => product_routes(),
        ServiceKind::Cart => cart_routes(),
        ServiceKind::Order => order_routes(),
    };
    let prefix = format!("/api/{}", state.service.path_prefix());

    Router::new()
        .route("/livez", get(health::livez))
        .route("/health", get(health::health))
        .nest(&prefix, service_routes.layer(cors))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::storage::SqliteRepository;
    use crate::testing::MockCache;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let app = create_app(AppState::for_tests(ServiceKind::Order));

        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "order_service");
    }

    #[tokio::test]
    async fn test_only_own_api_is_served() {
        let app = create_app(AppState::for_tests(ServiceKind::Cart));

        let (status, _) = send(&app, "GET", "/api/user", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_create_update_get() {
        let app = create_app(AppState::for_tests(ServiceKind::User));

        let (status, created) = send(&app, "POST", "/api/user", Some(json!({"name": "Ann"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "OK");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, "GET", &format!("/api/user/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/user/{id}"),
            Some(json!({"name": "Annie"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["name"], "Annie");

        let (_, fetched) = send(&app, "GET", &format!("/api/user/{id}"), None).await;
        assert_eq!(fetched["data"]["name"], "Annie");
    }

    /// One user-service instance over its own handle on a shared database file.
    async fn sqlite_instance(path: &std::path::Path, cache: Arc<MockCache>) -> Router {
        let store = Arc::new(SqliteRepository::new(path).await.unwrap());
        create_app(AppState::with_cache(
            ServiceKind::User,
            store,
            cache,
            &Config::default(),
        ))
    }

    #[tokio::test]
    async fn test_instances_on_one_database_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");
        let a = sqlite_instance(&path, Arc::new(MockCache::new())).await;
        let b = sqlite_instance(&path, Arc::new(MockCache::new())).await;

        let (_, created) = send(&a, "POST", "/api/user", Some(json!({"name": "Ann"}))).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&b, "GET", &format!("/api/user/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["name"], "Ann");

        let (status, _) = send(&b, "DELETE", &format!("/api/user/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &a,
            "PUT",
            &format!("/api/user/{id}"),
            Some(json!({"name": "Annie"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shared_cache_and_store_agree_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");
        let cache = Arc::new(MockCache::new());
        let a = sqlite_instance(&path, cache.clone()).await;
        let b = sqlite_instance(&path, cache).await;

        let (_, created) = send(&a, "POST", "/api/user", Some(json!({"name": "Ann"}))).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(&b, "GET", &format!("/api/user/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, updated) = send(
            &b,
            "PUT",
            &format!("/api/user/{id}"),
            Some(json!({"name": "Annie"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["name"], "Annie");

        let (_, fetched) = send(&a, "GET", &format!("/api/user/{id}"), None).await;
        assert_eq!(fetched["data"]["name"], "Annie");
    }

    #[tokio::test]
    async fn test_missing_user_is_err_envelope() {
        let app = create_app(AppState::for_tests(ServiceKind::User));

        let (status, body) = send(&app, "GET", &format!("/api/user/{}", Uuid::nil()), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "ERR");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_blank_user_name_rejected() {
        let app = create_app(AppState::for_tests(ServiceKind::User));

        let (status, body) = send(&app, "POST", "/api/user", Some(json!({"name": "  "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn test_products_listed_by_type() {
        let app = create_app(AppState::for_tests(ServiceKind::Product));
        for (name, product_type) in [("Zen 14", "laptop"), ("Tower", "pc")] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/product",
                Some(json!({"name": name, "product_type": product_type, "price": 1000})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, laptops) = send(&app, "GET", "/api/product", None).await;
        let (_, pcs) = send(&app, "GET", "/api/product?type=pc", None).await;

        assert_eq!(laptops["data"].as_array().unwrap().len(), 1);
        assert_eq!(laptops["data"][0]["name"], "Zen 14");
        assert_eq!(pcs["data"][0]["name"], "Tower");
    }

    #[tokio::test]
    async fn test_product_catalog_queries() {
        let app = create_app(AppState::for_tests(ServiceKind::Product));
        for (name, product_type, price) in [
            ("Zen 14", "laptop", 900),
            ("Tower", "pc", 1_500),
            ("Air 13", "laptop", 1_200),
        ] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/product",
                Some(json!({"name": name, "product_type": product_type, "price": price})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, all) = send(&app, "GET", "/api/product/all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all["data"].as_array().unwrap().len(), 3);

        let (status, page) = send(
            &app,
            "GET",
            "/api/product/search?price_min=1000&sort_by=price_desc&page=1&limit=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().unwrap().len(), 1);
        assert_eq!(page["data"][0]["name"], "Tower");

        let (_, next) = send(
            &app,
            "GET",
            "/api/product/search?price_min=1000&sort_by=price_desc&page=2&limit=1",
            None,
        )
        .await;
        assert_eq!(next["data"][0]["name"], "Air 13");

        let (_, count) = send(&app, "GET", "/api/product/count?price_min=1000", None).await;
        assert_eq!(count["data"]["count"], 2);
    }

    #[tokio::test]
    async fn test_inverted_price_range_is_bad_request() {
        let app = create_app(AppState::for_tests(ServiceKind::Product));

        let (status, body) = send(
            &app,
            "GET",
            "/api/product/search?price_min=500&price_max=100",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "ERR");
        assert_eq!(body["message"], "price_min (500) is greater than price_max (100)");
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let app = create_app(AppState::for_tests(ServiceKind::Cart));
        let user_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let (status, added) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({
                "user_id": user_id,
                "product_id": product_id,
                "name": "Laptop X",
                "quantity": 2,
                "unit_price": 1500,
                "total_price": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(added["data"]["items"][0]["total_price"], 3000);
        let item_id = added["data"]["items"][0]["id"].as_str().unwrap().to_string();

        let (_, count) = send(&app, "GET", &format!("/api/cart/users/{user_id}/count"), None).await;
        assert_eq!(count["data"]["count"], 1);

        let (status, _) = send(
            &app,
            "POST",
            "/api/cart/items",
            Some(json!({
                "user_id": user_id,
                "product_id": product_id,
                "name": "Laptop X",
                "quantity": 1,
                "unit_price": 1500
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, updated) = send(
            &app,
            "PUT",
            "/api/cart/items",
            Some(json!({"user_id": user_id, "product_id": product_id, "quantity": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["items"][0]["total_price"], 4500);

        let (status, _) = send(&app, "DELETE", &format!("/api/cart/items/{item_id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", &format!("/api/cart/users/{user_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "ERR");
        let (_, count) = send(&app, "GET", &format!("/api/cart/users/{user_id}/count"), None).await;
        assert_eq!(count["data"]["count"], 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_items() {
        let app = create_app(AppState::for_tests(ServiceKind::Cart));

        let (status, _) = send(
            &app,
            "DELETE",
            "/api/cart/items",
            Some(json!({"item_ids": [Uuid::new_v4()]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/cart/items", Some(json!({"item_ids": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let app = create_app(AppState::for_tests(ServiceKind::Order));
        let user_id = Uuid::new_v4();

        let (status, created) = send(
            &app,
            "POST",
            "/api/order",
            Some(json!({
                "user_id": user_id,
                "lines": [
                    {"product_id": Uuid::new_v4(), "name": "Monitor", "quantity": 2, "unit_price": 300},
                    {"product_id": Uuid::new_v4(), "name": "Cable", "quantity": 1, "unit_price": 20}
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["total_price"], 620);
        assert_eq!(created["data"]["status"], "pending");
        let order_id = created["data"]["id"].as_str().unwrap().to_string();

        let (_, pending) = send(&app, "GET", &format!("/api/order/users/{user_id}?status=pending"), None).await;
        assert_eq!(pending["data"].as_array().unwrap().len(), 1);

        let (status, shipped) = send(
            &app,
            "PUT",
            "/api/order/status",
            Some(json!({"order_id": order_id, "status": "confirmed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shipped["data"]["status"], "confirmed");

        let (_, pending) = send(&app, "GET", &format!("/api/order/users/{user_id}?status=pending"), None).await;
        assert!(pending["data"].as_array().unwrap().is_empty());

        let (status, cancelled) = send(&app, "PATCH", &format!("/api/order/{order_id}/cancel"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["data"]["status"], "cancelled");

        let (_, detail) = send(&app, "GET", &format!("/api/order/{order_id}"), None).await;
        assert_eq!(detail["data"]["status"], "cancelled");

        let (status, _) = send(&app, "PATCH", &format!("/api/order/{order_id}/cancel"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let app = create_app(AppState::for_tests(ServiceKind::Order));

        let (status, body) = send(
            &app,
            "POST",
            "/api/order",
            Some(json!({"user_id": Uuid::new_v4(), "lines": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Order must contain at least one line");
    }

    #[tokio::test]
    async fn test_unknown_status_filter_rejected() {
        let app = create_app(AppState::for_tests(ServiceKind::Order));

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/order/users/{}?status=teleported", Uuid::new_v4()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
