#[path = "common/mod.rs"]
mod common;

use common::{StorefrontTest, StubResponse, StubServer, products};

fn pages(server: &StubServer) -> Vec<String> {
    server
        .requests()
        .iter()
        .filter_map(|request| request.param("page"))
        .collect()
}

// ============================================================================
// List browsing against a stub API
// ============================================================================

#[test]
fn test_products_scrolls_through_every_page() {
    let server = StubServer::paged("product", products(5));
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&["products", "--per-page", "2", "--json"]);
    assert_eq!(json["resource"], "products");
    assert_eq!(json["count"], 5);
    assert_eq!(json["requests"], 3);
    assert_eq!(json["has_more"], false);
    assert!(json["error"].is_null());
    assert_eq!(json["items"][4]["p_name"], "Product 5");

    assert_eq!(pages(&server), vec!["1", "2", "3"]);
    for request in server.requests() {
        assert_eq!(request.path(), "/api/v1/product");
        assert_eq!(request.param("per_page").as_deref(), Some("2"));
    }
}

#[test]
fn test_products_text_output() {
    let server = StubServer::paged("product", products(3));
    let storefront = StorefrontTest::new().with_api(&server);

    let output = storefront.run_success(&["products"]);
    assert!(output.contains("Product 1"));
    assert!(output.contains("Product 3"));
    assert!(output.contains("Corner Shop"));
}

#[test]
fn test_per_page_comes_from_config() {
    let server = StubServer::paged("product", products(5));
    let storefront = StorefrontTest::new().with_api(&server);
    storefront.write_config("per_page: 2\n");

    let json = storefront.run_json(&["products", "--json"]);
    assert_eq!(json["count"], 5);
    assert_eq!(pages(&server), vec!["1", "2", "3"]);
}

#[test]
fn test_exactly_full_last_page_costs_one_more_request() {
    let server = StubServer::paged("product", products(4));
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&["products", "--per-page", "2", "--json"]);
    assert_eq!(json["count"], 4);
    assert_eq!(pages(&server), vec!["1", "2", "3"]);
}

#[test]
fn test_limit_stops_fetching() {
    let server = StubServer::paged("product", products(50));
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&["products", "--per-page", "10", "--limit", "12", "--json"]);
    assert_eq!(json["count"], 12);
    assert_eq!(json["has_more"], true);
    assert_eq!(pages(&server), vec!["1", "2"]);
}

#[test]
fn test_products_filters_are_sent() {
    let server = StubServer::paged("product", products(1));
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&[
        "products",
        "--category",
        "1,2",
        "--shop",
        "9",
        "--url",
        "--json",
    ]);
    assert_eq!(json["url"], "/application/product/list?categoryId=1%2C2&shopId=9");

    let request = &server.requests()[0];
    assert_eq!(request.param("category_id").as_deref(), Some("1,2"));
    assert_eq!(request.param("shop_id").as_deref(), Some("9"));
}

#[test]
fn test_url_flag_prints_location_first() {
    let server = StubServer::paged("product", products(1));
    let storefront = StorefrontTest::new().with_api(&server);

    let output = storefront.run_success(&["products", "--shop", "9", "--url"]);
    let first = output.lines().next().unwrap_or_default();
    assert!(first.contains("/application/product/list?shopId=9"));
}

#[test]
fn test_new_arrivals_sends_filter_and_sort() {
    let server = StubServer::paged("products", products(1));
    let storefront = StorefrontTest::new().with_api(&server);

    storefront.run_success(&["new-arrivals", "--sort", "price_asc", "--filter", "3"]);

    let request = &server.requests()[0];
    assert_eq!(request.path(), "/api/v1/new-arrival-product");
    assert_eq!(request.param("category_id").as_deref(), Some("3"));
    assert_eq!(request.param("sort").as_deref(), Some("price_asc"));
}

#[test]
fn test_merchant_orders_send_merchant_and_status() {
    let items = vec![serde_json::json!({
        "id": 1,
        "order_no": "SO-1",
        "voucher_no": "V-1",
        "status": 6,
        "name": "Tea",
        "quantity": 2,
        "price": "2.50",
        "total": "5.00",
    })];
    let server = StubServer::paged("order_items", items);
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&[
        "orders",
        "--merchant",
        "9",
        "--status",
        "completed",
        "--category",
        "4",
        "--json",
    ]);
    assert_eq!(json["count"], 1);
    assert_eq!(json["url"], "/merchant/order/list?categoryId=4&status=6");

    let request = &server.requests()[0];
    assert_eq!(request.path(), "/api/v1/order/orderbymerchant");
    assert_eq!(request.param("merchant_id").as_deref(), Some("9"));
    assert_eq!(request.param("status").as_deref(), Some("6"));
    assert_eq!(request.param("category_id").as_deref(), Some("4"));
}

#[test]
fn test_my_orders_empty() {
    let server = StubServer::paged("order", Vec::new());
    let storefront = StorefrontTest::new().with_api(&server);

    let output = storefront.run_success(&["my-orders", "--user", "5", "--status", "all"]);
    assert!(output.contains("No orders found."));

    let request = &server.requests()[0];
    assert_eq!(request.path(), "/api/v1/order/getorderbystatus");
    assert_eq!(request.param("user_id").as_deref(), Some("5"));
    assert_eq!(request.param("status"), None);
}

#[test]
fn test_token_is_sent_as_bearer() {
    let server = StubServer::paged("promotion", Vec::new());
    let storefront = StorefrontTest::new()
        .with_api(&server)
        .with_env("STOREFRONT_TOKEN", "secret-token");

    storefront.run_success(&["promotions"]);

    let request = &server.requests()[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer secret-token"));
}

#[test]
fn test_missing_api_url_fails() {
    let storefront = StorefrontTest::new();

    let stderr = storefront.run_failure(&["products"]);
    assert!(stderr.contains("API base URL not configured"));
}

#[test]
fn test_server_error_fails_with_message() {
    let server = StubServer::start(|_| {
        StubResponse::status(500, r#"{"message":"database unavailable"}"#)
    });
    let storefront = StorefrontTest::new().with_api(&server);

    let stderr = storefront.run_failure(&["deals"]);
    assert!(stderr.contains("failed to load deals of the day"));
    assert!(stderr.contains("database unavailable"));
}

#[test]
fn test_error_after_first_page_keeps_loaded_items() {
    let all = products(4);
    let server = StubServer::start(move |request| {
        if request.param("page").as_deref() == Some("1") {
            StubResponse::json(serde_json::json!({ "data": { "product": all[..2].to_vec() } }))
        } else {
            StubResponse::status(503, "")
        }
    });
    let storefront = StorefrontTest::new().with_api(&server);

    let output = storefront.run(&["products", "--per-page", "2", "--json"]);
    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should still be JSON");
    assert_eq!(json["count"], 2);
    assert!(json["error"].as_str().unwrap().contains("503"));
}

#[test]
fn test_malformed_response_fails() {
    let server = StubServer::start(|_| StubResponse::json(serde_json::json!({ "items": [] })));
    let storefront = StorefrontTest::new().with_api(&server);

    let stderr = storefront.run_failure(&["trending"]);
    assert!(stderr.contains("unexpected response shape"));
}

#[test]
fn test_categories_load_in_one_request() {
    let categories: Vec<serde_json::Value> = (1..=15)
        .map(|id| serde_json::json!({ "id": id, "name": format!("Category {id}") }))
        .collect();
    let server = StubServer::start(move |_| {
        StubResponse::json(serde_json::json!({ "data": { "category": categories } }))
    });
    let storefront = StorefrontTest::new().with_api(&server);

    let json = storefront.run_json(&["categories", "--per-page", "5", "--json"]);
    assert_eq!(json["count"], 15);
    assert_eq!(json["requests"], 1);
    assert_eq!(json["has_more"], false);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/api/v1/categories/getall");
    assert_eq!(requests[0].param("page"), None);
}
