use super::common::*;
use crate::ordering::router::{order_router, principal_from_headers, ROLE_HEADER, TEAM_HEADER};
use crate::ordering::domain::Principal;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn json_request(method: Method, uri: &str, team: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(team) = team {
        builder = builder.header(TEAM_HEADER, team);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(ROLE_HEADER, "admin")
        .body(Body::empty())
        .expect("request builds")
}

#[test]
fn principal_is_read_from_proxy_headers() {
    let mut headers = HeaderMap::new();
    assert_eq!(principal_from_headers(&headers), None);

    headers.insert(TEAM_HEADER, HeaderValue::from_static(" team-hawks "));
    assert_eq!(
        principal_from_headers(&headers),
        Some(Principal::team("team-hawks"))
    );

    headers.insert(ROLE_HEADER, HeaderValue::from_static("Admin"));
    assert_eq!(principal_from_headers(&headers), Some(Principal::Admin));
}

#[tokio::test]
async fn pricing_quote_matches_reference_scenarios() {
    let (service, _) = build_service();
    let router = order_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/pricing/quote",
            None,
            json!({
                "unit_price_per_person": "15.00",
                "people_count": 50,
                "delivery_at": "2026-04-10T14:00:00Z",
                "reference_now": "2026-04-06T14:00:00Z"
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["subtotal"], "750.00");
    assert_eq!(body["tax_amount"], "65.63");
    assert_eq!(body["rush_surcharge"], "0.00");
    assert_eq!(body["total"], "815.63");
    assert_eq!(body["is_rush_order"], false);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/pricing/quote",
            None,
            json!({
                "unit_price_per_person": "15.00",
                "people_count": 50,
                "delivery_at": "2026-04-07T14:00:00Z",
                "reference_now": "2026-04-06T14:00:00Z"
            }),
        ))
        .await
        .expect("router responds");
    let body = json_body(response).await;
    assert_eq!(body["rush_surcharge"], "187.50");
    assert_eq!(body["total"], "1003.13");
    assert_eq!(body["is_rush_order"], true);
}

#[tokio::test]
async fn pricing_quote_rejects_empty_headcount() {
    let (service, _) = build_service();
    let response = order_router(service)
        .oneshot(json_request(
            Method::POST,
            "/api/v1/pricing/quote",
            None,
            json!({ "unit_price_per_person": "15.00", "people_count": 0 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("people count")));
}

#[tokio::test]
async fn cart_quote_ignores_client_prices() {
    let (service, _) = build_service();
    let router = order_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/cart/quote",
            None,
            json!({
                "items": [
                    { "kind": "bundle", "template_id": MED_BOWL, "quantity": 1, "unit_price": "0.01" },
                    {
                        "kind": "menu_item",
                        "menu_item_id": "770e8400-e29b-41d4-a716-446655440011",
                        "portion": "half_pan",
                        "quantity": 2
                    }
                ]
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["items"][0]["unit_price"], "2940.00");
    assert_eq!(body["items"][1]["category"], "Base Starches");
    assert_eq!(body["subtotal"], "3180.00");
    assert_eq!(body["tax_amount"], "278.25");
    assert_eq!(body["total"], "3458.25");
    assert_eq!(body["total_servings"], 84);
    assert_eq!(body["is_rush_order"], false);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/cart/quote",
            None,
            json!({
                "items": [
                    { "kind": "menu_item", "menu_item_id": "nope", "portion": "full_pan" }
                ]
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn menu_items_filter_by_query() {
    let (service, _) = build_service();
    let response = order_router(service)
        .oneshot(
            Request::builder()
                .uri("/api/v1/menu-items?category=base_sides&tag=vegan&search=roasted")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<_> = body
        .as_array()
        .expect("item array")
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Herb Roasted Vegetables",
            "Roasted Sweet Plantains",
            "Tahini Roasted Cauliflower"
        ]
    );
    assert_eq!(body[0]["price_half_pan"], "180.00");
}

#[tokio::test]
async fn templates_lists_active_catalog() {
    let (service, _) = build_service();
    let response = order_router(service)
        .oneshot(
            Request::builder()
                .uri("/api/v1/templates")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let templates = body.as_array().expect("template array");
    assert_eq!(templates.len(), 11);
    assert!(templates
        .iter()
        .any(|template| template["name"] == "BYO Med Bowl"));
}

#[tokio::test]
async fn order_endpoints_require_identity() {
    let (service, _) = build_service();
    let response = order_router(service)
        .oneshot(json_request(
            Method::POST,
            "/api/v1/orders",
            None,
            serde_json::to_value(request_delivering_in(200)).expect("request serializes"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let (service, _) = build_service();
    let router = order_router(Arc::clone(&service));

    // Deliveries are checked against the wall clock here, so book far ahead.
    let mut request = request_delivering_in(24 * 365 * 20);
    request.estimated_people_count = Some(10);
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/orders",
            Some("team-hawks"),
            serde_json::to_value(request).expect("request serializes"),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let placed = json_body(response).await;
    assert_eq!(placed["status"], "pending");
    assert_eq!(placed["total_amount"], "532.88");
    let order_id = placed["id"].as_str().expect("order id").to_string();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/orders/{order_id}"))
                .header(TEAM_HEADER, "team-owls")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/status"),
            Some("team-hawks"),
            json!({ "status": "confirmed" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/cancel"),
            Some("team-hawks"),
            json!({}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "cancelled");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/cancel"),
            Some("team-hawks"),
            json!({}),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(admin_get("/api/v1/orders?status=cancelled"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["status_label"], "Cancelled");
}

#[tokio::test]
async fn analytics_are_admin_only() {
    let (service, _) = build_service();
    let router = order_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/admin/analytics")
                .header(TEAM_HEADER, "team-hawks")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(admin_get("/api/v1/admin/analytics?days=7"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["window_days"], 7);
    assert_eq!(report["total_orders"], 0);
    assert_eq!(report["total_revenue"], "0.00");
}

#[tokio::test]
async fn admins_toggle_template_availability() {
    let (service, _) = build_service();
    let router = order_router(service);
    let status_uri = format!("/api/v1/admin/templates/{MED_BOWL}/status");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &status_uri,
            Some("team-hawks"),
            json!({ "is_active": false }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut deactivate = json_request(
        Method::POST,
        &status_uri,
        None,
        json!({ "is_active": false }),
    );
    deactivate
        .headers_mut()
        .insert(ROLE_HEADER, HeaderValue::from_static("admin"));
    let response = router
        .clone()
        .oneshot(deactivate)
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["is_active"], false);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/templates")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(10));

    let response = router
        .oneshot(admin_get("/api/v1/admin/templates"))
        .await
        .expect("router responds");
    let all = json_body(response).await;
    assert_eq!(all.as_array().map(Vec::len), Some(11));
    assert!(all
        .as_array()
        .expect("template array")
        .iter()
        .any(|template| template["name"] == "BYO Med Bowl" && template["is_active"] == false));
}

#[tokio::test]
async fn teams_overview_is_admin_only() {
    let (service, _) = build_service();
    service
        .place_order(&Principal::team("team-hawks"), request_delivering_in(100), now())
        .expect("order placed");
    let router = order_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/admin/teams")
                .header(TEAM_HEADER, "team-hawks")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(admin_get("/api/v1/admin/teams"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let teams = json_body(response).await;
    assert_eq!(teams[0]["team_id"], "team-hawks");
    assert_eq!(teams[0]["orders_placed"], 1);
    assert_eq!(teams[0]["open_orders"], 1);
    assert_eq!(teams[0]["total_spent"], "0.00");
}
