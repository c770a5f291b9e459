use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::cart::CartSelection;
use super::catalog::MenuItemFilter;
use super::domain::{OrderId, OrderRequest, OrderStatus, Principal, SectionCategory, TemplateId};
use super::pricing::compute_pricing;
use super::repository::{OrderRepository, RepositoryError};
use super::service::{OrderService, OrderServiceError};

pub const TEAM_HEADER: &str = "x-team-id";
pub const ROLE_HEADER: &str = "x-role";
const DEFAULT_ANALYTICS_WINDOW_DAYS: u32 = 30;

/// Router builder exposing catalog, quoting, ordering, and analytics endpoints.
pub fn order_router<R>(service: Arc<OrderService<R>>) -> Router
where
    R: OrderRepository + 'static,
{
    Router::new()
        .route("/api/v1/templates", get(templates_handler::<R>))
        .route("/api/v1/menu-items", get(menu_items_handler::<R>))
        .route("/api/v1/pricing/quote", post(pricing_quote_handler::<R>))
        .route("/api/v1/cart/quote", post(cart_quote_handler::<R>))
        .route("/api/v1/orders/quote", post(order_quote_handler::<R>))
        .route(
            "/api/v1/orders",
            post(place_order_handler::<R>).get(list_orders_handler::<R>),
        )
        .route("/api/v1/orders/:order_id", get(order_handler::<R>))
        .route("/api/v1/orders/:order_id/cancel", post(cancel_handler::<R>))
        .route("/api/v1/orders/:order_id/status", post(status_handler::<R>))
        .route("/api/v1/admin/analytics", get(analytics_handler::<R>))
        .route("/api/v1/admin/teams", get(teams_handler::<R>))
        .route("/api/v1/admin/templates", get(admin_templates_handler::<R>))
        .route(
            "/api/v1/admin/templates/:template_id/status",
            post(template_status_handler::<R>),
        )
        .with_state(service)
}

/// Identity forwarded by the authenticating proxy in front of the service.
pub fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let role = header_value(headers, ROLE_HEADER);
    if role.is_some_and(|role| role.eq_ignore_ascii_case("admin")) {
        return Some(Principal::Admin);
    }
    header_value(headers, TEAM_HEADER).map(Principal::team)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "missing team or admin identity" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

pub(crate) fn error_response(error: OrderServiceError) -> Response {
    let status = match &error {
        OrderServiceError::Pricing(_)
        | OrderServiceError::MissingField(_)
        | OrderServiceError::DeliveryInPast
        | OrderServiceError::UnknownTemplate(_)
        | OrderServiceError::InactiveTemplate(_)
        | OrderServiceError::UnknownMenuItem(_)
        | OrderServiceError::InactiveMenuItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OrderServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        OrderServiceError::NotFound(_)
        | OrderServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        OrderServiceError::CancellationWindowClosed { .. }
        | OrderServiceError::InvalidTransition { .. }
        | OrderServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        OrderServiceError::Repository(RepositoryError::Unavailable(_))
        | OrderServiceError::CatalogUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PricingQuoteRequest {
    pub unit_price_per_person: Decimal,
    pub people_count: i64,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub delivery_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference_now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CartQuoteRequest {
    pub items: Vec<CartSelection>,
    #[serde(default)]
    pub delivery_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuItemParams {
    #[serde(default)]
    pub category: Option<SectionCategory>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TemplateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrderQuoteRequest {
    pub template_id: TemplateId,
    #[serde(default)]
    pub people_count: Option<i64>,
    #[serde(default)]
    pub delivery_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersParams {
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    #[serde(default)]
    pub days: Option<u32>,
}

pub(crate) async fn templates_handler<R>(State(service): State<Arc<OrderService<R>>>) -> Response
where
    R: OrderRepository + 'static,
{
    match service.active_templates() {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn menu_items_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Query(params): Query<MenuItemParams>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let filter = MenuItemFilter {
        category: params.category,
        dietary_tag: params.tag,
        search: params.search,
    };
    match service.menu_items(&filter) {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pricing_quote_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Json(request): Json<PricingQuoteRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let config = service.pricing_config();
    let result = compute_pricing(
        request.unit_price_per_person,
        request.people_count,
        request.tax_rate.unwrap_or(config.tax_rate),
        request.delivery_at,
        request.reference_now.unwrap_or_else(Utc::now),
        &config.rush_policy(),
    );

    match result {
        Ok(pricing) => (StatusCode::OK, Json(pricing)).into_response(),
        Err(error) => error_response(error.into()),
    }
}

pub(crate) async fn cart_quote_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Json(request): Json<CartQuoteRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    match service.cart_quote(&request.items, request.delivery_at, Utc::now()) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn order_quote_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Json(request): Json<OrderQuoteRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    match service.quote(
        &request.template_id,
        request.people_count,
        request.delivery_at,
        Utc::now(),
    ) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn place_order_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Json(request): Json<OrderRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.place_order(&principal, request, Utc::now()) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_orders_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Query(params): Query<ListOrdersParams>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.list(&principal, params.status) {
        Ok(orders) => {
            let views: Vec<_> = orders.iter().map(|order| order.summary_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn order_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.get(&principal, &OrderId(order_id)) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.cancel(&principal, &OrderId(order_id), Utc::now()) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.update_status(&principal, &OrderId(order_id), request.status) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analytics_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Query(params): Query<AnalyticsParams>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    let days = params.days.unwrap_or(DEFAULT_ANALYTICS_WINDOW_DAYS);
    match service.analytics(&principal, days, Utc::now()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn teams_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.teams_overview(&principal) {
        Ok(teams) => (StatusCode::OK, Json(teams)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn admin_templates_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.all_templates(&principal) {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn template_status_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    Path(template_id): Path<String>,
    Json(request): Json<TemplateStatusRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let Some(principal) = principal_from_headers(&headers) else {
        return unauthorized();
    };

    match service.set_template_active(&principal, &TemplateId(template_id), request.is_active) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(error) => error_response(error),
    }
}
