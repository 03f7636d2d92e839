use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::order_service::{CreatedOrder, OrderService};
use crate::domain::charge::PayableReference;
use crate::domain::order::{CheckoutItem, CheckoutRequest, Order, OrderStatus, OrderView};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutItemRequest {
    /// Menu id.
    pub id: i64,
    /// Display name as shown to the diner. Ignored; the menu name is used.
    #[serde(default)]
    pub name: Option<String>,
    /// Price as shown to the diner. Ignored; the menu price is used.
    #[serde(default)]
    pub price: Option<i64>,
    pub qty: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub table_code: String,
    pub items: Vec<CheckoutItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayableReferenceResponse {
    /// QR payload image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub total: i64,
    /// Empty when the provider did not return a payment link; the order
    /// exists regardless.
    pub payable_reference: PayableReferenceResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub menu_id: i64,
    pub qty: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub table_code: String,
    pub status: String,
    pub payment_status: String,
    pub total: i64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of NEW, BREW, READY, DONE.
    pub status: String,
}

impl From<CreateOrderRequest> for CheckoutRequest {
    fn from(body: CreateOrderRequest) -> Self {
        CheckoutRequest {
            table_code: body.table_code,
            items: body
                .items
                .into_iter()
                .map(|i| CheckoutItem {
                    menu_id: i.id,
                    name: i.name,
                    price: i.price,
                    qty: i.qty,
                })
                .collect(),
        }
    }
}

impl From<PayableReference> for PayableReferenceResponse {
    fn from(reference: PayableReference) -> Self {
        Self {
            qr_url: reference.qr_url,
            redirect_url: reference.redirect_url,
        }
    }
}

impl From<CreatedOrder> for CreateOrderResponse {
    fn from(created: CreatedOrder) -> Self {
        Self {
            order_id: created.order_id,
            total: created.total,
            payable_reference: created.payable_reference.into(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            table_code: o.table_code,
            status: o.status.as_str().to_string(),
            payment_status: o.payment_status.as_str().to_string(),
            total: o.total,
            created_at: o.created_at.to_rfc3339(),
            items: None,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let mut response = OrderResponse::from(view.order);
        response.items = Some(
            view.items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    menu_id: i.menu_id,
                    qty: i.qty,
                })
                .collect(),
        );
        response
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    /// Sum of totals over all PAID orders.
    pub revenue: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices the cart from the menu, persists the order and its items, then
/// requests a QRIS charge. A provider failure after persistence still
/// returns the order id with an empty `payable_reference`.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Missing table code, empty cart or unknown menu item"),
        (status = 500, description = "Store failure"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let created = service.create_order(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(CreateOrderResponse::from(created)))
}

/// GET /orders/{id}
///
/// Returns the order together with its items and payment status.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = service.get_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PATCH /orders/{id}/status
///
/// Moves an order through the kitchen workflow. Payment status is untouched.
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "kitchen"
)]
pub async fn set_order_status(
    service: web::Data<OrderService>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let status: OrderStatus = body.status.parse()?;
    let order = service.set_order_status(path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /kitchen/orders
///
/// Orders still in NEW, BREW or READY, newest first.
#[utoipa::path(
    get,
    path = "/kitchen/orders",
    responses(
        (status = 200, description = "Open orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "kitchen"
)]
pub async fn kitchen_orders(service: web::Data<OrderService>) -> Result<HttpResponse, AppError> {
    let orders: Vec<OrderResponse> = service
        .kitchen_queue()
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /dashboard
///
/// Paginated list of all orders plus revenue from paid orders.
#[utoipa::path(
    get,
    path = "/dashboard",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Orders and revenue", body = DashboardResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "dashboard"
)]
pub async fn dashboard(
    service: web::Data<OrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = service.dashboard(page, limit).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
        revenue: result.revenue,
    }))
}
