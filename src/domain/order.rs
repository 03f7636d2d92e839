use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::payment_status::PaymentStatus;

/// Kitchen workflow state. Owned by staff actions, never by payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    Brew,
    Ready,
    Done,
}

impl OrderStatus {
    /// Statuses still visible on the kitchen display.
    pub const OPEN: [OrderStatus; 3] = [OrderStatus::New, OrderStatus::Brew, OrderStatus::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Brew => "BREW",
            OrderStatus::Ready => "READY",
            OrderStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NEW" => Ok(OrderStatus::New),
            "BREW" => Ok(OrderStatus::Brew),
            "READY" => Ok(OrderStatus::Ready),
            "DONE" => Ok(OrderStatus::Done),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

/// One line of a checkout request as the client sent it. `name` and
/// `price` are informational only; the catalog is authoritative.
#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub menu_id: i64,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub qty: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub table_code: String,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub is_active: bool,
    pub image_url: Option<String>,
}

/// A checkout line re-priced from the menu catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub menu_id: i64,
    pub name: String,
    pub unit_price: i64,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: String,
    pub table_code: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: String,
    pub menu_id: i64,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub table_code: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: String,
    pub menu_id: i64,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
    /// Sum of `total` over every PAID order, not just this page.
    pub revenue: i64,
}
