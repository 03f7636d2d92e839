use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::order::{MenuEntry, NewOrder, NewOrderItem, Order, OrderItem};
use crate::schema::{menus, order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: String,
    pub table_code: String,
    pub status: String,
    pub payment_status: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: String,
    pub table_code: String,
    pub status: String,
    pub payment_status: String,
    pub total: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: String,
    pub menu_id: i64,
    pub qty: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: String,
    pub menu_id: i64,
    pub qty: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menus)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuRow {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ── Row <-> domain conversions ───────────────────────────────────────────────

impl From<&NewOrder> for NewOrderRow {
    fn from(order: &NewOrder) -> Self {
        Self {
            id: order.id.clone(),
            table_code: order.table_code.clone(),
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            total: order.total,
        }
    }
}

impl From<&NewOrderItem> for NewOrderItemRow {
    fn from(item: &NewOrderItem) -> Self {
        Self {
            order_id: item.order_id.clone(),
            menu_id: item.menu_id,
            qty: item.qty,
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            status: row
                .status
                .parse()
                .map_err(|_| DomainError::Internal(format!("order {} has status '{}'", row.id, row.status)))?,
            payment_status: row.payment_status.parse()?,
            id: row.id,
            table_code: row.table_code,
            total: row.total,
            created_at: row.created_at,
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            menu_id: row.menu_id,
            qty: row.qty,
        }
    }
}

impl From<MenuRow> for MenuEntry {
    fn from(row: MenuRow) -> Self {
        MenuEntry {
            id: row.id,
            name: row.name,
            price: row.price,
            is_active: row.is_active,
            image_url: row.image_url,
        }
    }
}
