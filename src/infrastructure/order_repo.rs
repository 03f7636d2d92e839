use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ListResult, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, OrderView,
};
use crate::domain::payment_status::PaymentStatus;
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::IdCollision
            }
            other => DomainError::Upstream(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Upstream(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn insert_order(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<NewOrderItemRow> = items.iter().map(NewOrderItemRow::from).collect();

        conn.transaction::<_, DomainError, _>(|conn| {
            let row: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow::from(order))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            if !rows.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            row.try_into()
        })
    }

    fn find_by_id(&self, id: &str) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(Some(OrderView {
            order: order.try_into()?,
            items: items.into_iter().map(OrderItem::from).collect(),
        }))
    }

    fn list_by_status(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let statuses: Vec<&str> = statuses.iter().map(OrderStatus::as_str).collect();

        orders::table
            .filter(orders::status.eq_any(statuses))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page.saturating_sub(1).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let revenue: Option<BigDecimal> = orders::table
                .filter(orders::payment_status.eq(PaymentStatus::Paid.as_str()))
                .select(diesel::dsl::sum(orders::total))
                .first(conn)?;
            let revenue = match revenue {
                Some(sum) => sum.to_i64().ok_or_else(|| {
                    DomainError::Internal(format!("revenue {} is out of range", sum))
                })?,
                None => 0,
            };

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(Order::try_from)
                    .collect::<Result<_, _>>()?,
                total,
                revenue,
            })
        })
    }

    fn set_status(&self, id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn advance_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let overwritable: Vec<&str> = status
            .overwritable()
            .iter()
            .map(PaymentStatus::as_str)
            .collect();

        conn.transaction::<_, DomainError, _>(|conn| {
            // Single conditional UPDATE: concurrent deliveries can only move
            // the status forward.
            if !overwritable.is_empty() {
                diesel::update(
                    orders::table
                        .find(id)
                        .filter(orders::payment_status.eq_any(overwritable)),
                )
                .set((
                    orders::payment_status.eq(status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;
            }

            orders::table
                .find(id)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?
                .map(Order::try_from)
                .transpose()
        })
    }
}
