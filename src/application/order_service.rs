use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::charge::{ChargeRequest, PayableReference};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    CheckoutRequest, ListResult, MenuEntry, NewOrder, NewOrderItem, Order, OrderStatus,
    OrderView, PricedLine,
};
use crate::domain::order_id::generate_order_id;
use crate::domain::payment_status::PaymentStatus;
use crate::domain::ports::{MenuRepository, OrderRepository, PaymentGateway};
use crate::domain::pricing::{order_total, price_lines};

use super::run_blocking;

/// Attempts at inserting an order before an id collision is escalated.
pub const MAX_ID_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: String,
    pub total: i64,
    pub payable_reference: PayableReference,
}

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    menus: Arc<dyn MenuRepository>,
    gateway: Arc<dyn PaymentGateway>,
    charge_timeout: Duration,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        menus: Arc<dyn MenuRepository>,
        gateway: Arc<dyn PaymentGateway>,
        charge_timeout: Duration,
    ) -> Self {
        Self {
            orders,
            menus,
            gateway,
            charge_timeout,
        }
    }

    /// Persists the order and its items, then asks the provider for a
    /// payable reference. Once the order is durable a provider failure only
    /// empties the reference; it never fails the request.
    pub async fn create_order(&self, request: CheckoutRequest) -> Result<CreatedOrder, DomainError> {
        if request.table_code.trim().is_empty() {
            return Err(DomainError::InvalidInput("table_code is required".to_string()));
        }
        if request.items.is_empty() {
            return Err(DomainError::InvalidInput(
                "items must be a non-empty list".to_string(),
            ));
        }

        let lines = self.price(&request).await?;
        let total = order_total(&lines)?;

        let order = self
            .insert_with_fresh_id(&request.table_code, total, &lines)
            .await?;

        let payable_reference = self.request_charge(&order, &lines).await;
        log::info!(
            "create_order: order {} for table {} created, total {}",
            order.id,
            order.table_code,
            order.total
        );

        Ok(CreatedOrder {
            order_id: order.id,
            total: order.total,
            payable_reference,
        })
    }

    async fn price(&self, request: &CheckoutRequest) -> Result<Vec<PricedLine>, DomainError> {
        let mut ids: Vec<i64> = request.items.iter().map(|i| i.menu_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let menus = Arc::clone(&self.menus);
        let entries = run_blocking(move || menus.find_by_ids(&ids)).await?;
        let catalog: HashMap<i64, MenuEntry> = entries.into_iter().map(|m| (m.id, m)).collect();

        price_lines(&request.items, &catalog)
    }

    /// Order and items are written together; a failed attempt leaves nothing
    /// behind.
    async fn insert_with_fresh_id(
        &self,
        table_code: &str,
        total: i64,
        lines: &[PricedLine],
    ) -> Result<Order, DomainError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let new_order = NewOrder {
                id: generate_order_id(),
                table_code: table_code.to_string(),
                status: OrderStatus::New,
                payment_status: PaymentStatus::Unpaid,
                total,
            };
            let items: Vec<NewOrderItem> = lines
                .iter()
                .map(|l| NewOrderItem {
                    order_id: new_order.id.clone(),
                    menu_id: l.menu_id,
                    qty: l.qty,
                })
                .collect();
            let order_id = new_order.id.clone();
            let orders = Arc::clone(&self.orders);

            match run_blocking(move || orders.insert_order(&new_order, &items)).await {
                Ok(order) => return Ok(order),
                Err(DomainError::IdCollision) if attempt < MAX_ID_ATTEMPTS => {
                    log::warn!(
                        "create_order: id {} already taken (attempt {}), regenerating",
                        order_id,
                        attempt
                    );
                }
                Err(DomainError::IdCollision) => {
                    log::error!(
                        "create_order: giving up after {} id collisions, last id {}",
                        attempt,
                        order_id
                    );
                    return Err(DomainError::Upstream(
                        "could not allocate a unique order id".to_string(),
                    ));
                }
                Err(e) => {
                    log::error!("create_order: failed to insert order {}: {}", order_id, e);
                    return Err(e);
                }
            }
        }
    }

    async fn request_charge(&self, order: &Order, lines: &[PricedLine]) -> PayableReference {
        let charge = ChargeRequest::new(&order.id, order.total, lines);
        match tokio::time::timeout(self.charge_timeout, self.gateway.create_charge(&charge)).await {
            Ok(Ok(reference)) => {
                if reference.is_empty() {
                    log::warn!(
                        "create_order: provider returned no payable reference for order {}",
                        order.id
                    );
                }
                reference
            }
            Ok(Err(e)) => {
                log::warn!("create_order: charge failed for order {}: {}", order.id, e);
                PayableReference::default()
            }
            Err(_) => {
                log::warn!(
                    "create_order: charge for order {} timed out after {:?}",
                    order.id,
                    self.charge_timeout
                );
                PayableReference::default()
            }
        }
    }

    pub async fn get_order(&self, id: String) -> Result<OrderView, DomainError> {
        let orders = Arc::clone(&self.orders);
        let lookup = id.clone();
        run_blocking(move || orders.find_by_id(&lookup))
            .await?
            .ok_or(DomainError::NotFound(id))
    }

    pub async fn kitchen_queue(&self) -> Result<Vec<Order>, DomainError> {
        let orders = Arc::clone(&self.orders);
        run_blocking(move || orders.list_by_status(&OrderStatus::OPEN)).await
    }

    pub async fn set_order_status(&self, id: String, status: OrderStatus) -> Result<Order, DomainError> {
        let orders = Arc::clone(&self.orders);
        let lookup = id.clone();
        let order = run_blocking(move || orders.set_status(&lookup, status))
            .await?
            .ok_or(DomainError::NotFound(id))?;
        log::info!("order {} moved to {}", order.id, order.status);
        Ok(order)
    }

    pub async fn dashboard(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = Arc::clone(&self.orders);
        run_blocking(move || orders.list(page, limit)).await
    }

    pub async fn list_menu(&self) -> Result<Vec<MenuEntry>, DomainError> {
        let menus = Arc::clone(&self.menus);
        run_blocking(move || menus.list_active()).await
    }
}
