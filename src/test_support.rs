//! In-memory doubles for the store and the payment provider.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::charge::{ChargeRequest, PayableReference};
use crate::domain::errors::{DomainError, GatewayError};
use crate::domain::order::{
    ListResult, MenuEntry, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, OrderView,
};
use crate::domain::order_id::generate_order_id;
use crate::domain::payment_status::PaymentStatus;
use crate::domain::ports::{MenuRepository, OrderRepository, PaymentGateway};

#[derive(Default)]
struct Tables {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    next_item_id: i64,
}

#[derive(Default)]
pub struct InMemoryOrders {
    tables: Mutex<Tables>,
    collisions_left: AtomicU32,
    fail_items: Mutex<bool>,
    payment_writes: AtomicUsize,
}

impl InMemoryOrders {
    pub fn fail_next_inserts_with_collision(&self, n: u32) {
        self.collisions_left.store(n, Ordering::SeqCst);
    }

    pub fn fail_item_inserts(&self) {
        *self.fail_items.lock().unwrap() = true;
    }

    pub fn seed_order(&self, table_code: &str, total: i64) -> String {
        let order = self
            .insert_order(
                &NewOrder {
                    id: generate_order_id(),
                    table_code: table_code.to_string(),
                    status: OrderStatus::New,
                    payment_status: PaymentStatus::Unpaid,
                    total,
                },
                &[],
            )
            .unwrap();
        order.id
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }

    pub fn items_for(&self, order_id: &str) -> Vec<OrderItem> {
        self.tables
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn payment_writes(&self) -> usize {
        self.payment_writes.load(Ordering::SeqCst)
    }
}

impl OrderRepository for InMemoryOrders {
    fn insert_order(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<Order, DomainError> {
        if self
            .collisions_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DomainError::IdCollision);
        }
        let mut tables = self.tables.lock().unwrap();
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(DomainError::IdCollision);
        }
        // Rolled back as a whole: neither the order nor any item lands.
        if *self.fail_items.lock().unwrap() {
            return Err(DomainError::Upstream("order_items insert failed".to_string()));
        }
        let row = Order {
            id: order.id.clone(),
            table_code: order.table_code.clone(),
            status: order.status,
            payment_status: order.payment_status,
            total: order.total,
            created_at: Utc::now(),
        };
        tables.orders.push(row.clone());
        for item in items {
            tables.next_item_id += 1;
            let id = tables.next_item_id;
            tables.items.push(OrderItem {
                id,
                order_id: item.order_id.clone(),
                menu_id: item.menu_id,
                qty: item.qty,
            });
        }
        Ok(row)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<OrderView>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.orders.iter().find(|o| o.id == id).map(|o| OrderView {
            order: o.clone(),
            items: tables
                .items
                .iter()
                .filter(|i| i.order_id == id)
                .cloned()
                .collect(),
        }))
    }

    fn list_by_status(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError> {
        let tables = self.tables.lock().unwrap();
        // Insertion order stands in for created_at.
        Ok(tables
            .orders
            .iter()
            .rev()
            .filter(|o| statuses.contains(&o.status))
            .cloned()
            .collect())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let tables = self.tables.lock().unwrap();
        let offset = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok(ListResult {
            items: tables
                .orders
                .iter()
                .rev()
                .skip(offset)
                .take(limit as usize)
                .cloned()
                .collect(),
            total: tables.orders.len() as i64,
            revenue: tables
                .orders
                .iter()
                .filter(|o| o.payment_status == PaymentStatus::Paid)
                .map(|o| o.total)
                .sum(),
        })
    }

    fn set_status(&self, id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|o| {
            o.status = status;
            o.clone()
        }))
    }

    fn advance_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Order>, DomainError> {
        self.payment_writes.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|o| {
            if status.supersedes(o.payment_status) {
                o.payment_status = status;
            }
            o.clone()
        }))
    }
}

pub struct InMemoryMenus {
    entries: Vec<MenuEntry>,
}

impl InMemoryMenus {
    /// Latte (1), Croissant (2), a long-named item (3), an inactive item (4).
    pub fn seeded() -> Self {
        let entry = |id, name: &str, price, is_active| MenuEntry {
            id,
            name: name.to_string(),
            price,
            is_active,
            image_url: None,
        };
        Self {
            entries: vec![
                entry(1, "Latte", 25_000, true),
                entry(2, "Croissant", 18_000, true),
                entry(
                    3,
                    "Seasonal Single Origin Pour Over with Oat Milk and Honey Drizzle",
                    30_000,
                    true,
                ),
                entry(4, "Discontinued Mocha", 20_000, false),
            ],
        }
    }
}

impl MenuRepository for InMemoryMenus {
    fn list_active(&self) -> Result<Vec<MenuEntry>, DomainError> {
        let mut active: Vec<MenuEntry> =
            self.entries.iter().filter(|m| m.is_active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<MenuEntry>, DomainError> {
        Ok(self
            .entries
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }
}

#[derive(Clone)]
pub enum GatewayScript {
    Qr,
    Redirect,
    Empty,
    Fail(GatewayError),
    /// Never answers.
    Hang,
}

pub struct FakeGateway {
    script: GatewayScript,
    charges: Mutex<Vec<ChargeRequest>>,
    observed: Option<Arc<InMemoryOrders>>,
    items_seen: Mutex<Option<usize>>,
}

impl FakeGateway {
    pub fn new(script: GatewayScript) -> Self {
        Self {
            script,
            charges: Mutex::new(Vec::new()),
            observed: None,
            items_seen: Mutex::new(None),
        }
    }

    /// Records how many items of the charged order were stored at the
    /// moment the charge arrived.
    pub fn observing(mut self, orders: Arc<InMemoryOrders>) -> Self {
        self.observed = Some(orders);
        self
    }

    pub fn charges(&self) -> Vec<ChargeRequest> {
        self.charges.lock().unwrap().clone()
    }

    pub fn items_seen_at_charge(&self) -> Option<usize> {
        *self.items_seen.lock().unwrap()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
    ) -> Result<PayableReference, GatewayError> {
        if let Some(orders) = &self.observed {
            *self.items_seen.lock().unwrap() = Some(orders.items_for(&request.order_id).len());
        }
        self.charges.lock().unwrap().push(request.clone());
        match &self.script {
            GatewayScript::Qr => Ok(PayableReference {
                qr_url: Some("https://provider.test/qr/png".to_string()),
                redirect_url: None,
            }),
            GatewayScript::Redirect => Ok(PayableReference {
                qr_url: None,
                redirect_url: Some("https://provider.test/pay".to_string()),
            }),
            GatewayScript::Empty => Ok(PayableReference::default()),
            GatewayScript::Fail(e) => Err(e.clone()),
            GatewayScript::Hang => std::future::pending().await,
        }
    }
}

pub const SERVER_KEY: &str = "SB-Mid-server-test";

/// Services over in-memory doubles, ready to hand to an actix `App`.
pub fn app_data(
    orders: Arc<InMemoryOrders>,
    gateway: Arc<FakeGateway>,
) -> (
    actix_web::web::Data<crate::application::order_service::OrderService>,
    actix_web::web::Data<crate::application::notification_service::NotificationService>,
) {
    use crate::application::notification_service::NotificationService;
    use crate::application::order_service::OrderService;

    let order_service = OrderService::new(
        orders.clone(),
        Arc::new(InMemoryMenus::seeded()),
        gateway,
        std::time::Duration::from_secs(5),
    );
    let notification_service = NotificationService::new(orders, SERVER_KEY.to_string());
    (
        actix_web::web::Data::new(order_service),
        actix_web::web::Data::new(notification_service),
    )
}
