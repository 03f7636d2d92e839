use async_trait::async_trait;

use super::charge::{ChargeRequest, PayableReference};
use super::errors::{DomainError, GatewayError};
use super::order::{ListResult, MenuEntry, NewOrder, NewOrderItem, Order, OrderStatus, OrderView};
use super::payment_status::PaymentStatus;

/// Narrow view of the order store. Implementations are blocking.
pub trait OrderRepository: Send + Sync + 'static {
    /// Writes the order and its items in one transaction; on failure
    /// nothing is stored. Fails with `DomainError::IdCollision` if the id is
    /// already taken.
    fn insert_order(&self, order: &NewOrder, items: &[NewOrderItem])
        -> Result<Order, DomainError>;
    fn find_by_id(&self, id: &str) -> Result<Option<OrderView>, DomainError>;
    /// Newest first.
    fn list_by_status(&self, statuses: &[OrderStatus]) -> Result<Vec<Order>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    fn set_status(&self, id: &str, status: OrderStatus) -> Result<Option<Order>, DomainError>;
    /// Writes `status` only if it supersedes the stored payment status and
    /// returns the order as stored afterwards, or `None` if the id is unknown.
    fn advance_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
    ) -> Result<Option<Order>, DomainError>;
}

pub trait MenuRepository: Send + Sync + 'static {
    /// Active entries ordered by name.
    fn list_active(&self) -> Result<Vec<MenuEntry>, DomainError>;
    fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<MenuEntry>, DomainError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn create_charge(&self, request: &ChargeRequest)
        -> Result<PayableReference, GatewayError>;
}
