use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::notification::{verify_notification, PaymentNotification};
use crate::domain::payment_status::{
    map_transaction_status, recognize_transaction_status, PaymentStatus,
};
use crate::domain::ports::OrderRepository;

use super::run_blocking;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub order_id: String,
    /// Status the notification maps to.
    pub mapped: PaymentStatus,
    /// Status stored after applying it.
    pub stored: PaymentStatus,
}

/// Verifies, maps and applies provider payment notifications. Safe to call
/// repeatedly with the same payload.
pub struct NotificationService {
    orders: Arc<dyn OrderRepository>,
    server_key: String,
}

impl NotificationService {
    pub fn new(orders: Arc<dyn OrderRepository>, server_key: String) -> Self {
        Self { orders, server_key }
    }

    pub async fn handle(
        &self,
        notification: PaymentNotification,
    ) -> Result<NotificationOutcome, DomainError> {
        if let Err(e) = verify_notification(&notification, &self.server_key) {
            log::warn!(
                "payment_notification: rejected notification for order {}: {}",
                notification.order_id,
                e
            );
            return Err(e);
        }

        let mapped = map_transaction_status(&notification.transaction_status);
        if recognize_transaction_status(&notification.transaction_status).is_none() {
            log::warn!(
                "payment_notification: unrecognized transaction_status '{}' for order {}, treating as {}",
                notification.transaction_status,
                notification.order_id,
                mapped
            );
        }

        let orders = Arc::clone(&self.orders);
        let order_id = notification.order_id.clone();
        let order = run_blocking(move || orders.advance_payment_status(&order_id, mapped))
            .await
            .inspect_err(|e| {
                log::error!(
                    "payment_notification: failed to update order {}: {}",
                    notification.order_id,
                    e
                )
            })?;

        let Some(order) = order else {
            log::error!(
                "payment_notification: order {} does not exist (transaction_status '{}')",
                notification.order_id,
                notification.transaction_status
            );
            return Err(DomainError::NotFound(notification.order_id));
        };

        if order.payment_status != mapped {
            log::info!(
                "payment_notification: order {} already {}, ignoring {} ({})",
                order.id,
                order.payment_status,
                mapped,
                notification.transaction_status
            );
        } else {
            log::info!(
                "payment_notification: order {} is {} ({})",
                order.id,
                order.payment_status,
                notification.transaction_status
            );
        }

        match BigDecimal::from_str(&notification.gross_amount) {
            Ok(amount) if amount == BigDecimal::from(order.total) => {}
            Ok(amount) => log::warn!(
                "payment_notification: order {} gross_amount {} does not match total {}",
                order.id,
                amount,
                order.total
            ),
            Err(_) => log::warn!(
                "payment_notification: order {} has unparseable gross_amount '{}'",
                order.id,
                notification.gross_amount
            ),
        }

        Ok(NotificationOutcome {
            order_id: order.id,
            mapped,
            stored: order.payment_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::notification_signature;
    use crate::test_support::InMemoryOrders;

    const SERVER_KEY: &str = "SB-Mid-server-test";

    fn signed(order_id: &str, transaction_status: &str, gross_amount: &str) -> PaymentNotification {
        PaymentNotification {
            order_id: order_id.to_string(),
            status_code: "200".to_string(),
            gross_amount: gross_amount.to_string(),
            transaction_status: transaction_status.to_string(),
            signature_key: notification_signature(order_id, "200", gross_amount, SERVER_KEY),
        }
    }

    fn setup() -> (Arc<InMemoryOrders>, NotificationService, String) {
        let orders = Arc::new(InMemoryOrders::default());
        let order_id = orders.seed_order("TB01", 50_000);
        let svc = NotificationService::new(orders.clone(), SERVER_KEY.to_string());
        (orders, svc, order_id)
    }

    fn payment_status(orders: &InMemoryOrders, id: &str) -> PaymentStatus {
        orders.find_by_id(id).unwrap().unwrap().order.payment_status
    }

    #[tokio::test]
    async fn settlement_marks_order_paid() {
        let (orders, svc, id) = setup();

        let outcome = svc.handle(signed(&id, "settlement", "50000.00")).await.unwrap();

        assert_eq!(outcome.stored, PaymentStatus::Paid);
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn invalid_signature_leaves_order_untouched() {
        let (orders, svc, id) = setup();
        let mut n = signed(&id, "settlement", "50000.00");
        n.signature_key = "0".repeat(128);

        assert!(matches!(
            svc.handle(n).await,
            Err(DomainError::InvalidSignature)
        ));
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Unpaid);
        assert_eq!(orders.payment_writes(), 0);
    }

    #[tokio::test]
    async fn signature_for_other_amount_is_rejected() {
        let (orders, svc, id) = setup();
        let mut n = signed(&id, "settlement", "1.00");
        n.gross_amount = "50000.00".to_string();

        assert!(svc.handle(n).await.is_err());
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn unknown_order_is_reported() {
        let (orders, svc, _) = setup();

        let result = svc.handle(signed("ORDER-0-deadbeef", "settlement", "1.00")).await;

        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == "ORDER-0-deadbeef"));
        assert_eq!(orders.order_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_delivery_is_idempotent() {
        let (orders, svc, id) = setup();
        let n = signed(&id, "settlement", "50000.00");

        let first = svc.handle(n.clone()).await.unwrap();
        let second = svc.handle(n).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn late_pending_does_not_regress_paid_order() {
        let (orders, svc, id) = setup();
        svc.handle(signed(&id, "settlement", "50000.00")).await.unwrap();

        let outcome = svc.handle(signed(&id, "pending", "50000.00")).await.unwrap();

        assert_eq!(outcome.mapped, PaymentStatus::Unpaid);
        assert_eq!(outcome.stored, PaymentStatus::Paid);
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn deliveries_converge_regardless_of_order() {
        let (orders, svc, id) = setup();
        for status in ["expire", "pending", "settlement", "cancel"] {
            svc.handle(signed(&id, status, "50000.00")).await.unwrap();
        }
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Paid);

        let (orders, svc, id) = setup();
        for status in ["pending", "deny", "pending"] {
            svc.handle(signed(&id, status, "50000.00")).await.unwrap();
        }
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn unrecognized_status_is_acknowledged_as_unpaid() {
        let (orders, svc, id) = setup();

        let outcome = svc.handle(signed(&id, "refund", "50000.00")).await.unwrap();

        assert_eq!(outcome.mapped, PaymentStatus::Unpaid);
        assert_eq!(payment_status(&orders, &id), PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn amount_mismatch_still_applies_signed_status() {
        let (orders, svc, id) = setup();

        svc.handle(signed(&id, "settlement", "10.00")).await.unwrap();

        assert_eq!(payment_status(&orders, &id), PaymentStatus::Paid);
    }
}
