use serde::Deserialize;
use sha2::{Digest, Sha512};

use super::errors::DomainError;

/// Fields of the provider's payment notification that this service reads.
/// Everything else in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub transaction_status: String,
    pub signature_key: String,
}

/// SHA-512 hex digest of `order_id + status_code + gross_amount + server_key`.
pub fn notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Rejects a notification whose `signature_key` does not match the digest
/// recomputed with our server key.
pub fn verify_notification(
    notification: &PaymentNotification,
    server_key: &str,
) -> Result<(), DomainError> {
    let expected = notification_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        server_key,
    );
    if secure_eq(expected.as_bytes(), notification.signature_key.as_bytes()) {
        Ok(())
    } else {
        Err(DomainError::InvalidSignature)
    }
}

fn secure_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0_u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
