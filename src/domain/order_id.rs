use chrono::Utc;
use uuid::Uuid;

/// Hard limit imposed by the payment provider on `order_id`.
pub const MAX_ORDER_ID_LEN: usize = 50;

const PREFIX: &str = "ORDER";

/// `ORDER-<unix millis>-<8 hex chars>`. Collisions are possible in
/// principle; callers treat a duplicate key as retryable.
pub fn generate_order_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        PREFIX,
        Utc::now().timestamp_millis(),
        &random[..8]
    )
}

/// Characters the provider accepts in an order id.
pub fn is_valid_order_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() < MAX_ORDER_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}
