use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Order id already exists")]
    IdCollision,
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the outbound charge request. None of these are fatal to
/// order creation once the order is persisted.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("payment provider timed out")]
    Timeout,
    #[error("payment provider unreachable: {0}")]
    Network(String),
    #[error("payment provider rejected the charge ({status_code}): {message}")]
    Rejected { status_code: String, message: String },
    #[error("invalid payment provider response: {0}")]
    Decode(String),
}
