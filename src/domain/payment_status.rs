use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Position in the convergence order UNPAID < CANCELLED < PAID.
    fn rank(&self) -> u8 {
        match self {
            PaymentStatus::Unpaid => 0,
            PaymentStatus::Cancelled => 1,
            PaymentStatus::Paid => 2,
        }
    }

    /// Whether writing `self` over `current` moves the order forward.
    pub fn supersedes(&self, current: PaymentStatus) -> bool {
        self.rank() > current.rank()
    }

    /// Stored statuses that `self` may overwrite.
    pub fn overwritable(&self) -> Vec<PaymentStatus> {
        [
            PaymentStatus::Unpaid,
            PaymentStatus::Cancelled,
            PaymentStatus::Paid,
        ]
        .into_iter()
        .filter(|current| self.supersedes(*current))
        .collect()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            "PAID" => Ok(PaymentStatus::Paid),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// Maps a provider `transaction_status` onto the internal vocabulary.
/// Returns `None` for statuses outside the documented set.
pub fn recognize_transaction_status(transaction_status: &str) -> Option<PaymentStatus> {
    match transaction_status {
        "capture" | "settlement" | "success" => Some(PaymentStatus::Paid),
        "pending" => Some(PaymentStatus::Unpaid),
        "cancel" | "deny" | "expire" | "failure" => Some(PaymentStatus::Cancelled),
        _ => None,
    }
}

/// Total mapping: anything unrecognized is treated as still UNPAID so the
/// notification can be acknowledged.
pub fn map_transaction_status(transaction_status: &str) -> PaymentStatus {
    recognize_transaction_status(transaction_status).unwrap_or(PaymentStatus::Unpaid)
}
