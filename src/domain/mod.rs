pub mod charge;
pub mod errors;
pub mod notification;
pub mod order;
pub mod order_id;
pub mod payment_status;
pub mod ports;
pub mod pricing;
