pub mod menu_repo;
pub mod midtrans;
pub mod models;
pub mod order_repo;
